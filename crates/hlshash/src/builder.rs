//! # Builder for ConverterConfig
//!
//! Fluent construction of a [`ConverterConfig`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use hlshash_engine::ConverterConfig;
//!
//! let config = ConverterConfig::builder()
//!     .with_timeout(Duration::from_secs(30))
//!     .with_read_timeout(Duration::from_secs(60))
//!     .with_header("Authorization", "Bearer secret")
//!     .with_segment_concurrency(4)
//!     .build();
//!
//! assert_eq!(config.segment_concurrency, 4);
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::{ConverterConfig, proxy::ProxyConfig};

/// Builder for [`ConverterConfig`]
#[derive(Debug, Clone)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ConverterConfig::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the per-read timeout applied to every playlist and segment read
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a custom HTTP header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.as_ref().parse::<reqwest::header::HeaderName>(),
            HeaderValue::from_str(value.as_ref()),
        ) {
            self.config.headers.insert(name, value);
        }
        self
    }

    /// Merge headers over the current ones; custom values win
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.config.headers.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self.config.use_system_proxy = false;
        self
    }

    /// Only honoured when no explicit proxy is configured
    pub fn with_system_proxy(mut self, use_system_proxy: bool) -> Self {
        if self.config.proxy.is_none() {
            self.config.use_system_proxy = use_system_proxy;
        }
        self
    }

    /// Values below one are clamped to one
    pub fn with_segment_concurrency(mut self, concurrency: usize) -> Self {
        self.config.segment_concurrency = concurrency.max(1);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn build(self) -> ConverterConfig {
        self.config
    }
}

impl Default for ConverterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
