use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::proxy::ProxyConfig;

const DEFAULT_USER_AGENT: &str = concat!("hlshash/", env!("CARGO_PKG_VERSION"));

/// Configurable options for a conversion
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Overall timeout for a single HTTP request (zero disables)
    pub timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// Upper bound for one read of a playlist or segment, network or disk
    /// (zero disables)
    pub read_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// User agent string
    pub user_agent: String,

    /// HTTP headers sent with every request of the client built from this
    /// config. Upload credentials go on the sink instead.
    pub headers: HeaderMap,

    /// Proxy configuration (optional)
    pub proxy: Option<ProxyConfig>,

    /// Whether to use system proxy settings if available
    pub use_system_proxy: bool,

    /// Segments of one media playlist fetched, hashed and written at once
    pub segment_concurrency: usize,

    /// Maximum nesting of playlists below the root
    pub max_depth: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(120),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            headers: ConverterConfig::get_default_headers(),
            proxy: None,
            use_system_proxy: true,
            segment_concurrency: 1,
            max_depth: 8,
        }
    }
}

impl ConverterConfig {
    pub fn builder() -> crate::builder::ConverterConfigBuilder {
        crate::builder::ConverterConfigBuilder::new()
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut default_headers = HeaderMap::new();

        default_headers.insert(
            reqwest::header::ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate"),
        );

        default_headers.insert(
            reqwest::header::CONNECTION,
            HeaderValue::from_static("keep-alive"),
        );

        default_headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("*/*"));
        default_headers
    }
}

impl std::fmt::Display for ConverterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let proxy = match &self.proxy {
            Some(proxy) => proxy.url.as_str(),
            None if self.use_system_proxy => "system",
            None => "none",
        };
        write!(
            f,
            "ConverterConfig {{ timeout: {}s, connect_timeout: {}s, read_timeout: {}s, proxy: {}, segment_concurrency: {}, max_depth: {} }}",
            self.timeout.as_secs(),
            self.connect_timeout.as_secs(),
            self.read_timeout.as_secs(),
            proxy,
            self.segment_concurrency,
            self.max_depth
        )
    }
}
