use std::time::Duration;

use hlshash_engine::{ConverterConfig, ProxyAuth, ProxyConfig, ProxyType};
use reqwest::header::HeaderMap;
use tracing::info;

use crate::cli::NetworkArgs;
use crate::error::AppError;
use crate::utils::parse_headers;

/// Resolve the proxy flags into an explicit proxy, if any, and whether the
/// system proxy may be used
fn proxy_settings(args: &NetworkArgs) -> Result<(Option<ProxyConfig>, bool), AppError> {
    if args.no_proxy {
        // No proxy flag overrides everything else
        info!("All proxy settings disabled (--no-proxy flag)");
        return Ok((None, false));
    }

    let Some(proxy_url) = args.proxy.as_ref() else {
        info!("Using system proxy settings if available");
        return Ok((None, true));
    };

    let proxy_type: ProxyType = args.proxy_type.parse().map_err(AppError::InvalidInput)?;

    // Authentication only when both username and password are provided
    let auth = match (&args.proxy_user, &args.proxy_pass) {
        (Some(username), Some(password)) => Some(ProxyAuth {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => None,
    };

    info!(
        proxy_url = %proxy_url,
        proxy_type = ?proxy_type,
        has_auth = auth.is_some(),
        "Using explicit proxy configuration"
    );

    let proxy = ProxyConfig {
        url: proxy_url.clone(),
        proxy_type,
        auth,
    };
    Ok((Some(proxy), false))
}

/// Configuration for `upload`: the `-H` headers are returned separately so
/// they reach the upload server only, never the origin being read.
pub fn upload_config(args: &NetworkArgs) -> Result<(ConverterConfig, HeaderMap), AppError> {
    let read_args = NetworkArgs {
        headers: Vec::new(),
        ..args.clone()
    };
    let config = converter_config(&read_args)?;
    Ok((config, parse_headers(&args.headers)))
}

/// Build the converter configuration from the network flags
pub fn converter_config(args: &NetworkArgs) -> Result<ConverterConfig, AppError> {
    if args.concurrency == 0 {
        return Err(AppError::InvalidInput(
            "Concurrency must be at least 1".to_string(),
        ));
    }

    info!(
        "HTTP timeout configuration: overall={}s, connect={}s, read={}s",
        args.timeout, args.connect_timeout, args.read_timeout
    );

    let (proxy, use_system_proxy) = proxy_settings(args)?;

    let mut builder = ConverterConfig::builder()
        .with_timeout(Duration::from_secs(args.timeout))
        .with_connect_timeout(Duration::from_secs(args.connect_timeout))
        .with_read_timeout(Duration::from_secs(args.read_timeout))
        .with_headers(parse_headers(&args.headers))
        .with_segment_concurrency(args.concurrency)
        .with_max_depth(args.max_depth);

    builder = match proxy {
        Some(proxy) => builder.with_proxy(proxy),
        None => builder.with_system_proxy(use_system_proxy),
    };

    let config = builder.build();
    info!("{config}");
    Ok(config)
}
