use reqwest::Proxy;

/// Which requests an explicit proxy applies to
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum ProxyType {
    Http,
    Https,
    Socks5,
    /// Route every request through the proxy
    All,
}

impl std::str::FromStr for ProxyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(ProxyType::Http),
            "https" => Ok(ProxyType::Https),
            "socks5" => Ok(ProxyType::Socks5),
            "all" => Ok(ProxyType::All),
            _ => Err(format!("Unknown proxy type: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

/// Explicit proxy used for origin reads and uploads
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// e.g. "http://proxy.example.com:8080"
    pub url: String,
    pub proxy_type: ProxyType,
    pub auth: Option<ProxyAuth>,
}

/// Build the reqwest proxy for a [`ProxyConfig`]
pub fn build_proxy(config: &ProxyConfig) -> Result<Proxy, String> {
    let url = config.url.as_str();

    let mut proxy = match config.proxy_type {
        ProxyType::Http => Proxy::http(url).map_err(|e| format!("Invalid HTTP proxy URL: {e}"))?,
        ProxyType::Https => {
            Proxy::https(url).map_err(|e| format!("Invalid HTTPS proxy URL: {e}"))?
        }
        ProxyType::Socks5 => {
            let url = if url.starts_with("socks5://") {
                url.to_string()
            } else {
                format!("socks5://{url}")
            };
            Proxy::all(&url).map_err(|e| format!("Invalid SOCKS5 proxy URL: {e}"))?
        }
        ProxyType::All => Proxy::all(url).map_err(|e| format!("Invalid proxy URL: {e}"))?,
    };

    if let Some(auth) = &config.auth {
        proxy = proxy.basic_auth(&auth.username, &auth.password);
    }

    Ok(proxy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_type_from_str() {
        assert_eq!("HTTP".parse::<ProxyType>().unwrap(), ProxyType::Http);
        assert_eq!("socks5".parse::<ProxyType>().unwrap(), ProxyType::Socks5);
        assert_eq!("all".parse::<ProxyType>().unwrap(), ProxyType::All);
        assert!("ftp".parse::<ProxyType>().is_err());
    }

    #[test]
    fn test_build_proxy() {
        let config = ProxyConfig {
            url: "http://proxy.example.com:8080".to_string(),
            proxy_type: ProxyType::Https,
            auth: Some(ProxyAuth {
                username: "user".to_string(),
                password: "pass".to_string(),
            }),
        };
        assert!(build_proxy(&config).is_ok());
    }
}
