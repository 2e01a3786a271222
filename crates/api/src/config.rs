use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::str::FromStr;

/// HTTP listener settings for the storyboard API.
///
/// Render and reasoning settings live with their clients
/// (`FiboConfig`, `ReasoningConfig`); coverage batching lives in
/// `CoverageConfig`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Front-end origins allowed to call the API.
    pub cors_origins: Vec<String>,
    /// Upper bound on one request. A coverage batch renders every shot
    /// before answering, so keep this well above a single render.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `CORS_ORIGINS` (comma-separated) and
    /// `REQUEST_TIMEOUT_SECS`, defaulting to a local storyboard dev setup
    /// (`0.0.0.0:3000`, the Vite dev origin, 300 seconds).
    pub fn from_env() -> Self {
        let cors_origins = var_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parsed_var("PORT", 3000),
            cors_origins,
            request_timeout_secs: parsed_var("REQUEST_TIMEOUT_SECS", 300),
        }
    }

    /// Socket address the listener binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        Ok(SocketAddr::new(self.host.parse::<IpAddr>()?, self.port))
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_var<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} is not valid: {e}")),
        Err(_) => default,
    }
}
