use std::time::Duration;

/// Default FIBO v2 endpoint.
pub const DEFAULT_API_BASE: &str = "https://engine.prod.bria-api.com/v2";

/// Render-service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct FiboConfig {
    /// Sent as the `api_token` header on every request.
    pub api_key: String,
    /// Base URL without a trailing slash.
    pub api_base: String,
    /// Timeout for each individual HTTP call.
    pub http_timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Polls before a pending render is given up on.
    pub max_polls: u32,
}

impl FiboConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                  | Default                                  |
    /// |--------------------------|------------------------------------------|
    /// | `BRIA_API_KEY`           | required                                 |
    /// | `BRIA_API_BASE`          | `https://engine.prod.bria-api.com/v2`    |
    /// | `FIBO_HTTP_TIMEOUT_SECS` | `30`                                     |
    /// | `FIBO_POLL_INTERVAL_MS`  | `2000`                                   |
    /// | `FIBO_MAX_POLLS`         | `90`                                     |
    pub fn from_env() -> Self {
        let api_key = std::env::var("BRIA_API_KEY").expect("BRIA_API_KEY must be set");

        let api_base = std::env::var("BRIA_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.into())
            .trim_end_matches('/')
            .to_string();

        let http_timeout_secs: u64 = std::env::var("FIBO_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("FIBO_HTTP_TIMEOUT_SECS must be a valid u64");

        let poll_interval_ms: u64 = std::env::var("FIBO_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("FIBO_POLL_INTERVAL_MS must be a valid u64");

        let max_polls: u32 = std::env::var("FIBO_MAX_POLLS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("FIBO_MAX_POLLS must be a valid u32");

        Self {
            api_key,
            api_base,
            http_timeout: Duration::from_secs(http_timeout_secs),
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_polls,
        }
    }
}
