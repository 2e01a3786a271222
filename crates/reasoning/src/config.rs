use std::time::Duration;

/// Reasoning-service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL without a trailing slash; `/chat/completions` is appended.
    pub api_base: String,
    pub timeout: Duration,
}

impl ReasoningConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default                      |
    /// |-----------------------|------------------------------|
    /// | `OPENAI_API_KEY`      | required                     |
    /// | `OPENAI_MODEL`        | `gpt-4o-mini`                |
    /// | `OPENAI_API_BASE`     | `https://api.openai.com/v1`  |
    /// | `OPENAI_TIMEOUT_SECS` | `60`                         |
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set");

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

        let api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("OPENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("OPENAI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model,
            api_base,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
