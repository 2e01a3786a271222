//! REST API client for the FIBO image-generation endpoints.
//!
//! Wraps request submission and status retrieval using [`reqwest`].
//! Polling policy lives in [`crate::render`].

use serde::{Deserialize, Serialize};

use crate::config::FiboConfig;

/// HTTP client for the FIBO v2 API.
pub struct FiboApi {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

/// Body of `POST /image/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateBody {
    pub num_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// The structured prompt, JSON-encoded into a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_prompt: Option<String>,
}

/// Returned by `POST /image/generate` once a request is accepted.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub request_id: String,
    /// Absolute URL to poll for the outcome.
    pub status_url: String,
}

/// Returned by the status URL.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    /// `IN_PROGRESS`, `COMPLETED` or `ERROR`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: Option<StatusResult>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct StatusResult {
    #[serde(default)]
    pub image_url: Option<String>,
    /// Either an object or a JSON-encoded string.
    #[serde(default)]
    pub structured_prompt: Option<serde_json::Value>,
}

/// Errors from the FIBO REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum FiboApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// FIBO returned a non-2xx status code.
    #[error("FIBO API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl FiboApi {
    /// Create a client whose requests time out per `config.http_timeout`.
    pub fn new(config: &FiboConfig) -> Result<Self, FiboApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self::with_client(
            client,
            config.api_base.clone(),
            config.api_key.clone(),
        ))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_base: String, api_key: String) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Submit a generation request.
    pub async fn submit(&self, body: &GenerateBody) -> Result<SubmitResponse, FiboApiError> {
        let response = self
            .client
            .post(format!("{}/image/generate", self.api_base))
            .header("api_token", &self.api_key)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current state of a submitted request.
    pub async fn status(&self, status_url: &str) -> Result<StatusResponse, FiboApiError> {
        let response = self
            .client
            .get(status_url)
            .header("api_token", &self.api_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an
    /// [`FiboApiError::ApiError`] carrying status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, FiboApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FiboApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FiboApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
