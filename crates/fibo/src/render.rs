//! Submit-and-poll rendering on top of [`FiboApi`].

use std::time::Duration;

use async_trait::async_trait;
use cinefibo_core::structured_prompt::StructuredPrompt;
use serde::Serialize;

use crate::api::{FiboApi, FiboApiError, GenerateBody, StatusResponse};
use crate::config::FiboConfig;

/// What to render. At least one of the two inputs must be set; when both
/// are, the structured prompt is authoritative and the text reinforces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderRequest {
    pub prompt: Option<String>,
    pub structured_prompt: Option<StructuredPrompt>,
}

impl RenderRequest {
    pub fn is_empty(&self) -> bool {
        self.prompt.as_deref().map_or(true, |p| p.trim().is_empty())
            && self.structured_prompt.as_ref().map_or(true, StructuredPrompt::is_empty)
    }
}

/// A finished render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub image_url: String,
    /// The structured prompt the service actually rendered from.
    pub structured_prompt: StructuredPrompt,
    pub request_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Rejected by the service's content moderation; rewording may help.
    #[error("Render rejected by content moderation: {0}")]
    ContentModerated(String),

    /// Transport failure, non-success status, render error or poll timeout.
    #[error("Render service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something that cannot be used.
    #[error("Invalid render service response: {0}")]
    InvalidResponse(String),

    /// Nothing to render.
    #[error("Invalid render request: {0}")]
    InvalidRequest(String),
}

/// Image generation backend.
#[async_trait]
pub trait RenderService: Send + Sync {
    async fn render(&self, request: RenderRequest) -> Result<RenderOutput, RenderError>;
}

/// [`RenderService`] backed by the FIBO API.
pub struct FiboRenderer {
    api: FiboApi,
    poll_interval: Duration,
    max_polls: u32,
}

impl FiboRenderer {
    pub fn new(api: FiboApi, poll_interval: Duration, max_polls: u32) -> Self {
        Self {
            api,
            poll_interval,
            max_polls,
        }
    }

    pub fn from_config(config: &FiboConfig) -> Result<Self, RenderError> {
        let api = FiboApi::new(config).map_err(classify_api_error)?;
        Ok(Self::new(api, config.poll_interval, config.max_polls))
    }
}

#[async_trait]
impl RenderService for FiboRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderOutput, RenderError> {
        let body = generate_body(&request)?;
        let submitted = self.api.submit(&body).await.map_err(classify_api_error)?;
        tracing::info!(request_id = %submitted.request_id, "Render submitted");

        for poll in 1..=self.max_polls {
            let status = self
                .api
                .status(&submitted.status_url)
                .await
                .map_err(classify_api_error)?;

            match status.status.to_ascii_uppercase().as_str() {
                "COMPLETED" => {
                    tracing::info!(request_id = %submitted.request_id, poll, "Render completed");
                    return completed_output(submitted.request_id, status);
                }
                "ERROR" | "FAILED" => {
                    tracing::warn!(request_id = %submitted.request_id, "Render failed");
                    return Err(failed_render(&status));
                }
                other => {
                    tracing::debug!(
                        request_id = %submitted.request_id,
                        poll,
                        status = other,
                        "Render pending",
                    );
                }
            }

            if poll < self.max_polls {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(RenderError::Unavailable(format!(
            "request {} still pending after {} polls",
            submitted.request_id, self.max_polls
        )))
    }
}

fn generate_body(request: &RenderRequest) -> Result<GenerateBody, RenderError> {
    if request.is_empty() {
        return Err(RenderError::InvalidRequest(
            "either a prompt or a structured prompt is required".to_string(),
        ));
    }

    let prompt = request
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let structured_prompt = request
        .structured_prompt
        .as_ref()
        .filter(|sp| !sp.is_empty())
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| RenderError::InvalidRequest(e.to_string()))?;

    Ok(GenerateBody {
        num_results: 1,
        prompt,
        structured_prompt,
    })
}

fn completed_output(
    request_id: String,
    status: StatusResponse,
) -> Result<RenderOutput, RenderError> {
    let result = status.result.ok_or_else(|| {
        RenderError::InvalidResponse(format!("request {request_id} completed without a result"))
    })?;

    let image_url = result
        .image_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            RenderError::InvalidResponse(format!(
                "request {request_id} completed without an image_url"
            ))
        })?;

    let structured_prompt = result
        .structured_prompt
        .as_ref()
        .map(StructuredPrompt::from_service_value)
        .unwrap_or_default();

    Ok(RenderOutput {
        image_url,
        structured_prompt,
        request_id,
    })
}

fn failed_render(status: &StatusResponse) -> RenderError {
    let detail = status
        .error
        .as_ref()
        .map(|e| match e {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "render failed without details".to_string());

    if mentions_moderation(&detail) {
        RenderError::ContentModerated(detail)
    } else {
        RenderError::Unavailable(detail)
    }
}

/// Map a transport-level failure onto the render error taxonomy.
pub fn classify_api_error(error: FiboApiError) -> RenderError {
    match error {
        FiboApiError::ApiError { status: 422, body } => RenderError::ContentModerated(body),
        FiboApiError::ApiError { body, .. } if mentions_moderation(&body) => {
            RenderError::ContentModerated(body)
        }
        FiboApiError::ApiError { status, body } => {
            RenderError::Unavailable(format!("HTTP {status}: {body}"))
        }
        FiboApiError::Request(e) if e.is_decode() => RenderError::InvalidResponse(e.to_string()),
        FiboApiError::Request(e) => RenderError::Unavailable(e.to_string()),
    }
}

fn mentions_moderation(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    ["moderation", "content policy", "content_policy"]
        .iter()
        .any(|needle| text.contains(needle))
}
