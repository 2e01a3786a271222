use cinefibo_core::error::CoreError;
use cinefibo_fibo::RenderError;

use crate::executor::FailedShot;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The reasoning service failed or kept returning unusable plans.
    #[error("Coverage planning unavailable: {0}")]
    PlanningUnavailable(String),

    /// The reasoning service could not describe a shot.
    #[error("Reasoning service unavailable: {0}")]
    ReasoningUnavailable(String),

    #[error("Render rejected by content moderation: {0}")]
    ContentModerated(String),

    #[error("Render service unavailable: {0}")]
    RenderServiceUnavailable(String),

    /// Every shot of a coverage set failed.
    #[error("No coverage shot could be rendered ({} failed)", failed.len())]
    TotalFailure { failed: Vec<FailedShot> },
}

impl From<RenderError> for PipelineError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::ContentModerated(msg) => Self::ContentModerated(msg),
            RenderError::Unavailable(msg) | RenderError::InvalidResponse(msg) => {
                Self::RenderServiceUnavailable(msg)
            }
            RenderError::InvalidRequest(msg) => Self::Core(CoreError::Validation(msg)),
        }
    }
}
