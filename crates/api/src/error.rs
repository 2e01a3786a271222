use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinefibo_core::error::CoreError;
use cinefibo_pipeline::PipelineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`PipelineError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cinefibo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure while talking to the render or reasoning services.
    #[error(transparent)]
    Pipeline(PipelineError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Core(core) => AppError::Core(core),
            other => AppError::Pipeline(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Service errors ---
            AppError::Pipeline(pipeline) => match pipeline {
                PipelineError::Core(core) => classify_core_error(core),
                PipelineError::ContentModerated(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "CONTENT_MODERATED",
                    format!("The render was rejected by content moderation: {msg}"),
                ),
                PipelineError::PlanningUnavailable(msg) => {
                    tracing::warn!(error = %msg, "Coverage planning unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "PLANNING_UNAVAILABLE",
                        "Coverage planning is temporarily unavailable".to_string(),
                    )
                }
                PipelineError::ReasoningUnavailable(msg) => {
                    tracing::warn!(error = %msg, "Reasoning service unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "REASONING_UNAVAILABLE",
                        "Shot description is temporarily unavailable".to_string(),
                    )
                }
                PipelineError::RenderServiceUnavailable(msg) => {
                    tracing::warn!(error = %msg, "Render service unavailable");
                    (
                        StatusCode::BAD_GATEWAY,
                        "RENDER_UNAVAILABLE",
                        "The render service is unavailable".to_string(),
                    )
                }
                PipelineError::TotalFailure { failed } => {
                    let body = json!({
                        "error": "No coverage shot could be rendered",
                        "code": "COVERAGE_FAILED",
                        "failures": failed,
                    });
                    return (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response();
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::InvalidOverride { .. } => {
            (StatusCode::BAD_REQUEST, "INVALID_OVERRIDE", core.to_string())
        }
        CoreError::MissingBasePrompt => {
            (StatusCode::BAD_REQUEST, "MISSING_BASE_PROMPT", core.to_string())
        }
        CoreError::EmptyScene => (StatusCode::BAD_REQUEST, "EMPTY_SCENE", core.to_string()),
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Foreign key violations (23503) map to 404; the parent row is gone.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Referenced resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
