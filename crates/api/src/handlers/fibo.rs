use axum::extract::State;
use axum::Json;
use cinefibo_core::structured_prompt::StructuredPrompt;
use cinefibo_fibo::{RenderOutput, RenderRequest};
use cinefibo_pipeline::shot::render_direct;
use serde::Deserialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Request body for a direct render. At least one field is required.
#[derive(Debug, Deserialize)]
pub struct FiboGenerateRequest {
    pub prompt: Option<String>,
    pub structured_prompt: Option<StructuredPrompt>,
}

/// POST /api/v1/fibo/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<FiboGenerateRequest>,
) -> AppResult<Json<RenderOutput>> {
    let request = RenderRequest {
        prompt: input.prompt.filter(|p| !p.trim().is_empty()),
        structured_prompt: input.structured_prompt.filter(|sp| !sp.is_empty()),
    };
    let output = render_direct(state.render.as_ref(), request).await?;
    Ok(Json(output))
}
