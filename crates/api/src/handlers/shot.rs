//! Handlers for single-shot generation, tuning and the control helpers.

use axum::extract::State;
use axum::Json;
use cinefibo_core::controls::{init_controls_from, ControlsState};
use cinefibo_core::merge::OverrideRequest;
use cinefibo_core::structured_prompt::StructuredPrompt;
use cinefibo_core::vocabulary::{listing, VocabularyListing};
use cinefibo_pipeline::shot::{generate_shot, tune_shot, GeneratedShot, TunedShot};
use serde::Deserialize;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ShotGenerateRequest {
    pub scene_text: String,
}

/// The shot being tuned plus the edited fields, flat in one object.
#[derive(Debug, Deserialize)]
pub struct ShotTuneRequest {
    pub structured_prompt: Option<StructuredPrompt>,
    #[serde(flatten)]
    pub overrides: OverrideRequest,
}

#[derive(Debug, Deserialize)]
pub struct ControlsRequest {
    pub structured_prompt: StructuredPrompt,
}

/// POST /api/v1/shot/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<ShotGenerateRequest>,
) -> AppResult<Json<GeneratedShot>> {
    let shot = generate_shot(
        state.reasoning.as_ref(),
        state.render.as_ref(),
        &input.scene_text,
    )
    .await?;
    Ok(Json(shot))
}

/// POST /api/v1/shot/tune
pub async fn tune(
    State(state): State<AppState>,
    Json(input): Json<ShotTuneRequest>,
) -> AppResult<Json<TunedShot>> {
    let tuned = tune_shot(
        state.render.as_ref(),
        input.structured_prompt.as_ref(),
        &input.overrides,
    )
    .await?;
    Ok(Json(tuned))
}

/// POST /api/v1/shot/controls
///
/// Control values a UI should show for a freshly rendered shot.
pub async fn controls(Json(input): Json<ControlsRequest>) -> Json<ControlsState> {
    Json(init_controls_from(&input.structured_prompt))
}

/// GET /api/v1/vocabulary
pub async fn vocabulary() -> Json<VocabularyListing> {
    Json(listing())
}
