//! Handlers for coverage planning and generation.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use cinefibo_core::coverage::ShotPlan;
use cinefibo_pipeline::coverage::generate_coverage;
use cinefibo_pipeline::executor::{CoverageOutcome, CoverageShotResult};
use cinefibo_pipeline::planner::plan_coverage;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CoverageRequest {
    pub scene_text: String,
    pub project_type: Option<String>,
    /// Clamped into 1..=12; defaults to 6.
    pub num_shots: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CoveragePlanResponse {
    pub shots: Vec<ShotPlan>,
}

/// Slots in plan order, with `status` of `complete` or `partial_failure`.
#[derive(Debug, Serialize)]
pub struct CoverageGenerateResponse {
    #[serde(flatten)]
    pub outcome: CoverageOutcome,
    pub shots: Vec<CoverageShotResult>,
}

/// POST /api/v1/coverage/plan
pub async fn plan(
    State(state): State<AppState>,
    Json(input): Json<CoverageRequest>,
) -> AppResult<Json<CoveragePlanResponse>> {
    let shots = plan_coverage(
        state.reasoning.as_ref(),
        &input.scene_text,
        input.project_type.as_deref(),
        input.num_shots,
    )
    .await?;
    Ok(Json(CoveragePlanResponse { shots }))
}

/// POST /api/v1/coverage/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<CoverageRequest>,
) -> AppResult<Json<CoverageGenerateResponse>> {
    let report = generate_coverage(
        state.reasoning.as_ref(),
        Arc::clone(&state.render),
        &input.scene_text,
        input.project_type.as_deref(),
        input.num_shots,
        &state.coverage,
    )
    .await?;

    let outcome = report.outcome();
    if let CoverageOutcome::PartialFailure { failed } = &outcome {
        tracing::warn!(
            failed = failed.len(),
            rendered = report.rendered_count(),
            "Coverage partially rendered"
        );
    }

    Ok(Json(CoverageGenerateResponse {
        outcome,
        shots: report.shots,
    }))
}
