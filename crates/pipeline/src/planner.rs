//! Coverage planning: creative drafting by the reasoning service, with the
//! shot count and distinctness guaranteed here.

use cinefibo_core::coverage::{clamp_num_shots, normalize_drafts, ShotPlan, DEFAULT_SHOTS};
use cinefibo_core::error::CoreError;
use cinefibo_reasoning::ReasoningService;

use crate::error::PipelineError;

/// Calls made to the reasoning service before planning is reported unavailable.
const PLANNING_ATTEMPTS: u32 = 2;

/// Plan coverage for a scene.
///
/// `num_shots` is clamped into range; `None` plans the default count.
///
/// # Errors
///
/// - [`CoreError::EmptyScene`] for blank scene text, before any service call.
/// - [`PipelineError::PlanningUnavailable`] when the reasoning service fails
///   or returns an unusable plan twice in a row.
pub async fn plan_coverage(
    reasoning: &dyn ReasoningService,
    scene: &str,
    project_type: Option<&str>,
    num_shots: Option<i64>,
) -> Result<Vec<ShotPlan>, PipelineError> {
    let scene = scene.trim();
    if scene.is_empty() {
        return Err(CoreError::EmptyScene.into());
    }
    let num_shots = num_shots.map_or(DEFAULT_SHOTS, clamp_num_shots);
    let project_type = project_type.map(str::trim).filter(|p| !p.is_empty());

    let mut last_error = String::new();
    for attempt in 1..=PLANNING_ATTEMPTS {
        let outcome = match reasoning.plan_coverage(scene, project_type, num_shots).await {
            Ok(drafts) => normalize_drafts(drafts, num_shots).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(plans) => {
                tracing::info!(num_shots, attempt, "Coverage planned");
                return Ok(plans);
            }
            Err(error) => {
                tracing::warn!(attempt, error = %error, "Coverage planning attempt failed");
                last_error = error;
            }
        }
    }

    Err(PipelineError::PlanningUnavailable(last_error))
}
