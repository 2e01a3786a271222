use std::sync::Arc;

use cinefibo_fibo::RenderService;
use cinefibo_reasoning::ReasoningService;

use crate::config::CoverageConfig;
use crate::error::PipelineError;
use crate::executor::{execute_coverage, CoverageOutcome, CoverageReport};
use crate::planner::plan_coverage;

/// Plan coverage for a scene and render every planned shot.
///
/// A report with at least one rendered shot is returned even if other
/// shots failed; the caller reads [`CoverageReport::outcome`].
///
/// # Errors
///
/// Planning errors as for [`plan_coverage`], or
/// [`PipelineError::TotalFailure`] when no shot rendered.
pub async fn generate_coverage(
    reasoning: &dyn ReasoningService,
    render: Arc<dyn RenderService>,
    scene: &str,
    project_type: Option<&str>,
    num_shots: Option<i64>,
    config: &CoverageConfig,
) -> Result<CoverageReport, PipelineError> {
    let plans = plan_coverage(reasoning, scene, project_type, num_shots).await?;
    let report = execute_coverage(render, plans, config).await;

    match report.outcome() {
        CoverageOutcome::TotalFailure { failed } => Err(PipelineError::TotalFailure { failed }),
        _ => Ok(report),
    }
}
