//! Rendering a coverage plan with bounded parallelism.
//!
//! Each shot runs in its own task and waits for one of
//! `max_concurrency` permits before calling the render service. A failed
//! shot never fails its siblings; its slot records why it failed. Slots are
//! returned in plan order whatever order the renders finish in.
//!
//! Dropping the future returned by [`execute_coverage`] abandons the batch:
//! shots still waiting for a permit are never dispatched, while renders
//! already in flight finish in their detached tasks and are discarded.

use std::sync::Arc;

use cinefibo_core::coverage::{seed_prompt, shot_prompt_text, ShotPlan};
use cinefibo_core::types::PlanId;
use cinefibo_fibo::{RenderError, RenderOutput, RenderRequest, RenderService};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::{CoverageConfig, FailurePolicy};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ContentModerated,
    RenderUnavailable,
    /// Never dispatched because the batch stopped first.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<RenderError> for ShotFailure {
    fn from(err: RenderError) -> Self {
        let kind = match err {
            RenderError::ContentModerated(_) => FailureKind::ContentModerated,
            _ => FailureKind::RenderUnavailable,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// What happened to one planned shot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShotOutcome {
    Rendered(RenderOutput),
    Failed(ShotFailure),
}

/// One slot of a coverage report: the plan and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageShotResult {
    pub plan: ShotPlan,
    #[serde(flatten)]
    pub outcome: ShotOutcome,
}

impl CoverageShotResult {
    fn failed(plan: ShotPlan, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            plan,
            outcome: ShotOutcome::Failed(ShotFailure {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn failure(&self) -> Option<&ShotFailure> {
        match &self.outcome {
            ShotOutcome::Failed(failure) => Some(failure),
            ShotOutcome::Rendered(_) => None,
        }
    }
}

/// A failed slot, identified by plan id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedShot {
    pub shot_id: PlanId,
    #[serde(flatten)]
    pub failure: ShotFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoverageOutcome {
    Complete,
    PartialFailure { failed: Vec<FailedShot> },
    TotalFailure { failed: Vec<FailedShot> },
}

/// All slots of one coverage run, sorted by plan id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub shots: Vec<CoverageShotResult>,
}

impl CoverageReport {
    pub fn failed(&self) -> Vec<FailedShot> {
        self.shots
            .iter()
            .filter_map(|slot| {
                slot.failure().map(|failure| FailedShot {
                    shot_id: slot.plan.id,
                    failure: failure.clone(),
                })
            })
            .collect()
    }

    pub fn rendered_count(&self) -> usize {
        self.shots.iter().filter(|s| s.failure().is_none()).count()
    }

    pub fn outcome(&self) -> CoverageOutcome {
        let failed = self.failed();
        if failed.is_empty() {
            CoverageOutcome::Complete
        } else if self.rendered_count() == 0 {
            CoverageOutcome::TotalFailure { failed }
        } else {
            CoverageOutcome::PartialFailure { failed }
        }
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Render every plan, at most `config.max_concurrency` at a time.
pub async fn execute_coverage(
    render: Arc<dyn RenderService>,
    plans: Vec<ShotPlan>,
    config: &CoverageConfig,
) -> CoverageReport {
    let total = plans.len();
    let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
    let stop = CancellationToken::new();
    let abort_on_failure = config.failure_policy == FailurePolicy::Abort;
    // Cancels waiting shots if this future is dropped before completion.
    let abandon_guard = stop.clone().drop_guard();

    let mut tasks = FuturesUnordered::new();
    for plan in plans {
        let handle = tokio::spawn(render_slot(
            Arc::clone(&render),
            Arc::clone(&semaphore),
            stop.clone(),
            abort_on_failure,
            plan.clone(),
        ));
        tasks.push(async move { (plan, handle.await) });
    }

    let mut shots = Vec::with_capacity(total);
    while let Some((plan, joined)) = tasks.next().await {
        let slot = joined.unwrap_or_else(|e| {
            tracing::error!(shot_id = plan.id, error = %e, "Render task panicked");
            if abort_on_failure {
                stop.cancel();
            }
            CoverageShotResult::failed(plan, FailureKind::RenderUnavailable, "render task failed")
        });

        if let Some(failure) = slot.failure() {
            tracing::warn!(
                shot_id = slot.plan.id,
                kind = ?failure.kind,
                error = %failure.message,
                "Coverage shot failed",
            );
        }
        shots.push(slot);
    }
    abandon_guard.disarm();

    shots.sort_by_key(|slot| slot.plan.id);
    let report = CoverageReport { shots };
    tracing::info!(
        total,
        rendered = report.rendered_count(),
        "Coverage execution finished",
    );
    report
}

async fn render_slot(
    render: Arc<dyn RenderService>,
    semaphore: Arc<Semaphore>,
    stop: CancellationToken,
    abort_on_failure: bool,
    plan: ShotPlan,
) -> CoverageShotResult {
    let permit = tokio::select! {
        biased;
        _ = stop.cancelled() => None,
        permit = semaphore.acquire_owned() => permit.ok(),
    };
    let Some(_permit) = permit else {
        return CoverageShotResult::failed(plan, FailureKind::Aborted, "batch stopped before dispatch");
    };
    if stop.is_cancelled() {
        return CoverageShotResult::failed(plan, FailureKind::Aborted, "batch stopped before dispatch");
    }

    let seed = seed_prompt(&plan);
    let request = RenderRequest {
        prompt: Some(shot_prompt_text(&plan, &seed)),
        structured_prompt: Some(seed),
    };
    tracing::debug!(shot_id = plan.id, "Dispatching coverage shot");

    match render.render(request).await {
        Ok(output) => {
            tracing::info!(shot_id = plan.id, request_id = %output.request_id, "Coverage shot rendered");
            CoverageShotResult {
                plan,
                outcome: ShotOutcome::Rendered(output),
            }
        }
        Err(err) => {
            // Cancel while the permit is still held so no queued shot is
            // handed the slot first.
            if abort_on_failure && !stop.is_cancelled() {
                tracing::info!(shot_id = plan.id, "Aborting remaining coverage shots");
                stop.cancel();
            }
            CoverageShotResult {
                plan,
                outcome: ShotOutcome::Failed(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use assert_matches::assert_matches;
    use cinefibo_core::coverage::normalize_drafts;

    use super::*;
    use crate::testing::{described, drafts, FakeRenderer};

    fn plans(count: usize) -> Vec<ShotPlan> {
        normalize_drafts(drafts(count), count as u32).unwrap()
    }

    fn config(max_concurrency: usize, failure_policy: FailurePolicy) -> CoverageConfig {
        CoverageConfig {
            max_concurrency,
            failure_policy,
        }
    }

    #[tokio::test]
    async fn all_shots_rendered_in_plan_order() {
        let renderer = Arc::new(FakeRenderer::succeeding());
        let report = execute_coverage(renderer.clone(), plans(5), &CoverageConfig::default()).await;

        let ids: Vec<u32> = report.shots.iter().map(|s| s.plan.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(report.outcome(), CoverageOutcome::Complete);
        assert_eq!(renderer.calls(), 5);
    }

    #[tokio::test]
    async fn one_failed_shot_does_not_fail_siblings() {
        let renderer = Arc::new(FakeRenderer::failing_when(|req| {
            (described(req) == "subject 2")
                .then(|| RenderError::Unavailable("GPU worker crashed".into()))
        }));
        let report = execute_coverage(renderer, plans(4), &CoverageConfig::default()).await;

        assert_eq!(report.shots.len(), 4);
        assert_eq!(report.rendered_count(), 3);
        let ids: Vec<u32> = report.shots.iter().map(|s| s.plan.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_matches!(
            report.outcome(),
            CoverageOutcome::PartialFailure { failed } if failed.len() == 1
                && failed[0].shot_id == 2
                && failed[0].failure.kind == FailureKind::RenderUnavailable
        );
    }

    #[tokio::test]
    async fn moderation_failures_are_marked_distinctly() {
        let renderer = Arc::new(FakeRenderer::failing_when(|req| {
            (described(req) == "subject 1").then(|| RenderError::ContentModerated("nope".into()))
        }));
        let report = execute_coverage(renderer, plans(2), &CoverageConfig::default()).await;
        assert_eq!(
            report.shots[0].failure().map(|f| f.kind),
            Some(FailureKind::ContentModerated)
        );
    }

    #[tokio::test]
    async fn every_shot_failing_is_total_failure() {
        let renderer = Arc::new(FakeRenderer::failing_when(|_| {
            Some(RenderError::Unavailable("down".into()))
        }));
        let report = execute_coverage(renderer, plans(3), &CoverageConfig::default()).await;
        assert_matches!(report.outcome(), CoverageOutcome::TotalFailure { failed } if failed.len() == 3);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_cap() {
        let renderer = Arc::new(FakeRenderer::succeeding().with_delay(Duration::from_millis(20)));
        let report = execute_coverage(
            renderer.clone(),
            plans(6),
            &config(2, FailurePolicy::Isolate),
        )
        .await;

        assert_eq!(report.rendered_count(), 6);
        assert!(renderer.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn seed_prompt_and_text_are_sent() {
        let renderer = Arc::new(FakeRenderer::succeeding());
        execute_coverage(renderer.clone(), plans(1), &CoverageConfig::default()).await;

        let requests = renderer.requests.lock().unwrap();
        let request = &requests[0];
        let seed = request.structured_prompt.as_ref().unwrap();
        assert_eq!(seed.camera.angle.as_deref(), Some("eye-level"));
        assert!(request
            .prompt
            .as_deref()
            .unwrap()
            .starts_with("close-up shot. Framing: subject 1 centered."));
    }

    #[tokio::test]
    async fn abort_policy_stops_waiting_shots() {
        let renderer = Arc::new(
            FakeRenderer::failing_when(|req| {
                (described(req) == "subject 1").then(|| RenderError::Unavailable("down".into()))
            })
            .with_delay(Duration::from_millis(10)),
        );
        let report = execute_coverage(
            renderer.clone(),
            plans(4),
            &config(1, FailurePolicy::Abort),
        )
        .await;

        assert_eq!(renderer.calls(), 1);
        assert_eq!(report.shots.len(), 4);
        assert_eq!(
            report.shots[0].failure().map(|f| f.kind),
            Some(FailureKind::RenderUnavailable)
        );
        for slot in &report.shots[1..] {
            assert_eq!(slot.failure().map(|f| f.kind), Some(FailureKind::Aborted));
        }
    }

    #[tokio::test]
    async fn isolate_policy_keeps_going_after_failure() {
        let renderer = Arc::new(
            FakeRenderer::failing_when(|req| {
                (described(req) == "subject 1").then(|| RenderError::Unavailable("down".into()))
            })
            .with_delay(Duration::from_millis(5)),
        );
        let report =
            execute_coverage(renderer, plans(4), &config(1, FailurePolicy::Isolate)).await;
        assert_eq!(report.rendered_count(), 3);
    }

    #[tokio::test]
    async fn abandoned_batch_stops_undispatched_shots() {
        let renderer = Arc::new(FakeRenderer::succeeding().with_delay(Duration::from_millis(50)));
        let serial = config(1, FailurePolicy::Isolate);
        let batch = execute_coverage(renderer.clone(), plans(3), &serial);

        let abandoned = tokio::time::timeout(Duration::from_millis(10), batch).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(renderer.calls(), 1);
    }

    #[test]
    fn report_serializes_slots_with_status() {
        let plan = plans(1).remove(0);
        let slot = CoverageShotResult::failed(plan, FailureKind::Aborted, "stopped");
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "aborted");
        assert_eq!(json["plan"]["id"], 1);
    }
}
