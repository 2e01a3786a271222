//! Hand-written service fakes shared by the pipeline tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cinefibo_core::coverage::ShotPlanDraft;
use cinefibo_core::structured_prompt::StructuredPrompt;
use cinefibo_fibo::{RenderError, RenderOutput, RenderRequest, RenderService};
use cinefibo_reasoning::{ReasoningError, ReasoningService};

type FailureRule = Box<dyn Fn(&RenderRequest) -> Option<RenderError> + Send + Sync>;

/// Renders succeed unless `fail_when` returns an error for the request.
pub struct FakeRenderer {
    fail_when: FailureRule,
    delay: Duration,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub requests: Mutex<Vec<RenderRequest>>,
}

impl FakeRenderer {
    pub fn succeeding() -> Self {
        Self::failing_when(|_| None)
    }

    pub fn failing_when(
        rule: impl Fn(&RenderRequest) -> Option<RenderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            fail_when: Box::new(rule),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Short description of the request's structured prompt, if any.
pub fn described(request: &RenderRequest) -> &str {
    request
        .structured_prompt
        .as_ref()
        .and_then(|sp| sp.short_description.as_deref())
        .unwrap_or_default()
}

#[async_trait]
impl RenderService for FakeRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderOutput, RenderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(err) = (self.fail_when)(&request) {
            return Err(err);
        }
        let mut used = request.structured_prompt.unwrap_or_default();
        used.aesthetics.aesthetic_score = Some(7.into());
        Ok(RenderOutput {
            image_url: format!("https://cdn.example/render-{call}.png"),
            structured_prompt: used,
            request_id: format!("req-{call}"),
        })
    }
}

/// Replays scripted planning answers in order.
pub struct FakeReasoning {
    plans: Mutex<VecDeque<Result<Vec<ShotPlanDraft>, ReasoningError>>>,
    description: Result<String, String>,
    pub plan_calls: AtomicUsize,
    pub describe_calls: AtomicUsize,
}

impl FakeReasoning {
    pub fn new() -> Self {
        Self {
            plans: Mutex::new(VecDeque::new()),
            description: Ok("A slow dolly-in at eye level on the chef, 50mm.".to_string()),
            plan_calls: AtomicUsize::new(0),
            describe_calls: AtomicUsize::new(0),
        }
    }

    pub fn then_plan(self, answer: Result<Vec<ShotPlanDraft>, ReasoningError>) -> Self {
        self.plans.lock().unwrap().push_back(answer);
        self
    }

    pub fn describe_fails(mut self) -> Self {
        self.description = Err("model offline".to_string());
        self
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningService for FakeReasoning {
    async fn describe_shot(&self, _scene: &str) -> Result<String, ReasoningError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.description
            .clone()
            .map_err(ReasoningError::Http)
    }

    async fn plan_coverage(
        &self,
        _scene: &str,
        _project_type: Option<&str>,
        _num_shots: u32,
    ) -> Result<Vec<ShotPlanDraft>, ReasoningError> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        self.plans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ReasoningError::Response("no scripted answer".into())))
    }
}

/// `count` distinct drafts: shot i is a close-up on subject i.
pub fn drafts(count: usize) -> Vec<ShotPlanDraft> {
    (1..=count)
        .map(|i| ShotPlanDraft {
            shot_type: Some("close-up".to_string()),
            description: Some(format!("subject {i}")),
            framing: Some(format!("subject {i} centered")),
            ..Default::default()
        })
        .collect()
}

pub fn base_prompt() -> StructuredPrompt {
    serde_json::from_value(serde_json::json!({
        "short_description": "A grandmother knits by the fireplace.",
        "photographic_characteristics": {"camera_angle": "eye-level"},
        "aesthetics": {"mood_atmosphere": "serene and cozy"},
        "lighting": {"conditions": "soft daylight"}
    }))
    .unwrap()
}
