#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use cinefibo_api::config::ServerConfig;
use cinefibo_api::router::build_app_router;
use cinefibo_api::state::AppState;
use cinefibo_core::coverage::ShotPlanDraft;
use cinefibo_fibo::{RenderError, RenderOutput, RenderRequest, RenderService};
use cinefibo_pipeline::CoverageConfig;
use cinefibo_reasoning::{ReasoningError, ReasoningService};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Service fakes
// ---------------------------------------------------------------------------

/// Renders everything except prompts mentioning "blocked" (moderated) or
/// "offline" (unavailable).
#[derive(Default)]
pub struct FakeRenderer {
    pub calls: AtomicUsize,
}

impl FakeRenderer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RenderService for FakeRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderOutput, RenderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let text = format!(
            "{} {}",
            request.prompt.as_deref().unwrap_or_default(),
            request
                .structured_prompt
                .as_ref()
                .and_then(|sp| sp.short_description.as_deref())
                .unwrap_or_default()
        );
        if text.contains("blocked") {
            return Err(RenderError::ContentModerated("prompt flagged".into()));
        }
        if text.contains("offline") {
            return Err(RenderError::Unavailable("upstream 500".into()));
        }

        let mut used = request.structured_prompt.unwrap_or_default();
        if used.short_description.is_none() {
            used.short_description = request.prompt;
        }
        Ok(RenderOutput {
            image_url: format!("https://cdn.example/render-{call}.png"),
            structured_prompt: used,
            request_id: format!("req-{call}"),
        })
    }
}

/// Plans `num_shots` distinct close-ups; scenes mentioning "unplannable"
/// make every planning call fail. In a scene mentioning "flaky", shot 2's
/// description is one the renderer moderates.
pub struct FakeReasoning;

#[async_trait]
impl ReasoningService for FakeReasoning {
    async fn describe_shot(&self, scene: &str) -> Result<String, ReasoningError> {
        Ok(format!("Low-angle 35mm shot: {scene}"))
    }

    async fn plan_coverage(
        &self,
        scene: &str,
        _project_type: Option<&str>,
        num_shots: u32,
    ) -> Result<Vec<ShotPlanDraft>, ReasoningError> {
        if scene.contains("unplannable") {
            return Err(ReasoningError::Response("model returned no shots".into()));
        }
        Ok((1..=num_shots)
            .map(|i| ShotPlanDraft {
                shot_type: Some("close-up".to_string()),
                description: Some(if scene.contains("flaky") && i == 2 {
                    format!("{scene} blocked detail {i}")
                } else {
                    format!("{scene} detail {i}")
                }),
                framing: Some(format!("detail {i}")),
                ..Default::default()
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router against `pool` and the given renderer.
pub fn build_app_with(pool: PgPool, render: Arc<FakeRenderer>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        render,
        reasoning: Arc::new(FakeReasoning),
        coverage: Arc::new(CoverageConfig::default()),
    };
    build_app_router(state, &config)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, Arc::new(FakeRenderer::default()))
}

/// A pool that never connects, for routes that do not touch the database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/cinefibo_unused")
        .unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
