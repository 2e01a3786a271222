//! `OpenAiReasoning` against an in-process fake chat-completions endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use cinefibo_reasoning::{OpenAiReasoning, ReasoningConfig, ReasoningError, ReasoningService};
use serde_json::{json, Value};

#[derive(Clone)]
struct Fake {
    reply: Option<String>,
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn completions(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    fake.requests.lock().unwrap().push((auth, body));
    match &fake.reply {
        Some(content) => Json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
        .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "model overloaded").into_response(),
    }
}

async fn start(reply: Option<&str>) -> (OpenAiReasoning, Fake) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/v1", listener.local_addr().unwrap());
    let fake = Fake {
        reply: reply.map(str::to_string),
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(fake.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ReasoningConfig {
        api_key: "sk-test".to_string(),
        model: "gpt-4o-mini".to_string(),
        api_base: base,
        timeout: Duration::from_secs(5),
    };
    (OpenAiReasoning::new(&config).unwrap(), fake)
}

#[tokio::test]
async fn describe_shot_returns_trimmed_text() {
    let (reasoning, fake) = start(Some("  A slow push-in on the detective.  ")).await;

    let text = reasoning.describe_shot("A detective waits.").await.unwrap();
    assert_eq!(text, "A slow push-in on the detective.");

    let requests = fake.requests.lock().unwrap();
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("A detective waits."));
    assert!(body.get("response_format").is_none());
}

#[tokio::test]
async fn plan_coverage_requests_json_and_parses_drafts() {
    let reply = r#"{"shots": [
        {"shot_type": "wide", "description": "the whole bar"},
        {"shot_type": "close-up", "description": "bartender's hands"}
    ]}"#;
    let (reasoning, fake) = start(Some(reply)).await;

    let drafts = reasoning
        .plan_coverage("Last call at a dive bar.", Some("short film"), 2)
        .await
        .unwrap();
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[1].shot_type.as_deref(), Some("close-up"));

    let requests = fake.requests.lock().unwrap();
    assert_eq!(requests[0].1["response_format"]["type"], "json_object");
}

#[tokio::test]
async fn upstream_failure_is_response_error() {
    let (reasoning, _fake) = start(None).await;
    assert_matches!(
        reasoning.describe_shot("anything").await,
        Err(ReasoningError::Response(msg)) if msg.contains("503")
    );
}
