use async_trait::async_trait;
use cinefibo_core::coverage::ShotPlanDraft;
use serde::Deserialize;
use thiserror::Error;

use crate::chat::{ChatClient, ChatPrompt};
use crate::config::ReasoningConfig;
use crate::prompts;

/// Reasoning errors
#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("http error: {0}")]
    Http(String),
    #[error("response error: {0}")]
    Response(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The creative half of shot design.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Write one camera-aware shot description for a scene.
    async fn describe_shot(&self, scene: &str) -> Result<String, ReasoningError>;

    /// Draft up to `num_shots` coverage shots for a scene.
    ///
    /// Drafts are not validated here; the planner owns normalization.
    async fn plan_coverage(
        &self,
        scene: &str,
        project_type: Option<&str>,
        num_shots: u32,
    ) -> Result<Vec<ShotPlanDraft>, ReasoningError>;
}

/// [`ReasoningService`] backed by an OpenAI-compatible endpoint.
pub struct OpenAiReasoning {
    chat: ChatClient,
}

impl OpenAiReasoning {
    pub fn new(config: &ReasoningConfig) -> Result<Self, ReasoningError> {
        Ok(Self {
            chat: ChatClient::new(config)?,
        })
    }
}

#[async_trait]
impl ReasoningService for OpenAiReasoning {
    async fn describe_shot(&self, scene: &str) -> Result<String, ReasoningError> {
        tracing::debug!(scene_chars = scene.len(), "Requesting shot description");
        self.chat
            .complete(ChatPrompt {
                system: prompts::SHOT_DESIGNER_SYSTEM.to_string(),
                user: prompts::shot_designer_user(scene),
                temperature: prompts::TEMPERATURE,
                json_mode: false,
            })
            .await
    }

    async fn plan_coverage(
        &self,
        scene: &str,
        project_type: Option<&str>,
        num_shots: u32,
    ) -> Result<Vec<ShotPlanDraft>, ReasoningError> {
        tracing::debug!(num_shots, project_type = ?project_type, "Requesting coverage plan");
        let content = self
            .chat
            .complete(ChatPrompt {
                system: prompts::COVERAGE_PLANNER_SYSTEM.to_string(),
                user: prompts::coverage_planner_user(scene, project_type, num_shots),
                temperature: prompts::TEMPERATURE,
                json_mode: true,
            })
            .await?;
        parse_plan_response(&content)
    }
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    shots: Vec<ShotPlanDraft>,
}

/// Parse `{"shots": [...]}` out of a model answer, tolerating prose or a
/// code fence around the object.
pub fn parse_plan_response(content: &str) -> Result<Vec<ShotPlanDraft>, ReasoningError> {
    let json = extract_json(content)
        .ok_or_else(|| ReasoningError::Serialization("no JSON object in response".into()))?;
    let parsed: PlanResponse =
        serde_json::from_str(json).map_err(|e| ReasoningError::Serialization(e.to_string()))?;
    if parsed.shots.is_empty() {
        return Err(ReasoningError::Response("plan contained no shots".into()));
    }
    Ok(parsed.shots)
}

fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
