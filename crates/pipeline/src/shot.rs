//! Single-shot operations: direct renders, generation from a scene, and
//! tuning an existing shot.

use cinefibo_core::error::CoreError;
use cinefibo_core::merge::{merge, OverrideRequest};
use cinefibo_core::structured_prompt::StructuredPrompt;
use cinefibo_fibo::{RenderOutput, RenderRequest, RenderService};
use cinefibo_reasoning::ReasoningService;
use serde::Serialize;

use crate::error::PipelineError;

/// A shot generated from scene text.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedShot {
    /// Description written by the reasoning service and sent to the renderer.
    pub shot_prompt: String,
    pub image_url: String,
    pub structured_prompt: StructuredPrompt,
    pub request_id: String,
}

/// A re-render after user edits.
#[derive(Debug, Clone, Serialize)]
pub struct TunedShot {
    pub image_url: String,
    pub structured_prompt: StructuredPrompt,
    pub request_id: String,
    /// Text prompt derived from the merged structured prompt.
    pub prompt_text: String,
}

/// Render a prompt and/or structured prompt as given.
pub async fn render_direct(
    render: &dyn RenderService,
    request: RenderRequest,
) -> Result<RenderOutput, PipelineError> {
    if request.is_empty() {
        return Err(CoreError::Validation(
            "either prompt or structured_prompt must be provided".to_string(),
        )
        .into());
    }
    Ok(render.render(request).await?)
}

/// Describe one cinematic shot for a scene, then render it.
pub async fn generate_shot(
    reasoning: &dyn ReasoningService,
    render: &dyn RenderService,
    scene: &str,
) -> Result<GeneratedShot, PipelineError> {
    let scene = scene.trim();
    if scene.is_empty() {
        return Err(CoreError::EmptyScene.into());
    }

    let shot_prompt = reasoning
        .describe_shot(scene)
        .await
        .map_err(|e| PipelineError::ReasoningUnavailable(e.to_string()))?;

    let output = render
        .render(RenderRequest {
            prompt: Some(shot_prompt.clone()),
            structured_prompt: None,
        })
        .await?;
    tracing::info!(request_id = %output.request_id, "Shot generated");

    Ok(GeneratedShot {
        shot_prompt,
        image_url: output.image_url,
        structured_prompt: output.structured_prompt,
        request_id: output.request_id,
    })
}

/// Apply overrides to a shot's structured prompt and re-render it.
///
/// The merge is validated before the render service is called, so invalid
/// edits cost nothing.
pub async fn tune_shot(
    render: &dyn RenderService,
    base: Option<&StructuredPrompt>,
    overrides: &OverrideRequest,
) -> Result<TunedShot, PipelineError> {
    let merged = merge(base, overrides)?;

    let output = render
        .render(RenderRequest {
            prompt: Some(merged.prompt_text.clone()),
            structured_prompt: Some(merged.structured_prompt),
        })
        .await?;
    tracing::info!(request_id = %output.request_id, "Shot tuned");

    Ok(TunedShot {
        image_url: output.image_url,
        structured_prompt: output.structured_prompt,
        request_id: output.request_id,
        prompt_text: merged.prompt_text,
    })
}
