//! Natural-language restatement of a structured prompt.
//!
//! The render service treats the structured JSON as authoritative; the
//! text built here reinforces it. Clauses always appear in the same order
//! (subject, camera angle, lens, lighting, mood, color) so identical
//! prompts always produce identical text.

use crate::structured_prompt::StructuredPrompt;
use crate::vocabulary::{CameraAngle, LensPreset, Vocabulary};

/// Text used when a structured prompt has nothing to restate.
pub const FALLBACK_PROMPT: &str =
    "A cinematic, well-composed shot suitable for film pre-production.";

/// Build the text prompt for a structured prompt.
pub fn build_prompt_text(prompt: &StructuredPrompt) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(subject) = prompt.subject() {
        parts.push(sentence(subject.trim()));
    }

    let mut camera_bits: Vec<&str> = Vec::new();
    if let Some(angle) = non_blank(prompt.camera.angle.as_deref()) {
        camera_bits.push(
            CameraAngle::from_key(angle)
                .map(|a| a.description())
                .unwrap_or(angle),
        );
    }
    if let Some(lens) = non_blank(prompt.camera.lens_focal_length.as_deref()) {
        camera_bits.push(
            LensPreset::from_key(lens)
                .map(|l| l.description())
                .unwrap_or(lens),
        );
    }
    if !camera_bits.is_empty() {
        parts.push(format!("The shot uses {}.", camera_bits.join(" and ")));
    }

    let lighting = &prompt.lighting;
    let mut light_bits: Vec<&str> = Vec::new();
    if let Some(conditions) = non_blank(lighting.conditions.as_deref()) {
        light_bits.push(conditions);
    }
    if let Some(direction) = non_blank(lighting.direction.as_deref()) {
        light_bits.push(direction);
    }
    if let Some(shadows) = non_blank(lighting.shadows.as_deref()) {
        light_bits.push(shadows);
    }
    if !light_bits.is_empty() {
        parts.push(format!("Lighting: {}.", light_bits.join("; ")));
    }

    let mood = non_blank(prompt.aesthetics.mood_atmosphere.as_deref());
    let color = non_blank(prompt.aesthetics.color_scheme.as_deref());
    match (mood, color) {
        (Some(mood), Some(color)) => parts.push(format!(
            "The overall look is {mood}, with a {color} color palette."
        )),
        (Some(mood), None) => parts.push(format!("The overall look is {mood}.")),
        (None, Some(color)) => {
            parts.push(format!("The overall look uses a {color} color palette."))
        }
        (None, None) => {}
    }

    if parts.is_empty() {
        return FALLBACK_PROMPT.to_string();
    }
    parts.join(" ")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Terminate a clause with a period unless it already ends a sentence.
fn sentence(text: &str) -> String {
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}
