//! Coherent application of user overrides to a structured prompt.
//!
//! [`merge`] is the only sanctioned way to change a structured prompt after
//! the render service produced it. It validates every override against the
//! vocabulary tables, writes the accepted values, keeps lighting in line
//! with a newly chosen mood, and restates the result as text.
//!
//! Precedence within one request: a lighting field given directly always
//! wins over the same field derived from the mood.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::prompt_text::build_prompt_text;
use crate::structured_prompt::StructuredPrompt;
use crate::vocabulary::{parse_choice, parse_lens, parse_mood, CameraAngle, ColorScheme};

/// Maximum length of a directly supplied lighting value in characters.
pub const MAX_LIGHTING_LENGTH: usize = 500;

/// Direct lighting edits supplied alongside other overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadows: Option<String>,
}

/// A sparse set of user edits. Unset or blank fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_angle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens_focal_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<LightingOverride>,
}

impl OverrideRequest {
    pub fn is_empty(&self) -> bool {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().map_or(true, |s| s.trim().is_empty())
        }
        blank(&self.camera_angle)
            && blank(&self.lens_focal_length)
            && blank(&self.mood)
            && blank(&self.color_scheme)
            && self.lighting.as_ref().map_or(true, |l| {
                blank(&l.conditions) && blank(&l.direction) && blank(&l.shadows)
            })
    }
}

/// Result of a merge: the new structured prompt and its text restatement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedPrompt {
    pub structured_prompt: StructuredPrompt,
    pub prompt_text: String,
}

/// Apply `overrides` to `base`.
///
/// All overrides are validated before anything is written, so a rejected
/// request never yields a half-merged prompt.
///
/// # Errors
///
/// - [`CoreError::MissingBasePrompt`] if `base` is absent or empty.
/// - [`CoreError::InvalidOverride`] if a value is outside its vocabulary.
pub fn merge(
    base: Option<&StructuredPrompt>,
    overrides: &OverrideRequest,
) -> Result<MergedPrompt, CoreError> {
    let base = base
        .filter(|b| !b.is_empty())
        .ok_or(CoreError::MissingBasePrompt)?;

    let camera_angle = match overrides.camera_angle.as_deref() {
        Some(raw) => parse_choice::<CameraAngle>(raw)?,
        None => None,
    };
    let lens = match overrides.lens_focal_length.as_deref() {
        Some(raw) => parse_lens(raw)?,
        None => None,
    };
    let mood = match overrides.mood.as_deref() {
        Some(raw) => parse_mood(raw)?,
        None => None,
    };
    let color = match overrides.color_scheme.as_deref() {
        Some(raw) => parse_choice::<ColorScheme>(raw)?,
        None => None,
    };
    let direct = overrides
        .lighting
        .as_ref()
        .map(validate_lighting)
        .transpose()?
        .unwrap_or_default();

    let mut prompt = base.clone();

    if let Some(angle) = camera_angle {
        prompt.camera.angle = Some(angle.into_value());
    }
    if let Some(lens) = lens {
        prompt.camera.lens_focal_length = Some(lens.into_value());
    }
    if let Some(mood) = mood {
        prompt.aesthetics.mood_atmosphere = Some(mood.text);
        if let Some(family) = mood.family {
            let derived = family.lighting();
            prompt.lighting.conditions = Some(derived.conditions.to_string());
            prompt.lighting.shadows = Some(derived.shadows.to_string());
        }
    }
    if let Some(color) = color {
        prompt.aesthetics.color_scheme = Some(color.into_value());
    }

    // Direct lighting is applied last so it overrides anything mood-derived.
    if let Some(conditions) = direct.conditions {
        prompt.lighting.conditions = Some(conditions);
    }
    if let Some(direction) = direct.direction {
        prompt.lighting.direction = Some(direction);
    }
    if let Some(shadows) = direct.shadows {
        prompt.lighting.shadows = Some(shadows);
    }

    prompt.drop_shadowed_extras();
    let prompt_text = build_prompt_text(&prompt);
    Ok(MergedPrompt {
        structured_prompt: prompt,
        prompt_text,
    })
}

/// Trim direct lighting values, dropping blanks and rejecting overlong text.
fn validate_lighting(lighting: &LightingOverride) -> Result<LightingOverride, CoreError> {
    fn field(
        name: &'static str,
        value: &Option<String>,
    ) -> Result<Option<String>, CoreError> {
        let Some(raw) = value else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > MAX_LIGHTING_LENGTH {
            return Err(CoreError::InvalidOverride {
                field: name,
                value: raw.clone(),
                reason: format!("exceeds {MAX_LIGHTING_LENGTH} characters"),
            });
        }
        Ok(Some(trimmed.to_string()))
    }

    Ok(LightingOverride {
        conditions: field("lighting.conditions", &lighting.conditions)?,
        direction: field("lighting.direction", &lighting.direction)?,
        shadows: field("lighting.shadows", &lighting.shadows)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
