//! Editable control values derived from a structured prompt.
//!
//! Clients call [`init_controls_from`] whenever a new structured prompt
//! arrives, let the user edit the result, then send back only what changed
//! via [`ControlsState::overrides_since`].

use serde::{Deserialize, Serialize};

use crate::merge::OverrideRequest;
use crate::structured_prompt::StructuredPrompt;
use crate::vocabulary::{
    CameraAngle, ColorScheme, LensPreset, MoodFamily, Vocabulary, CUSTOM_PREFIX,
    MAX_CUSTOM_LENGTH,
};

/// Current value of each editable control.
///
/// Every value is either a vocabulary preset or a `custom:` value no longer
/// than the custom limit, so submitting it unchanged always passes override
/// validation. Longer prompt text is cut to fit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlsState {
    pub camera_angle: Option<String>,
    pub lens_focal_length: Option<String>,
    pub mood: Option<String>,
    pub color_scheme: Option<String>,
}

impl ControlsState {
    /// Build the sparse override for controls edited since `initial`.
    ///
    /// Clearing a control is not an edit: overrides cannot unset a field.
    pub fn overrides_since(&self, initial: &ControlsState) -> OverrideRequest {
        fn changed(now: &Option<String>, before: &Option<String>) -> Option<String> {
            match now {
                Some(value) if Some(value) != before.as_ref() => Some(value.clone()),
                _ => None,
            }
        }

        OverrideRequest {
            camera_angle: changed(&self.camera_angle, &initial.camera_angle),
            lens_focal_length: changed(&self.lens_focal_length, &initial.lens_focal_length),
            mood: changed(&self.mood, &initial.mood),
            color_scheme: changed(&self.color_scheme, &initial.color_scheme),
            lighting: None,
        }
    }
}

/// Map a structured prompt onto control values.
pub fn init_controls_from(prompt: &StructuredPrompt) -> ControlsState {
    ControlsState {
        camera_angle: present(prompt.camera.angle.as_deref()).map(|text| {
            CameraAngle::from_key(text)
                .or_else(|| CameraAngle::detect(text))
                .map(|a| a.key().to_string())
                .unwrap_or_else(|| custom(text))
        }),
        lens_focal_length: present(prompt.camera.lens_focal_length.as_deref()).map(|text| {
            LensPreset::from_key(text)
                .or_else(|| LensPreset::detect(text))
                .map(|l| l.key().to_string())
                .unwrap_or_else(|| custom(text))
        }),
        mood: present(prompt.aesthetics.mood_atmosphere.as_deref()).map(|text| {
            if MoodFamily::resolve(text).is_some() {
                text.to_string()
            } else {
                custom(text)
            }
        }),
        color_scheme: present(prompt.aesthetics.color_scheme.as_deref()).map(|text| {
            ColorScheme::from_key(text)
                .map(|c| c.key().to_string())
                .unwrap_or_else(|| custom(text))
        }),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn custom(text: &str) -> String {
    let fitted: String = text.chars().take(MAX_CUSTOM_LENGTH).collect();
    format!("{CUSTOM_PREFIX} {}", fitted.trim_end())
}
