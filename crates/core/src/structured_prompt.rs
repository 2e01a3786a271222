//! The structured description of a shot's visual parameters.
//!
//! Mirrors the JSON the render service accepts and returns. Only the
//! fields the merger reasons about are typed; every other key (objects,
//! background setting, style medium, composition, ...) is carried in the
//! `extra` maps so a prompt round-trips without loss.
//!
//! Parsing is lenient per key: a typed key whose value has an unexpected
//! JSON type stays in `extra` under its own name instead of failing the
//! whole prompt.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Camera parameters. Serialized under `photographic_characteristics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Camera {
    #[serde(rename = "camera_angle", skip_serializing_if = "Option::is_none")]
    pub angle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_focal_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_of_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Camera {
    pub fn is_empty(&self) -> bool {
        self.angle.is_none()
            && self.lens_focal_length.is_none()
            && self.depth_of_field.is_none()
            && self.focus.is_none()
            && self.extra.is_empty()
    }
}

impl From<Map<String, Value>> for Camera {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            angle: take_string(&mut map, &["camera_angle", "angle"]),
            lens_focal_length: take_string(&mut map, &["lens_focal_length"]),
            depth_of_field: take_string(&mut map, &["depth_of_field"]),
            focus: take_string(&mut map, &["focus"]),
            extra: map,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Lighting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadows: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lighting {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_none()
            && self.direction.is_none()
            && self.shadows.is_none()
            && self.extra.is_empty()
    }
}

impl From<Map<String, Value>> for Lighting {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            conditions: take_string(&mut map, &["conditions"]),
            direction: take_string(&mut map, &["direction"]),
            shadows: take_string(&mut map, &["shadows"]),
            extra: map,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Aesthetics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_atmosphere: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    /// Quality score assigned by the render service. Never set locally.
    /// Kept as the service's number so `7` stays `7` on the way back out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aesthetic_score: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Aesthetics {
    pub fn is_empty(&self) -> bool {
        self.mood_atmosphere.is_none()
            && self.color_scheme.is_none()
            && self.aesthetic_score.is_none()
            && self.extra.is_empty()
    }
}

impl From<Map<String, Value>> for Aesthetics {
    fn from(mut map: Map<String, Value>) -> Self {
        let aesthetic_score = match map.get("aesthetic_score") {
            Some(Value::Number(_)) => match map.remove("aesthetic_score") {
                Some(Value::Number(score)) => Some(score),
                _ => None,
            },
            _ => None,
        };
        Self {
            mood_atmosphere: take_string(&mut map, &["mood_atmosphere"]),
            color_scheme: take_string(&mut map, &["color_scheme"]),
            aesthetic_score,
            extra: map,
        }
    }
}

/// A shot's structured prompt as exchanged with the render service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct StructuredPrompt {
    /// Subject/action summary from the original generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(
        rename = "photographic_characteristics",
        skip_serializing_if = "Camera::is_empty"
    )]
    pub camera: Camera,
    #[serde(skip_serializing_if = "Lighting::is_empty")]
    pub lighting: Lighting,
    #[serde(skip_serializing_if = "Aesthetics::is_empty")]
    pub aesthetics: Aesthetics,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for StructuredPrompt {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            short_description: take_string(&mut map, &["short_description"]),
            context: take_string(&mut map, &["context"]),
            camera: take_object(&mut map, &["photographic_characteristics", "camera"])
                .map(Camera::from)
                .unwrap_or_default(),
            lighting: take_object(&mut map, &["lighting"])
                .map(Lighting::from)
                .unwrap_or_default(),
            aesthetics: take_object(&mut map, &["aesthetics"])
                .map(Aesthetics::from)
                .unwrap_or_default(),
            extra: map,
        }
    }
}

/// Remove and return the first of `keys` holding a string. Keys holding
/// anything else are left in place.
fn take_string(map: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
    let key = keys.iter().find(|key| matches!(map.get(**key), Some(Value::String(_))))?;
    match map.remove(*key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

fn take_object(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Map<String, Value>> {
    let key = keys.iter().find(|key| matches!(map.get(**key), Some(Value::Object(_))))?;
    match map.remove(*key) {
        Some(Value::Object(section)) => Some(section),
        _ => None,
    }
}

impl StructuredPrompt {
    /// `true` when no field at all is set, i.e. there is nothing to merge into.
    pub fn is_empty(&self) -> bool {
        self.short_description.is_none()
            && self.context.is_none()
            && self.camera.is_empty()
            && self.lighting.is_empty()
            && self.aesthetics.is_empty()
            && self.extra.is_empty()
    }

    /// Subject text used to open a regenerated text prompt.
    pub fn subject(&self) -> Option<&str> {
        self.short_description
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.context.as_deref().filter(|s| !s.trim().is_empty()))
    }

    /// Drop leftover `extra` entries that a typed field now covers, so a
    /// value set by the merger is serialized once under its own key.
    pub fn drop_shadowed_extras(&mut self) {
        fn drop_if(extra: &mut Map<String, Value>, set: bool, keys: &[&str]) {
            if set {
                for key in keys {
                    extra.remove(*key);
                }
            }
        }

        let camera = &mut self.camera;
        drop_if(&mut camera.extra, camera.angle.is_some(), &["camera_angle", "angle"]);
        drop_if(&mut camera.extra, camera.lens_focal_length.is_some(), &["lens_focal_length"]);
        drop_if(&mut camera.extra, camera.depth_of_field.is_some(), &["depth_of_field"]);
        drop_if(&mut camera.extra, camera.focus.is_some(), &["focus"]);

        let lighting = &mut self.lighting;
        drop_if(&mut lighting.extra, lighting.conditions.is_some(), &["conditions"]);
        drop_if(&mut lighting.extra, lighting.direction.is_some(), &["direction"]);
        drop_if(&mut lighting.extra, lighting.shadows.is_some(), &["shadows"]);

        let aesthetics = &mut self.aesthetics;
        drop_if(&mut aesthetics.extra, aesthetics.mood_atmosphere.is_some(), &["mood_atmosphere"]);
        drop_if(&mut aesthetics.extra, aesthetics.color_scheme.is_some(), &["color_scheme"]);

        drop_if(&mut self.extra, self.short_description.is_some(), &["short_description"]);
        drop_if(&mut self.extra, self.context.is_some(), &["context"]);
        drop_if(
            &mut self.extra,
            !self.camera.is_empty(),
            &["photographic_characteristics", "camera"],
        );
        drop_if(&mut self.extra, !self.lighting.is_empty(), &["lighting"]);
        drop_if(&mut self.extra, !self.aesthetics.is_empty(), &["aesthetics"]);
    }

    /// Parse a render-service payload that may be an object or a JSON string.
    ///
    /// An object always parses; keys with unexpected types are kept as-is.
    /// A string that is not a JSON object degrades to an empty prompt
    /// rather than failing the whole render.
    pub fn from_service_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from(map.clone()),
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Self::from(map),
                _ => Self::default(),
            },
            _ => Self::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
