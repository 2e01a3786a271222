//! Accepted vocabularies for the user-editable shot parameters.
//!
//! Camera angle, lens, mood and color scheme are extensible enumerations:
//! a fixed table of presets plus an "other" escape. Override values are
//! validated here before the merger writes them into a structured prompt.
//!
//! A raw value is accepted when it
//! - matches a preset key (case-insensitive, `-`, `_` and spaces equivalent),
//! - carries the [`CUSTOM_PREFIX`] escape followed by non-empty text, or
//! - for lenses only, names a focal length such as `40mm anamorphic`.
//!
//! Moods are free text resolved to a [`MoodFamily`] by keyword.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix that marks a value as deliberately outside the preset table.
pub const CUSTOM_PREFIX: &str = "custom:";

/// Maximum length of a custom vocabulary value in characters.
pub const MAX_CUSTOM_LENGTH: usize = 200;

/// Focal lengths outside the preset table, e.g. `40mm` or `28 mm anamorphic`.
static FOCAL_LENGTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{1,4}\s?mm\b").expect("valid regex"));

// ---------------------------------------------------------------------------
// Preset tables
// ---------------------------------------------------------------------------

/// A closed preset table for one editable field.
pub trait Vocabulary: Sized + Copy + 'static {
    /// Wire name of the field the vocabulary belongs to.
    const FIELD: &'static str;

    /// Every preset, in display order.
    fn all() -> &'static [Self];

    /// Canonical spelling written into structured prompts.
    fn key(&self) -> &'static str;

    /// Look a preset up by its key.
    fn from_key(raw: &str) -> Option<Self> {
        let wanted = normalize(raw);
        Self::all()
            .iter()
            .copied()
            .find(|preset| normalize(preset.key()) == wanted)
    }
}

/// Case-fold, trim, and treat `-`, `_` and runs of whitespace as one separator.
fn normalize(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraAngle {
    EyeLevel,
    LowAngle,
    HighAngle,
    TopDown,
    DutchAngle,
    OverTheShoulder,
    WormsEye,
    BirdsEye,
}

impl CameraAngle {
    /// Substitution order used to break camera-setup collisions in coverage plans.
    pub const ROTATION: [CameraAngle; 4] = [
        CameraAngle::EyeLevel,
        CameraAngle::LowAngle,
        CameraAngle::HighAngle,
        CameraAngle::TopDown,
    ];

    /// Phrase used when the angle is restated in a text prompt.
    pub fn description(&self) -> &'static str {
        match self {
            Self::EyeLevel => {
                "an eye-level camera angle, placing the viewer at the character's eye line"
            }
            Self::LowAngle => {
                "a low-angle shot looking up at the subject, making them feel powerful and dominant"
            }
            Self::HighAngle => {
                "a high-angle shot looking down on the subject, making them feel small or vulnerable"
            }
            Self::TopDown => "a top-down, overhead camera angle",
            Self::DutchAngle => "a tilted dutch angle that throws the horizon off balance",
            Self::OverTheShoulder => {
                "an over-the-shoulder angle framing the subject past a foreground figure"
            }
            Self::WormsEye => "a worm's-eye view from ground level looking sharply up",
            Self::BirdsEye => "a bird's-eye view from high above the scene",
        }
    }

    /// Find the first preset key mentioned anywhere in descriptive text.
    ///
    /// Render services tend to expand the key into a sentence
    /// ("a low-angle shot looking up..."), so exact matching is not enough.
    pub fn detect(text: &str) -> Option<Self> {
        let haystack = normalize(text);
        Self::all()
            .iter()
            .copied()
            .find(|angle| haystack.contains(&normalize(angle.key())))
    }
}

impl Vocabulary for CameraAngle {
    const FIELD: &'static str = "camera_angle";

    fn all() -> &'static [Self] {
        &[
            Self::EyeLevel,
            Self::LowAngle,
            Self::HighAngle,
            Self::TopDown,
            Self::DutchAngle,
            Self::OverTheShoulder,
            Self::WormsEye,
            Self::BirdsEye,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::EyeLevel => "eye-level",
            Self::LowAngle => "low-angle",
            Self::HighAngle => "high-angle",
            Self::TopDown => "top-down",
            Self::DutchAngle => "dutch-angle",
            Self::OverTheShoulder => "over-the-shoulder",
            Self::WormsEye => "worms-eye",
            Self::BirdsEye => "birds-eye",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LensPreset {
    UltraWide14,
    Wide24,
    Normal35,
    Normal50,
    Portrait85,
    Telephoto135,
}

impl LensPreset {
    pub fn description(&self) -> &'static str {
        match self {
            Self::UltraWide14 => "a 14mm ultra-wide lens that exaggerates depth and scale",
            Self::Wide24 => "a 24mm wide-angle lens that emphasizes space and environment",
            Self::Normal35 => "a 35mm lens that balances subject and environment",
            Self::Normal50 => "a 50mm lens for a natural, cinematic perspective",
            Self::Portrait85 => "an 85mm telephoto lens for intimate, compressed close-ups",
            Self::Telephoto135 => {
                "a 135mm telephoto lens that isolates the subject from a compressed background"
            }
        }
    }

    /// Find a preset whose focal length appears in descriptive lens text.
    pub fn detect(text: &str) -> Option<Self> {
        let haystack = normalize(text);
        Self::all().iter().copied().find(|preset| {
            let focal = preset.key().split(' ').next().unwrap_or_default();
            haystack
                .split(' ')
                .any(|word| word.trim_matches(|c: char| !c.is_alphanumeric()) == focal)
        })
    }
}

impl Vocabulary for LensPreset {
    const FIELD: &'static str = "lens_focal_length";

    fn all() -> &'static [Self] {
        &[
            Self::UltraWide14,
            Self::Wide24,
            Self::Normal35,
            Self::Normal50,
            Self::Portrait85,
            Self::Telephoto135,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::UltraWide14 => "14mm ultra-wide",
            Self::Wide24 => "24mm wide-angle",
            Self::Normal35 => "35mm",
            Self::Normal50 => "50mm",
            Self::Portrait85 => "85mm close-up",
            Self::Telephoto135 => "135mm telephoto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    Warm,
    Cool,
    TealAndOrange,
    Monochrome,
    Desaturated,
    Pastel,
    Neon,
    EarthTones,
    Vibrant,
    BlackAndWhite,
}

impl Vocabulary for ColorScheme {
    const FIELD: &'static str = "color_scheme";

    fn all() -> &'static [Self] {
        &[
            Self::Warm,
            Self::Cool,
            Self::TealAndOrange,
            Self::Monochrome,
            Self::Desaturated,
            Self::Pastel,
            Self::Neon,
            Self::EarthTones,
            Self::Vibrant,
            Self::BlackAndWhite,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::TealAndOrange => "teal and orange",
            Self::Monochrome => "monochrome",
            Self::Desaturated => "desaturated",
            Self::Pastel => "pastel",
            Self::Neon => "neon",
            Self::EarthTones => "earth tones",
            Self::Vibrant => "vibrant",
            Self::BlackAndWhite => "black and white",
        }
    }
}

// ---------------------------------------------------------------------------
// Mood families
// ---------------------------------------------------------------------------

/// Lighting implied by a mood family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodLighting {
    pub conditions: &'static str,
    pub shadows: &'static str,
}

/// A group of moods that share one lighting treatment.
///
/// Resolution is by keyword; the first family in table order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoodFamily {
    Dramatic,
    Energetic,
    Melancholic,
    Serene,
    Mysterious,
    Romantic,
}

impl MoodFamily {
    pub const ALL: [MoodFamily; 6] = [
        MoodFamily::Dramatic,
        MoodFamily::Energetic,
        MoodFamily::Melancholic,
        MoodFamily::Serene,
        MoodFamily::Mysterious,
        MoodFamily::Romantic,
    ];

    /// Suggested mood wording offered to users for this family.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dramatic => "dramatic and tense",
            Self::Energetic => "bright and energetic",
            Self::Melancholic => "melancholic and quiet",
            Self::Serene => "serene and cozy",
            Self::Mysterious => "mysterious and eerie",
            Self::Romantic => "romantic and tender",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Dramatic => &["dramatic", "tense"],
            Self::Energetic => &["bright", "energetic"],
            Self::Melancholic => &["melancholic", "quiet"],
            Self::Serene => &["serene", "cozy"],
            Self::Mysterious => &["mysterious", "eerie"],
            Self::Romantic => &["romantic", "tender"],
        }
    }

    pub fn lighting(&self) -> MoodLighting {
        match self {
            Self::Dramatic => MoodLighting {
                conditions:
                    "low-key, dramatic lighting with strong contrast between light and shadow",
                shadows: "deep, pronounced shadows that add tension and mystery",
            },
            Self::Energetic => MoodLighting {
                conditions: "bright, high-key lighting that fills the space with energy",
                shadows: "very soft, minimal shadows to keep the mood light",
            },
            Self::Melancholic => MoodLighting {
                conditions: "soft, dim lighting with cool or muted tones",
                shadows: "gentle but noticeable shadows that add introspection",
            },
            Self::Serene => MoodLighting {
                conditions: "warm, soft lighting that feels intimate and inviting",
                shadows: "soft, diffuse shadows that wrap gently around forms",
            },
            Self::Mysterious => MoodLighting {
                conditions: "dim, atmospheric lighting with haze and isolated pools of light",
                shadows: "long, obscuring shadows that hide parts of the frame",
            },
            Self::Romantic => MoodLighting {
                conditions: "warm, golden glow with gentle backlight",
                shadows: "faint, feathered shadows that flatter faces",
            },
        }
    }

    /// Resolve free mood text to a family by keyword.
    pub fn resolve(text: &str) -> Option<Self> {
        let haystack = text.to_lowercase();
        Self::ALL.into_iter().find(|family| {
            family
                .keywords()
                .iter()
                .any(|keyword| haystack.contains(keyword))
        })
    }
}

// ---------------------------------------------------------------------------
// Parsed override values
// ---------------------------------------------------------------------------

/// A validated vocabulary value: a preset or an accepted other value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    Preset(T),
    Other(String),
}

impl<T: Vocabulary> Choice<T> {
    /// The string written into the structured prompt.
    pub fn into_value(self) -> String {
        match self {
            Self::Preset(preset) => preset.key().to_string(),
            Self::Other(text) => text,
        }
    }
}

/// A validated mood: the text to store and the family it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mood {
    pub text: String,
    /// `None` for custom moods, which leave lighting untouched.
    pub family: Option<MoodFamily>,
}

/// Strip the custom escape, returning the payload if present.
fn custom_payload(field: &'static str, raw: &str) -> Result<Option<String>, CoreError> {
    let trimmed = raw.trim();
    let Some(prefix) = trimmed.get(..CUSTOM_PREFIX.len()) else {
        return Ok(None);
    };
    if !prefix.eq_ignore_ascii_case(CUSTOM_PREFIX) {
        return Ok(None);
    }
    let payload = trimmed[CUSTOM_PREFIX.len()..].trim();
    if payload.is_empty() {
        return Err(invalid(field, raw, "custom value must not be empty"));
    }
    if payload.chars().count() > MAX_CUSTOM_LENGTH {
        return Err(invalid(
            field,
            raw,
            &format!("custom value exceeds {MAX_CUSTOM_LENGTH} characters"),
        ));
    }
    Ok(Some(payload.to_string()))
}

fn invalid(field: &'static str, raw: &str, reason: &str) -> CoreError {
    CoreError::InvalidOverride {
        field,
        value: raw.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate a raw override value against a preset table.
///
/// Blank input means "no override" and yields `Ok(None)`.
pub fn parse_choice<T: Vocabulary>(raw: &str) -> Result<Option<Choice<T>>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    if let Some(payload) = custom_payload(T::FIELD, raw)? {
        return Ok(Some(Choice::Other(payload)));
    }
    T::from_key(raw)
        .map(|preset| Some(Choice::Preset(preset)))
        .ok_or_else(|| invalid(T::FIELD, raw, "not in the accepted vocabulary"))
}

/// Validate a lens override: a preset, a custom value, or a focal length.
pub fn parse_lens(raw: &str) -> Result<Option<Choice<LensPreset>>, CoreError> {
    match parse_choice::<LensPreset>(raw) {
        Err(CoreError::InvalidOverride { .. }) if FOCAL_LENGTH_RE.is_match(raw.trim()) => {
            Ok(Some(Choice::Other(raw.trim().to_string())))
        }
        other => other,
    }
}

/// Validate a mood override.
///
/// Accepted when the text names a known mood family or uses the custom
/// escape. Blank input yields `Ok(None)`.
pub fn parse_mood(raw: &str) -> Result<Option<Mood>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    if let Some(payload) = custom_payload("mood", raw)? {
        return Ok(Some(Mood {
            text: payload,
            family: None,
        }));
    }
    let text = raw.trim().to_string();
    match MoodFamily::resolve(&text) {
        Some(family) => Ok(Some(Mood {
            text,
            family: Some(family),
        })),
        None => Err(invalid("mood", raw, "does not name a known mood")),
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// One selectable option in a vocabulary listing.
#[derive(Debug, Clone, Serialize)]
pub struct VocabularyOption {
    pub value: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

/// Every preset table, shaped for clients that render option pickers.
#[derive(Debug, Clone, Serialize)]
pub struct VocabularyListing {
    pub camera_angle: Vec<VocabularyOption>,
    pub lens_focal_length: Vec<VocabularyOption>,
    pub mood: Vec<VocabularyOption>,
    pub color_scheme: Vec<VocabularyOption>,
    pub custom_prefix: &'static str,
}

pub fn listing() -> VocabularyListing {
    VocabularyListing {
        camera_angle: CameraAngle::all()
            .iter()
            .map(|a| VocabularyOption {
                value: a.key(),
                description: Some(a.description()),
            })
            .collect(),
        lens_focal_length: LensPreset::all()
            .iter()
            .map(|l| VocabularyOption {
                value: l.key(),
                description: Some(l.description()),
            })
            .collect(),
        mood: MoodFamily::ALL
            .iter()
            .map(|m| VocabularyOption {
                value: m.label(),
                description: Some(m.lighting().conditions),
            })
            .collect(),
        color_scheme: ColorScheme::all()
            .iter()
            .map(|c| VocabularyOption {
                value: c.key(),
                description: None,
            })
            .collect(),
        custom_prefix: CUSTOM_PREFIX,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
