//! Coverage plans: the shot list a planner produces for one scene.
//!
//! The reasoning service drafts shots freely; this module turns drafts into
//! [`ShotPlan`]s, guarantees that no two plans share a camera setup, and
//! derives the structured prompt each shot is rendered from.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::prompt_text::build_prompt_text;
use crate::structured_prompt::StructuredPrompt;
use crate::types::PlanId;
use crate::vocabulary::{CameraAngle, MoodFamily, Vocabulary};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_SHOTS: u32 = 1;
pub const MAX_SHOTS: u32 = 12;
pub const DEFAULT_SHOTS: u32 = 6;

/// Angle used when a draft omits one.
pub const DEFAULT_CAMERA_ANGLE: &str = "eye-level";
/// Lens used when a draft omits one.
pub const DEFAULT_LENS: &str = "35mm";

const DEEP_FOCUS: &str = "deep focus, everything sharp from foreground to background";
const MODERATE_FOCUS: &str = "moderate depth of field, subject sharp with a softened background";
const SHALLOW_FOCUS: &str = "shallow depth of field isolating the subject";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One planned shot in a coverage set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotPlan {
    pub id: PlanId,
    pub label: String,
    pub shot_type: String,
    pub description: String,
    pub camera_angle: String,
    pub lens: String,
    pub framing: String,
    pub lighting: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl ShotPlan {
    /// The camera setup two plans in one set must never share.
    pub fn signature(&self) -> (String, String, String) {
        (
            fold(&self.shot_type),
            fold(&self.camera_angle),
            fold(&self.framing),
        )
    }
}

/// A shot record as drafted by the reasoning service. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotPlanDraft {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub shot_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub camera_angle: Option<String>,
    #[serde(default)]
    pub lens: Option<String>,
    #[serde(default)]
    pub framing: Option<String>,
    #[serde(default)]
    pub lighting: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

fn fold(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Clamp a requested shot count into `MIN_SHOTS..=MAX_SHOTS`.
pub fn clamp_num_shots(requested: i64) -> u32 {
    requested.clamp(i64::from(MIN_SHOTS), i64::from(MAX_SHOTS)) as u32
}

/// Turn drafts into exactly `num_shots` distinct plans with ids `1..=num_shots`.
///
/// Drafts without a shot type or description are dropped; surplus drafts
/// are truncated.
///
/// # Errors
///
/// [`CoreError::Validation`] when fewer than `num_shots` drafts are usable.
pub fn normalize_drafts(
    drafts: Vec<ShotPlanDraft>,
    num_shots: u32,
) -> Result<Vec<ShotPlan>, CoreError> {
    let mut plans: Vec<ShotPlan> = drafts
        .into_iter()
        .filter_map(plan_from_draft)
        .take(num_shots as usize)
        .collect();

    if plans.len() < num_shots as usize {
        return Err(CoreError::Validation(format!(
            "planner produced {} usable shots, expected {num_shots}",
            plans.len()
        )));
    }

    for (index, plan) in plans.iter_mut().enumerate() {
        plan.id = index as PlanId + 1;
    }
    enforce_distinct(&mut plans);
    Ok(plans)
}

fn plan_from_draft(draft: ShotPlanDraft) -> Option<ShotPlan> {
    let shot_type = filled(draft.shot_type)?;
    let description = filled(draft.description)?;
    Some(ShotPlan {
        id: 0,
        label: filled(draft.label).unwrap_or_else(|| shot_type.clone()),
        camera_angle: filled(draft.camera_angle)
            .unwrap_or_else(|| DEFAULT_CAMERA_ANGLE.to_string()),
        lens: filled(draft.lens).unwrap_or_else(|| DEFAULT_LENS.to_string()),
        framing: filled(draft.framing).unwrap_or_else(|| shot_type.clone()),
        lighting: filled(draft.lighting).unwrap_or_default(),
        purpose: filled(draft.purpose),
        shot_type,
        description,
    })
}

/// Rewrite colliding plans so every signature in the set is unique.
///
/// Earlier plans are kept as drafted. A later plan that collides takes the
/// first camera angle (rotation first, then the rest of the vocabulary)
/// that makes it unique; if none does, its framing is marked as an
/// alternate take.
pub fn enforce_distinct(plans: &mut [ShotPlan]) {
    let substitutes: Vec<CameraAngle> = CameraAngle::ROTATION
        .into_iter()
        .chain(
            CameraAngle::all()
                .iter()
                .copied()
                .filter(|a| !CameraAngle::ROTATION.contains(a)),
        )
        .collect();

    let mut seen: HashSet<(String, String, String)> = HashSet::new();

    for plan in plans.iter_mut() {
        if seen.insert(plan.signature()) {
            continue;
        }

        let replacement = substitutes.iter().find(|angle| {
            let (shot_type, _, framing) = plan.signature();
            !seen.contains(&(shot_type, fold(angle.key()), framing))
        });

        if let Some(angle) = replacement {
            plan.camera_angle = angle.key().to_string();
        } else {
            let base = plan.framing.clone();
            let mut take = 2;
            loop {
                plan.framing = format!("{base} (alternate take {take})");
                if !seen.contains(&plan.signature()) {
                    break;
                }
                take += 1;
            }
        }
        seen.insert(plan.signature());
    }
}

// ---------------------------------------------------------------------------
// Render seeds
// ---------------------------------------------------------------------------

/// Structured prompt a planned shot is rendered from.
pub fn seed_prompt(plan: &ShotPlan) -> StructuredPrompt {
    let mut seed = StructuredPrompt {
        short_description: Some(plan.description.clone()),
        ..Default::default()
    };

    seed.camera.angle = Some(
        CameraAngle::from_key(&plan.camera_angle)
            .map(|a| a.key().to_string())
            .unwrap_or_else(|| plan.camera_angle.clone()),
    );
    seed.camera.lens_focal_length = Some(plan.lens.clone());
    seed.camera.depth_of_field = depth_of_field(plan).map(str::to_string);

    if !plan.lighting.trim().is_empty() {
        seed.lighting.conditions = Some(plan.lighting.clone());
        seed.lighting.shadows =
            MoodFamily::resolve(&plan.lighting).map(|family| family.lighting().shadows.to_string());
    }

    seed
}

/// Depth of field implied by the shot scale named in the framing or shot type.
fn depth_of_field(plan: &ShotPlan) -> Option<&'static str> {
    let scale = format!("{} {}", plan.shot_type, plan.framing).to_lowercase();
    if ["close", "insert", "detail", "reaction"]
        .iter()
        .any(|word| scale.contains(word))
    {
        Some(SHALLOW_FOCUS)
    } else if ["wide", "establishing", "long", "full"]
        .iter()
        .any(|word| scale.contains(word))
    {
        Some(DEEP_FOCUS)
    } else if scale.contains("medium") {
        Some(MODERATE_FOCUS)
    } else {
        None
    }
}

/// Text prompt for a planned shot, led by its shot type and framing.
pub fn shot_prompt_text(plan: &ShotPlan, seed: &StructuredPrompt) -> String {
    format!(
        "{} shot. Framing: {}. {}",
        plan.shot_type.trim_end_matches('.'),
        plan.framing.trim_end_matches('.'),
        build_prompt_text(seed)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn draft(shot_type: &str, angle: &str, framing: &str) -> ShotPlanDraft {
        ShotPlanDraft {
            shot_type: Some(shot_type.to_string()),
            description: Some(format!("{shot_type} of the kitchen")),
            camera_angle: Some(angle.to_string()),
            framing: Some(framing.to_string()),
            ..Default::default()
        }
    }

    fn assert_unique(plans: &[ShotPlan]) {
        let signatures: HashSet<_> = plans.iter().map(ShotPlan::signature).collect();
        assert_eq!(signatures.len(), plans.len());
    }

    // -- clamp_num_shots -----------------------------------------------------

    #[test]
    fn shot_count_is_clamped() {
        assert_eq!(clamp_num_shots(0), 1);
        assert_eq!(clamp_num_shots(-4), 1);
        assert_eq!(clamp_num_shots(7), 7);
        assert_eq!(clamp_num_shots(15), 12);
    }

    // -- normalize_drafts ----------------------------------------------------

    #[test]
    fn ids_are_assigned_in_generation_order() {
        let drafts = vec![
            draft("wide", "eye-level", "whole room"),
            draft("close-up", "eye-level", "host face"),
            draft("insert", "top-down", "hands"),
        ];
        let plans = normalize_drafts(drafts, 3).unwrap();
        let ids: Vec<u32> = plans.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(plans[1].shot_type, "close-up");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let drafts = vec![ShotPlanDraft {
            shot_type: Some("medium two-shot".to_string()),
            description: Some("both hosts at the desk".to_string()),
            ..Default::default()
        }];
        let plan = normalize_drafts(drafts, 1).unwrap().remove(0);
        assert_eq!(plan.label, "medium two-shot");
        assert_eq!(plan.camera_angle, DEFAULT_CAMERA_ANGLE);
        assert_eq!(plan.lens, DEFAULT_LENS);
        assert_eq!(plan.framing, "medium two-shot");
        assert_eq!(plan.lighting, "");
        assert_eq!(plan.purpose, None);
    }

    #[test]
    fn unusable_drafts_are_dropped_and_surplus_truncated() {
        let drafts = vec![
            ShotPlanDraft {
                shot_type: Some("wide".to_string()),
                ..Default::default()
            },
            draft("wide", "eye-level", "room"),
            draft("close-up", "eye-level", "face"),
            draft("insert", "eye-level", "cup"),
        ];
        let plans = normalize_drafts(drafts, 2).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].framing, "room");
    }

    #[test]
    fn too_few_usable_drafts_is_an_error() {
        let drafts = vec![draft("wide", "eye-level", "room")];
        assert_matches!(normalize_drafts(drafts, 3), Err(CoreError::Validation(_)));
    }

    // -- enforce_distinct ----------------------------------------------------

    #[test]
    fn collision_takes_next_rotation_angle() {
        let drafts = vec![
            draft("medium", "eye-level", "host at desk"),
            draft("Medium ", "EYE-LEVEL", "host at desk"),
        ];
        let plans = normalize_drafts(drafts, 2).unwrap();
        assert_eq!(plans[0].camera_angle, "eye-level");
        assert_eq!(plans[1].camera_angle, "low-angle");
        assert_unique(&plans);
    }

    #[test]
    fn rotation_skips_angles_already_taken() {
        let drafts = vec![
            draft("medium", "eye-level", "desk"),
            draft("medium", "low-angle", "desk"),
            draft("medium", "eye-level", "desk"),
        ];
        let plans = normalize_drafts(drafts, 3).unwrap();
        assert_eq!(plans[2].camera_angle, "high-angle");
        assert_unique(&plans);
    }

    #[test]
    fn identical_drafts_always_become_distinct() {
        for count in MIN_SHOTS..=MAX_SHOTS {
            let drafts = (0..count)
                .map(|_| draft("wide", "eye-level", "the room"))
                .collect();
            let plans = normalize_drafts(drafts, count).unwrap();
            assert_eq!(plans.len(), count as usize);
            assert_unique(&plans);
        }
    }

    #[test]
    fn vocabulary_exhaustion_falls_back_to_alternate_take() {
        let drafts = (0..10)
            .map(|_| draft("wide", "eye-level", "the room"))
            .collect();
        let plans = normalize_drafts(drafts, 10).unwrap();
        assert_eq!(plans[8].framing, "the room (alternate take 2)");
        assert_eq!(plans[9].framing, "the room (alternate take 3)");
    }

    // -- seed_prompt ---------------------------------------------------------

    #[test]
    fn seed_carries_plan_fields() {
        let plan = ShotPlan {
            id: 1,
            label: "Establishing".to_string(),
            shot_type: "wide establishing".to_string(),
            description: "The whole diner at closing time".to_string(),
            camera_angle: "High Angle".to_string(),
            lens: "24mm wide".to_string(),
            framing: "counter, booths and door".to_string(),
            lighting: "dramatic neon spill through the windows".to_string(),
            purpose: None,
        };
        let seed = seed_prompt(&plan);
        assert_eq!(seed.camera.angle.as_deref(), Some("high-angle"));
        assert_eq!(seed.camera.lens_focal_length.as_deref(), Some("24mm wide"));
        assert_eq!(seed.camera.depth_of_field.as_deref(), Some(DEEP_FOCUS));
        assert_eq!(
            seed.lighting.shadows.as_deref(),
            Some(MoodFamily::Dramatic.lighting().shadows)
        );
        assert_eq!(
            seed.short_description.as_deref(),
            Some("The whole diner at closing time")
        );

        let text = shot_prompt_text(&plan, &seed);
        assert!(text.starts_with("wide establishing shot. Framing: counter, booths and door."));
    }

    #[test]
    fn close_shots_get_shallow_focus() {
        let plan = normalize_drafts(vec![draft("medium close-up", "eye-level", "face")], 1)
            .unwrap()
            .remove(0);
        let seed = seed_prompt(&plan);
        assert_eq!(seed.camera.depth_of_field.as_deref(), Some(SHALLOW_FOCUS));
        assert_eq!(seed.lighting.conditions, None);
    }
}
