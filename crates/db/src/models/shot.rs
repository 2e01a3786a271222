//! Saved storyboard shot model and DTOs.
//!
//! The structured prompt and optional coverage plan are stored as JSONB and
//! round-trip unchanged, including keys this backend does not interpret.

use cinefibo_core::coverage::ShotPlan;
use cinefibo_core::structured_prompt::StructuredPrompt;
use cinefibo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `storyboard_shots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shot {
    pub id: DbId,
    pub project_id: DbId,
    /// Zero-based order within the project.
    pub position: i32,
    pub title: String,
    pub notes: Option<String>,
    pub prompt_text: Option<String>,
    pub structured_prompt: Json<StructuredPrompt>,
    pub plan: Option<Json<ShotPlan>>,
    pub image_url: Option<String>,
    pub request_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for saving a shot. It is appended after the project's last shot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShot {
    pub title: String,
    pub notes: Option<String>,
    pub prompt_text: Option<String>,
    pub structured_prompt: StructuredPrompt,
    pub plan: Option<ShotPlan>,
    pub image_url: Option<String>,
    pub request_id: Option<String>,
}

/// DTO for editing a saved shot. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShot {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub position: Option<i32>,
}
