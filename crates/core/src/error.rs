use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid override for {field}: '{value}' ({reason})")]
    InvalidOverride {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("A base structured prompt is required to apply overrides")]
    MissingBasePrompt,

    #[error("Scene text must not be empty")]
    EmptyScene,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
