//! Domain logic for the storyboard backend.
//!
//! Everything here is pure: no I/O, no async. Service crates call into it
//! to validate user edits, keep structured prompts coherent, and shape
//! coverage plans.

pub mod controls;
pub mod coverage;
pub mod error;
pub mod merge;
pub mod prompt_text;
pub mod structured_prompt;
pub mod types;
pub mod vocabulary;
