//! Creative reasoning for shot design, backed by an OpenAI-compatible
//! chat-completions endpoint.

pub mod chat;
pub mod config;
pub mod prompts;
pub mod service;

pub use config::ReasoningConfig;
pub use service::{OpenAiReasoning, ReasoningError, ReasoningService};
