//! Client for the Bria FIBO image-generation service.
//!
//! [`api`] wraps the raw REST endpoints, [`render`] turns them into the
//! submit-and-poll [`RenderService`] the rest of the backend depends on.

pub mod api;
pub mod config;
pub mod render;

pub use config::FiboConfig;
pub use render::{FiboRenderer, RenderError, RenderOutput, RenderRequest, RenderService};
