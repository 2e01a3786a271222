//! Request handlers.
//!
//! Render and planning handlers delegate to `cinefibo_pipeline`; storyboard
//! handlers delegate to the repositories in `cinefibo_db`. Errors map to
//! HTTP responses via [`AppError`](crate::error::AppError).

pub mod coverage;
pub mod fibo;
pub mod project;
pub mod saved_shot;
pub mod shot;
