//! Orchestration of the render and reasoning services.
//!
//! - [`shot`]: single-shot generation, tuning and direct renders.
//! - [`planner`]: coverage planning with retry and distinctness.
//! - [`executor`]: bounded-concurrency rendering of a coverage plan.
//! - [`coverage`]: planning and execution chained for one request.

pub mod config;
pub mod coverage;
pub mod error;
pub mod executor;
pub mod planner;
pub mod shot;

#[cfg(test)]
mod testing;

pub use config::{CoverageConfig, FailurePolicy};
pub use error::PipelineError;
