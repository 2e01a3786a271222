use std::sync::Arc;

use cinefibo_fibo::RenderService;
use cinefibo_pipeline::CoverageConfig;
use cinefibo_reasoning::ReasoningService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cinefibo_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Image render service (FIBO in production).
    pub render: Arc<dyn RenderService>,
    /// Shot description and coverage planning service.
    pub reasoning: Arc<dyn ReasoningService>,
    /// Coverage executor settings.
    pub coverage: Arc<CoverageConfig>,
}
