use axum::routing::post;
use axum::Router;

use crate::handlers::coverage;
use crate::state::AppState;

/// Routes mounted at `/coverage`.
///
/// ```text
/// POST   /plan                              -> plan
/// POST   /generate                          -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plan", post(coverage::plan))
        .route("/generate", post(coverage::generate))
}
