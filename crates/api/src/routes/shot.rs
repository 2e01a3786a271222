use axum::routing::post;
use axum::Router;

use crate::handlers::shot;
use crate::state::AppState;

/// Routes mounted at `/shot`.
///
/// ```text
/// POST   /generate                          -> generate
/// POST   /tune                              -> tune
/// POST   /controls                          -> controls
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(shot::generate))
        .route("/tune", post(shot::tune))
        .route("/controls", post(shot::controls))
}
