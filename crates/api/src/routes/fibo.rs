use axum::routing::post;
use axum::Router;

use crate::handlers::fibo;
use crate::state::AppState;

/// Routes mounted at `/fibo`.
///
/// ```text
/// POST   /generate                          -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(fibo::generate))
}
