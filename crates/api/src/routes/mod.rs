pub mod coverage;
pub mod fibo;
pub mod health;
pub mod project;
pub mod shot;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /fibo/generate                                   render pass-through (POST)
///
/// /shot/generate                                   scene -> shot (POST)
/// /shot/tune                                       overrides -> re-render (POST)
/// /shot/controls                                   prompt -> control values (POST)
///
/// /vocabulary                                      preset tables (GET)
///
/// /coverage/plan                                   plan only (POST)
/// /coverage/generate                               plan + render (POST)
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{project_id}/shots                     list, save
/// /projects/{project_id}/shots/{id}                get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/fibo", fibo::router())
        .nest("/shot", shot::router())
        .route("/vocabulary", get(handlers::shot::vocabulary))
        .nest("/coverage", coverage::router())
        .nest("/projects", project::router())
}
