//! Route definitions for the `/projects` resource.
//!
//! Also nests saved shot routes under `/projects/{project_id}/shots`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, saved_shot};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
///
/// GET    /{project_id}/shots                -> list_by_project
/// POST   /{project_id}/shots                -> create
/// GET    /{project_id}/shots/{id}           -> get_by_id
/// PUT    /{project_id}/shots/{id}           -> update
/// DELETE /{project_id}/shots/{id}           -> delete
/// ```
pub fn router() -> Router<AppState> {
    let shot_routes = Router::new()
        .route(
            "/",
            get(saved_shot::list_by_project).post(saved_shot::create),
        )
        .route(
            "/{id}",
            get(saved_shot::get_by_id)
                .put(saved_shot::update)
                .delete(saved_shot::delete),
        );

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .nest("/{project_id}/shots", shot_routes)
}
