//! Handlers for shots saved to a project (`/projects/{project_id}/shots`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinefibo_core::error::CoreError;
use cinefibo_core::types::DbId;
use cinefibo_db::models::shot::{CreateShot, Shot, UpdateShot};
use cinefibo_db::repositories::{ProjectRepo, ShotRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn shot_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Shot", id })
}

/// Verify that the parent project exists.
async fn ensure_project_exists(state: &AppState, project_id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    Ok(())
}

/// POST /api/v1/projects/{project_id}/shots
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateShot>,
) -> AppResult<(StatusCode, Json<Shot>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_string()));
    }
    ensure_project_exists(&state, project_id).await?;
    let shot = ShotRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(project_id, shot_id = shot.id, position = shot.position, "Shot saved");
    Ok((StatusCode::CREATED, Json(shot)))
}

/// GET /api/v1/projects/{project_id}/shots
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Shot>>> {
    ensure_project_exists(&state, project_id).await?;
    let shots = ShotRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(shots))
}

/// GET /api/v1/projects/{project_id}/shots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Shot>> {
    let shot = ShotRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or_else(|| shot_not_found(id))?;
    Ok(Json(shot))
}

/// PUT /api/v1/projects/{project_id}/shots/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateShot>,
) -> AppResult<Json<Shot>> {
    if input.position.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("position must not be negative".to_string()));
    }
    let shot = ShotRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or_else(|| shot_not_found(id))?;
    Ok(Json(shot))
}

/// DELETE /api/v1/projects/{project_id}/shots/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if ShotRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(shot_not_found(id))
    }
}
