//! Repository for the `storyboard_shots` table.

use cinefibo_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::shot::{CreateShot, Shot, UpdateShot};

const COLUMNS: &str = "id, project_id, position, title, notes, prompt_text, \
    structured_prompt, plan, image_url, request_id, created_at, updated_at";

/// Provides CRUD operations for saved shots. Every query is scoped to a project.
pub struct ShotRepo;

impl ShotRepo {
    /// Append a shot after the project's current last shot.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateShot,
    ) -> Result<Shot, sqlx::Error> {
        let query = format!(
            "INSERT INTO storyboard_shots
                (project_id, position, title, notes, prompt_text,
                 structured_prompt, plan, image_url, request_id)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM storyboard_shots WHERE project_id = $1),
                $2, $3, $4, $5, $6, $7, $8
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.notes)
            .bind(&input.prompt_text)
            .bind(Json(&input.structured_prompt))
            .bind(input.plan.as_ref().map(Json))
            .bind(&input.image_url)
            .bind(&input.request_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM storyboard_shots WHERE project_id = $1 AND id = $2");
        sqlx::query_as::<_, Shot>(&query)
            .bind(project_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's shots in storyboard order.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Shot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM storyboard_shots
             WHERE project_id = $1
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a shot. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the shot does not exist in the project.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateShot,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE storyboard_shots SET
                title = COALESCE($3, title),
                notes = COALESCE($4, notes),
                position = COALESCE($5, position)
             WHERE project_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(project_id)
            .bind(id)
            .bind(&input.title)
            .bind(&input.notes)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    /// Delete a shot. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM storyboard_shots WHERE project_id = $1 AND id = $2")
            .bind(project_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
