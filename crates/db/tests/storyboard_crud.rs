//! Integration tests for storyboard project and shot persistence.
//!
//! Exercises the repository layer against a real database:
//! - Project create/update/list/delete
//! - Shot append ordering and project scoping
//! - Structured prompts round-tripping unknown keys
//! - Cascade delete from project to shots

use cinefibo_core::coverage::ShotPlan;
use cinefibo_core::structured_prompt::StructuredPrompt;
use cinefibo_db::models::project::{CreateProject, UpdateProject};
use cinefibo_db::models::shot::{CreateShot, UpdateShot};
use cinefibo_db::repositories::{ProjectRepo, ShotRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        scene_text: Some("A grandmother knits by the fireplace.".to_string()),
        project_type: None,
    }
}

fn prompt() -> StructuredPrompt {
    serde_json::from_value(json!({
        "short_description": "Hands working wool",
        "photographic_characteristics": {"camera_angle": "close-up", "lens_focal_length": "85mm"},
        "lighting": {"conditions": "firelight"},
        "style_medium": "photograph",
        "objects": [{"description": "yarn", "location": "lap"}]
    }))
    .unwrap()
}

fn new_shot(title: &str) -> CreateShot {
    CreateShot {
        title: title.to_string(),
        notes: None,
        prompt_text: Some("Hands working wool.".to_string()),
        structured_prompt: prompt(),
        plan: None,
        image_url: Some("https://cdn.example/1.png".to_string()),
        request_id: Some("req-1".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Test: Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_create_update_list(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Knitting"))
        .await
        .unwrap();
    assert_eq!(project.name, "Knitting");
    assert!(project.project_type.is_none());

    let update = UpdateProject {
        project_type: Some("commercial".to_string()),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, project.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Knitting");
    assert_eq!(updated.project_type.as_deref(), Some("commercial"));
    assert!(updated.updated_at >= project.updated_at);

    let all = ProjectRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_missing_rows(pool: PgPool) {
    assert!(ProjectRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
    assert!(ProjectRepo::update(&pool, 999_999, &UpdateProject::default())
        .await
        .unwrap()
        .is_none());
    assert!(!ProjectRepo::delete(&pool, 999_999).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: Shots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shots_append_in_order(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Order"))
        .await
        .unwrap();

    for title in ["wide", "medium", "close"] {
        ShotRepo::create(&pool, project.id, &new_shot(title))
            .await
            .unwrap();
    }

    let shots = ShotRepo::list_for_project(&pool, project.id).await.unwrap();
    let titles: Vec<&str> = shots.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["wide", "medium", "close"]);
    let positions: Vec<i32> = shots.iter().map(|s| s.position).collect();
    assert_eq!(positions, [0, 1, 2]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_structured_prompt_round_trips(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Round trip"))
        .await
        .unwrap();
    let mut input = new_shot("close");
    input.plan = Some(ShotPlan {
        id: 3,
        label: "Shot 3".to_string(),
        shot_type: "close-up".to_string(),
        description: "Hands working wool".to_string(),
        camera_angle: "close-up".to_string(),
        lens: "85mm".to_string(),
        framing: "hands and needles".to_string(),
        lighting: "firelight".to_string(),
        purpose: Some("texture".to_string()),
    });

    let created = ShotRepo::create(&pool, project.id, &input).await.unwrap();
    let found = ShotRepo::find_by_id(&pool, project.id, created.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.structured_prompt.0, prompt());
    assert_eq!(found.structured_prompt.0.extra["style_medium"], "photograph");
    assert_eq!(found.plan.unwrap().0.id, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shots_scoped_to_project(pool: PgPool) {
    let a = ProjectRepo::create(&pool, &new_project("A")).await.unwrap();
    let b = ProjectRepo::create(&pool, &new_project("B")).await.unwrap();
    let shot = ShotRepo::create(&pool, a.id, &new_shot("wide")).await.unwrap();

    assert!(ShotRepo::find_by_id(&pool, b.id, shot.id)
        .await
        .unwrap()
        .is_none());
    assert!(!ShotRepo::delete(&pool, b.id, shot.id).await.unwrap());

    let update = UpdateShot {
        notes: Some("hold for two beats".to_string()),
        ..Default::default()
    };
    assert!(ShotRepo::update(&pool, b.id, shot.id, &update)
        .await
        .unwrap()
        .is_none());
    let updated = ShotRepo::update(&pool, a.id, shot.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("hold for two beats"));
    assert_eq!(updated.title, "wide");
}

// ---------------------------------------------------------------------------
// Test: Cascade delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cascade_delete_project(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Cascade"))
        .await
        .unwrap();
    let shot = ShotRepo::create(&pool, project.id, &new_shot("wide"))
        .await
        .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(ShotRepo::find_by_id(&pool, project.id, shot.id)
        .await
        .unwrap()
        .is_none());
    assert!(ShotRepo::list_for_project(&pool, project.id)
        .await
        .unwrap()
        .is_empty());
}
