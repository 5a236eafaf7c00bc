//! Repository tests against a live PostgreSQL instance.
//!
//! Run with `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

mod common;

use notes_service::models::Note;
use notes_service::services::{NoteRepository, PgNoteRepository};
use serial_test::serial;
use service_core::error::AppError;

async fn repository() -> PgNoteRepository {
    common::init_tracing();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set to run PostgreSQL tests");

    let repository = PgNoteRepository::connect(&database_url, 2, 1)
        .await
        .expect("Failed to connect to test database");
    repository
        .run_migrations()
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE notes RESTART IDENTITY")
        .execute(repository.pool())
        .await
        .expect("Failed to reset notes table");

    repository
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn insert_assigns_identity_ids() {
    let repo = repository().await;

    let first = repo.save(Note::new("A", "B")).await.unwrap();
    let second = repo.save(Note::new("C", "D")).await.unwrap();

    assert_eq!(first.id, Some(1));
    assert_eq!(second.id, Some(2));
    assert_eq!(repo.find_all().await.unwrap(), vec![first, second]);
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn save_with_id_overwrites_row() {
    let repo = repository().await;
    let mut note = repo.save(Note::new("A", "B")).await.unwrap();

    note.replace_text("C".to_string(), "D".to_string());
    let updated = repo.save(note.clone()).await.unwrap();

    assert_eq!(updated, note);
    assert_eq!(repo.find_by_id(1).await.unwrap(), Some(note));
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn save_with_unknown_id_is_not_found() {
    let repo = repository().await;

    let result = repo
        .save(Note {
            id: Some(404),
            title: "A".to_string(),
            content: "B".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn delete_removes_row() {
    let repo = repository().await;
    let note = repo.save(Note::new("A", "B")).await.unwrap();

    repo.delete(&note).await.unwrap();

    assert_eq!(repo.find_by_id(1).await.unwrap(), None);
    assert!(matches!(
        repo.delete(&note).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn health_check_round_trips() {
    let repo = repository().await;
    repo.health_check().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn application_serves_notes_from_postgres() {
    use notes_service::config::{DatabaseConfig, NotesConfig, StorageBackend};
    use notes_service::startup::Application;
    use secrecy::Secret;

    // Resets the table and applies migrations
    repository().await;

    let mut config = NotesConfig::in_memory();
    config.storage = StorageBackend::Postgres;
    config.database = Some(DatabaseConfig {
        url: Secret::new(std::env::var("TEST_DATABASE_URL").unwrap()),
        max_connections: 2,
        min_connections: 1,
    });

    let app = Application::build_without_migrations(config)
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.http_port());
    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    let client = reqwest::Client::new();
    let mut health = None;
    for _ in 0..50 {
        if let Ok(response) = client.get(format!("{}/health", address)).send().await {
            health = Some(response.status());
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }
    assert_eq!(health.map(|s| s.as_u16()), Some(200));

    let created: serde_json::Value = client
        .post(format!("{}/api/notes", address))
        .json(&serde_json::json!({ "title": "A", "content": "B" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created, serde_json::json!({ "id": 1, "title": "A", "content": "B" }));

    let response = client
        .delete(format!("{}/api/notes/1", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = client
        .get(format!("{}/api/notes/1", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
