//! PostgreSQL-backed note repository.

use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::metrics::DB_QUERY_DURATION;
use super::repository::{not_found, require_id, NoteRepository};
use crate::models::Note;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "notes-service"))]
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn insert(&self, note: &Note) -> Result<Note, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_note"])
            .start_timer();

        let saved = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (title, content)
            VALUES ($1, $2)
            RETURNING id, title, content
            "#,
        )
        .bind(&note.title)
        .bind(&note.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert note: {}", e)))?;

        timer.observe_duration();
        Ok(saved)
    }

    async fn update(&self, id: i64, note: &Note) -> Result<Note, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_note"])
            .start_timer();

        let saved = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = $2, content = $3
            WHERE id = $1
            RETURNING id, title, content
            "#,
        )
        .bind(id)
        .bind(&note.title)
        .bind(&note.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update note: {}", e)))?;

        timer.observe_duration();
        saved.ok_or_else(not_found)
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Note>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_notes"])
            .start_timer();

        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content
            FROM notes
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list notes: {}", e)))?;

        timer.observe_duration();
        Ok(notes)
    }

    #[instrument(skip(self), fields(note_id = id))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Note>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_note"])
            .start_timer();

        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get note: {}", e)))?;

        timer.observe_duration();
        Ok(note)
    }

    #[instrument(skip(self, note), fields(note_id = ?note.id))]
    async fn save(&self, note: Note) -> Result<Note, AppError> {
        match note.id {
            Some(id) => self.update(id, &note).await,
            None => self.insert(&note).await,
        }
    }

    #[instrument(skip(self, note), fields(note_id = ?note.id))]
    async fn delete(&self, note: &Note) -> Result<(), AppError> {
        let id = require_id(note)?;
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_note"])
            .start_timer();

        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete note: {}", e))
            })?;

        timer.observe_duration();

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
