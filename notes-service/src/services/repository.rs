//! Storage seam for notes.

use async_trait::async_trait;
use service_core::error::AppError;

use crate::models::Note;

/// Persistence operations the HTTP handlers depend on.
///
/// Implementations decide list order and concurrency behavior; handlers
/// assume neither.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All stored notes.
    async fn find_all(&self) -> Result<Vec<Note>, AppError>;

    /// The note with `id`, or `None`.
    async fn find_by_id(&self, id: i64) -> Result<Option<Note>, AppError>;

    /// Insert `note` when it has no id, otherwise overwrite the stored
    /// title and content. Returns the persisted note. Saving a note whose id
    /// no longer exists yields `AppError::NotFound`.
    async fn save(&self, note: Note) -> Result<Note, AppError>;

    /// Remove a persisted note.
    async fn delete(&self, note: &Note) -> Result<(), AppError>;

    /// Cheap round-trip to the backing store, used by health probes.
    async fn health_check(&self) -> Result<(), AppError>;
}

pub(crate) fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Note not found"))
}

pub(crate) fn require_id(note: &Note) -> Result<i64, AppError> {
    note.id
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Note has not been persisted")))
}
