//! In-memory note store for local runs and tests.

use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use super::repository::{not_found, require_id, NoteRepository};
use crate::models::Note;

/// Notes kept in an ordered map; ids come from a process-local sequence
/// starting at 1.
pub struct InMemoryNoteRepository {
    notes: RwLock<BTreeMap<i64, Note>>,
    next_id: AtomicI64,
}

impl Default for InMemoryNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> AppError {
        AppError::InternalError(anyhow::anyhow!("Note store lock poisoned: {}", e))
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn find_all(&self) -> Result<Vec<Note>, AppError> {
        let notes = self.notes.read().map_err(Self::poisoned)?;
        Ok(notes.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Note>, AppError> {
        let notes = self.notes.read().map_err(Self::poisoned)?;
        Ok(notes.get(&id).cloned())
    }

    async fn save(&self, mut note: Note) -> Result<Note, AppError> {
        let mut notes = self.notes.write().map_err(Self::poisoned)?;

        match note.id {
            Some(id) => {
                let stored = notes.get_mut(&id).ok_or_else(not_found)?;
                stored.replace_text(note.title, note.content);
                Ok(stored.clone())
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                note.id = Some(id);
                notes.insert(id, note.clone());
                Ok(note)
            }
        }
    }

    async fn delete(&self, note: &Note) -> Result<(), AppError> {
        let id = require_id(note)?;
        let mut notes = self.notes.write().map_err(Self::poisoned)?;
        notes.remove(&id).map(|_| ()).ok_or_else(not_found)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        drop(self.notes.read().map_err(Self::poisoned)?);
        Ok(())
    }
}
