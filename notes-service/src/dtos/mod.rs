use serde::Deserialize;

use crate::models::Note;

/// Request body for create and update. Any `id` in the body is ignored; the
/// store assigns identifiers and the path names the note being replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct NotePayload {
    pub title: String,
    pub content: String,
}

impl From<NotePayload> for Note {
    fn from(payload: NotePayload) -> Self {
        Note::new(payload.title, payload.content)
    }
}
