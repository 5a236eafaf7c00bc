//! Note model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored note. `id` is `None` until the repository assigns one on first save.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
}

impl Note {
    /// A note that has not been persisted yet.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Overwrite both text fields, keeping the identifier.
    pub fn replace_text(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
    }
}
