use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted note. `id` and both timestamps are owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: Option<String>) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }
}

/// Validated partial update. `None` leaves a column untouched;
/// `content: Some(None)` clears the content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<Option<String>>,
}

impl NoteChanges {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: Option<String>) -> Self {
        self.content = Some(content);
        self
    }
}
