use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewNote, Note, NoteChanges};

const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at";

/// Durable CRUD over notes.
///
/// Missing ids are reported through `Option`/`bool`, never as errors;
/// `Err` always means the storage layer itself failed.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a note with a fresh id and `created_at == updated_at == now`.
    async fn create(&self, note: NewNote) -> Result<Note, DatabaseError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>, DatabaseError>;

    /// Every stored note in insertion (id) order.
    async fn get_all(&self) -> Result<Vec<Note>, DatabaseError>;

    /// Apply only the provided fields and refresh `updated_at`.
    async fn update(&self, id: i64, changes: NoteChanges) -> Result<Option<Note>, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// `NoteStore` backed by the `notes` table of a SQLite pool
#[derive(Clone)]
pub struct SqliteNoteStore {
    pool: SqlitePool,
}

impl SqliteNoteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn create(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO notes (title, content, created_at, updated_at) VALUES (?, ?, ?, ?) RETURNING {}",
            NOTE_COLUMNS
        );

        let created = sqlx::query_as::<_, Note>(&sql)
            .bind(&note.title)
            .bind(&note.content)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        debug!(note_id = created.id, "Created note");
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>, DatabaseError> {
        let sql = format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS);
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(note)
    }

    async fn get_all(&self) -> Result<Vec<Note>, DatabaseError> {
        let sql = format!("SELECT {} FROM notes ORDER BY id ASC", NOTE_COLUMNS);
        let notes = sqlx::query_as::<_, Note>(&sql).fetch_all(&self.pool).await?;
        Ok(notes)
    }

    async fn update(&self, id: i64, changes: NoteChanges) -> Result<Option<Note>, DatabaseError> {
        // One statement: each column is only overwritten when its flag is set
        let sql = format!(
            "UPDATE notes SET \
                title = CASE WHEN ? THEN ? ELSE title END, \
                content = CASE WHEN ? THEN ? ELSE content END, \
                updated_at = ? \
             WHERE id = ? \
             RETURNING {}",
            NOTE_COLUMNS
        );

        let set_content = changes.content.is_some();
        let updated = sqlx::query_as::<_, Note>(&sql)
            .bind(changes.title.is_some())
            .bind(changes.title)
            .bind(set_content)
            .bind(changes.content.flatten())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match &updated {
            Some(_) => debug!(note_id = id, "Updated note"),
            None => debug!(note_id = id, "Update skipped, note not found"),
        }
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(note_id = id, deleted, "Delete note");
        Ok(deleted)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
