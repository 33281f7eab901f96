use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::database::{NewNote, Note, NoteChanges};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Body of POST /api/notes
#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Accepted for client compatibility, never used; the store assigns ids.
    pub id: Option<Value>,
}

impl CreateNoteRequest {
    pub fn validate(self) -> Result<NewNote, ApiError> {
        let title = self
            .title
            .ok_or_else(|| ApiError::validation_error("title is required"))?;
        Ok(NewNote::new(title, self.content))
    }
}

/// Body of PUT /api/notes/:id. Absent fields stay `None`, explicit nulls become `Some(None)`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
    pub id: Option<Value>,
}

impl UpdateNoteRequest {
    pub fn validate(self) -> Result<NoteChanges, ApiError> {
        let title = match self.title {
            Some(None) => return Err(ApiError::validation_error("title cannot be null")),
            Some(Some(title)) => Some(title),
            None => None,
        };
        Ok(NoteChanges {
            title,
            content: self.content,
        })
    }
}

// Only runs when the key is present, so a missing key falls back to `default` (None)
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn note_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    let Path(id) = path?;
    Ok(id)
}

/// GET /api/notes - every note, oldest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.store.get_all().await?;
    Ok(Json(notes))
}

/// GET /api/notes/:id - a single note
pub async fn show(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = note_id(path)?;

    match state.store.get_by_id(id).await? {
        Some(note) => Ok(Json(note)),
        None => Err(ApiError::note_not_found()),
    }
}

/// POST /api/notes - create a note; any `id` in the body is ignored
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<Note> {
    let Json(request) = payload?;
    if request.id.is_some() {
        tracing::debug!("Ignoring caller-supplied id on create");
    }
    let new_note = request.validate()?;

    let note = state.store.create(new_note).await?;
    tracing::info!(note_id = note.id, "Note created");

    Ok(ApiResponse::created("Note created successfully", note))
}

/// PUT /api/notes/:id - apply the provided fields
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> ApiResult<Note> {
    let id = note_id(path)?;
    let Json(request) = payload?;
    let changes = request.validate()?;

    match state.store.update(id, changes).await? {
        Some(note) => {
            tracing::info!(note_id = note.id, "Note updated");
            Ok(ApiResponse::success("Note updated successfully", note))
        }
        None => Err(ApiError::todo_not_found()),
    }
}

/// DELETE /api/notes/:id - hard delete
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let id = note_id(path)?;

    if state.store.delete(id).await? {
        tracing::info!(note_id = id, "Note deleted");
        Ok(ApiResponse::message_only("Note deleted successfully"))
    } else {
        Err(ApiError::todo_not_found())
    }
}
