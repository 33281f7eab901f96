pub mod manager;
pub mod models;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::{NewNote, Note, NoteChanges};
pub use store::{NoteStore, SqliteNoteStore};
