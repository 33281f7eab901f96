use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::NoteStore;

/// Shared application state handed to every handler via `State<AppState>`.
///
/// Cheap to clone; both fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NoteStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: impl NoteStore + 'static, config: AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
