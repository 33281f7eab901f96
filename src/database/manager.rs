use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager and the note store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_NOTES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

/// Builds the connection pool and makes sure the notes table exists
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool for `config.url` and create the notes table if missing.
    ///
    /// In-memory databases live only as long as their connection, so the pool
    /// is pinned to one connection that is never recycled.
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        if !config.url.starts_with("sqlite:") {
            return Err(DatabaseError::InvalidDatabaseUrl(config.url.clone()));
        }

        let mut options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(format!("{}: {}", config.url, e)))?
            .create_if_missing(true);

        if !config.enable_query_logging {
            options = options.disable_statement_logging();
        }

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connection_timeout));

        pool_options = if Self::is_in_memory(&config.url) {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        Self::ensure_schema(&pool).await?;

        info!("Opened database pool for: {}", config.url);
        Ok(pool)
    }

    /// Idempotent table creation. There is no migration history.
    pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_NOTES_TABLE).execute(pool).await?;
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn is_in_memory(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            connection_timeout: 5,
            enable_query_logging: false,
        }
    }

    #[test]
    fn detects_in_memory_urls() {
        assert!(DatabaseManager::is_in_memory("sqlite::memory:"));
        assert!(DatabaseManager::is_in_memory("sqlite://notes.db?mode=memory"));
        assert!(!DatabaseManager::is_in_memory("sqlite://notes.db"));
    }

    #[tokio::test]
    async fn connect_creates_notes_table() {
        let pool = DatabaseManager::connect(&memory_config()).await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'notes'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);

        // Second call must not fail on the existing table
        DatabaseManager::ensure_schema(&pool).await.unwrap();
        DatabaseManager::health_check(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_malformed_url() {
        let mut config = memory_config();
        config.url = "postgres://localhost/notes".to_string();
        let err = DatabaseManager::connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidDatabaseUrl(_)));
    }
}
