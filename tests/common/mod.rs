#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;

use notes_api::config::{AppConfig, Environment};
use notes_api::database::{DatabaseManager, SqliteNoteStore};
use notes_api::AppState;

/// An in-process server on its own port with a fresh in-memory database
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    /// Same pool the server uses, for tests that reach under the API
    pub pool: SqlitePool,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::for_environment(Environment::Development);
        config.database.url = "sqlite::memory:".to_string();
        config.database.enable_query_logging = false;
        config.api.host = "127.0.0.1".to_string();
        config.api.port = port;

        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to open in-memory database")?;
        let bind_addr = config.bind_addr();
        let app = notes_api::app(AppState::new(SqliteNoteStore::new(pool.clone()), config));

        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", bind_addr))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test server error: {}", e);
            }
        });

        Ok(Self {
            port,
            base_url,
            pool,
            handle,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
