use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use notes_api::config::{config, AppConfig};
use notes_api::database::{DatabaseManager, SqliteNoteStore};
use notes_api::AppState;

#[derive(Parser)]
#[command(name = "notes-api")]
#[command(about = "Note-taking backend: JSON CRUD API and HTML pages")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Port to listen on (overrides NOTES_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Interface to bind (overrides NOTES_API_HOST)")]
    host: Option<String>,

    #[arg(long, help = "sqlx connection string, e.g. sqlite://notes.db (overrides DATABASE_URL)")]
    database_url: Option<String>,
}

impl Cli {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(host) = self.host {
            config.api.host = host;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the config singleton reads the environment
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notes_api=info,tower_http=info")),
        )
        .init();

    let config = Cli::parse().apply(config().clone());
    tracing::info!("Starting notes API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(SqliteNoteStore::new(pool.clone()), config);
    let app = notes_api::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Notes API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Database pool closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
