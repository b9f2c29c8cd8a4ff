use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskboard_api::auth::provider_from_config;
use taskboard_api::config::AppConfig;
use taskboard_api::database::{manager, MemoryStore, PgStore};
use taskboard_api::{server, AppState};

#[derive(Parser)]
#[command(name = "taskboard-api")]
#[command(about = "Task board REST API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Listen port (overrides PORT / TASKBOARD_PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Keep data in memory instead of Postgres")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, FIREBASE_PROJECT_ID, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    tracing::info!("Starting task board API in {:?} mode", config.environment);

    let port = args.port.unwrap_or(config.server.port);
    let identity = provider_from_config(&config.security);

    let state = if args.memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        AppState::new(Arc::new(MemoryStore::new()), identity, config)
    } else {
        let pool = manager::connect(&config.database)
            .await
            .context("connecting to database")?;
        manager::bootstrap_schema(&pool).await.context("preparing schema")?;
        AppState::new(Arc::new(PgStore::new(pool)), identity, config)
    };

    server::serve(state, port).await
}
