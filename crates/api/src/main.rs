//! Thoughts API server binary.
//!
//! Usage:
//!   thoughts-api --config thoughts.toml
//!   thoughts-api --port 8080 --bind 0.0.0.0
//!   thoughts-api --memory  # Keep notes in memory only
//!
//! # Environment Variables
//!
//! - `HF_TOKEN` - Inference API token; without it notes are processed locally
//! - `THOUGHTS_BIND_ADDR` - Server bind address
//! - `THOUGHTS_DB` - SQLite database path

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use thoughts_api::{AppState, serve};
use thoughts_pipeline::ThoughtsConfig;
use thoughts_store::StoreBackend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "thoughts-api", version, about = "Note summarization and categorization server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides the config file)
    #[arg(short, long, env = "THOUGHTS_BIND_ADDR")]
    bind: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database path (overrides the config file)
    #[arg(long, env = "THOUGHTS_DB")]
    database: Option<PathBuf>,

    /// Keep notes in memory instead of SQLite
    #[arg(short, long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,thoughts_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        tracing::info!(path = %path.display(), "Loading configuration");
        ThoughtsConfig::from_file(path)?
    } else {
        tracing::info!("Using default configuration");
        ThoughtsConfig::default()
    };

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(database) = args.database {
        config.store.db_path = database;
    }
    if args.memory {
        config.store.backend = StoreBackend::Memory;
    }

    if config.server.bind == "0.0.0.0" {
        tracing::warn!(
            "Server binding to 0.0.0.0 exposes the API to all network interfaces. \
             There is no authentication; put it behind a firewall or proxy."
        );
    }

    let state = AppState::from_config(&config).await?;
    if !state.service.remote_enabled() {
        tracing::warn!("Remote inference unavailable, set HF_TOKEN to enable it");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    serve(Arc::new(state), addr).await?;

    Ok(())
}
