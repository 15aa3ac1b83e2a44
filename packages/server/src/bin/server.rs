//! Pagecraft page service

use anyhow::Context;
use clap::Parser;
use pagecraft_server::{app, PageStore, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagecraft-server")]
#[command(about = "Page persistence service for the Pagecraft page builder", long_about = None)]
struct Cli {
    /// Config file (default: ./pagecraft.config.json when present)
    #[arg(short, long, env = "PAGECRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "PAGECRAFT_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PAGECRAFT_PORT")]
    port: Option<u16>,

    /// Directory for page files; pages are kept in memory when unset
    #[arg(long, env = "PAGECRAFT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "PAGECRAFT_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => ServerConfig::load(std::env::current_dir()?)?,
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let store = PageStore::from_config(&config)
        .await
        .context("Failed to open page store")?;
    let router = app(Arc::new(store), &config);

    let addr = config.socket_addr().await?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        %addr,
        data_dir = ?config.data_dir,
        history_limit = config.history_limit,
        "Pagecraft server listening"
    );
    axum::serve(listener, router).await?;

    Ok(())
}
