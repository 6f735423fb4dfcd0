//! # Compute-Market Node Runtime
//!
//! The main entry point for the compute-market node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, optional TOML file, `CM_*` environment)
//! 2. Install logging
//! 3. Validate configuration
//! 4. Serve the node directory and run its janitor
//! 5. On Ctrl+C: drain the server, stop the janitor, exit
//!
//! The config file path is the first argument, or `CM_CONFIG`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cm_01_node_directory::SystemTimeSource;
use node_runtime::config::ENV_CONFIG_PATH;
use node_runtime::{init_tracing, DirectoryServer, NodeConfig};
use tracing::{error, info};

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let path = config_path();
    let config = NodeConfig::load(path.as_deref()).context("failed to load configuration")?;

    init_tracing(&config.logging)?;

    info!("===========================================");
    info!("  Compute-Market Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    if let Some(path) = &path {
        info!(path = %path.display(), "Loaded config file");
    }

    config.validate().context("invalid configuration")?;

    let server = DirectoryServer::bind(config.directory, Arc::new(SystemTimeSource::new())).await?;
    info!("Node is running. Press Ctrl+C to stop.");
    server.run(shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}
