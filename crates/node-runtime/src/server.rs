//! # Directory Server
//!
//! Serves the node directory over HTTP and owns its janitor.
//!
//! ## Startup Sequence
//!
//! 1. Bind the listen address
//! 2. Build the directory service and spawn its janitor
//! 3. Serve until the shutdown future resolves
//!
//! ## Shutdown Sequence
//!
//! 1. Stop accepting connections and drain in-flight requests
//! 2. Signal the janitor and wait for it to exit

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use cm_01_node_directory::{router, DirectoryConfig, DirectoryService, TimeSource};
use shared_types::cancel_channel;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// A bound, not yet serving, directory server.
pub struct DirectoryServer {
    listener: TcpListener,
    config: DirectoryConfig,
    time_source: Arc<dyn TimeSource>,
}

impl DirectoryServer {
    /// Bind `config.listen_addr`.
    pub async fn bind(config: DirectoryConfig, time_source: Arc<dyn TimeSource>) -> Result<Self> {
        let listener = TcpListener::bind(config.listen_addr)
            .await
            .with_context(|| format!("failed to bind {}", config.listen_addr))?;

        Ok(Self {
            listener,
            config,
            time_source,
        })
    }

    /// The address actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to read bound address")
    }

    /// Serve until `shutdown` resolves, then stop the janitor.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        let (canceller, janitor_shutdown) = cancel_channel();
        let (service, janitor) =
            DirectoryService::start(self.config, self.time_source, janitor_shutdown);

        info!(
            %addr,
            node_ttl_secs = service.config().node_ttl.as_secs(),
            cleanup_period_secs = service.config().cleanup_period.as_secs(),
            "Directory server listening"
        );
        warn!("No TLS terminator in front of this listener; announce calls will be rejected as unauthenticated");

        let served = axum::serve(self.listener, router(Arc::clone(&service)))
            .with_graceful_shutdown(shutdown)
            .await
            .context("directory server failed");

        canceller.cancel();
        janitor.await.context("directory janitor panicked")?;

        let stats = service.stats();
        info!(
            records = stats.records,
            announces = stats.announces,
            evicted = stats.evicted,
            "Directory server stopped"
        );

        served
    }
}
