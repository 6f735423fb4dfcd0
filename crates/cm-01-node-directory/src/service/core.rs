use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::{Address, CancelSignal};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::{DirectoryConfig, DirectoryError, DirectoryStats, DirectoryTable, SweepReport};
use crate::ports::TimeSource;
use crate::service::maintenance::spawn_janitor;

/// Concurrent registry of node records.
///
/// Wraps a [`DirectoryTable`] in a single exclusive lock and stamps every
/// operation with the injected [`TimeSource`]. Per identity, the last
/// `announce` to take the lock is what every later `resolve` sees.
pub struct NodeDirectory {
    /// Record table (domain layer)
    table: Mutex<DirectoryTable>,
    /// Time source for stamping and expiry
    time_source: Arc<dyn TimeSource>,
    announces: AtomicU64,
    sweeps: AtomicU64,
    evicted: AtomicU64,
}

impl NodeDirectory {
    /// Create an empty directory whose records live for `ttl` after their
    /// last announce.
    pub fn new(ttl: Duration, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            table: Mutex::new(DirectoryTable::new(ttl)),
            time_source,
            announces: AtomicU64::new(0),
            sweeps: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        }
    }

    /// Overwrite the record for `identity` and refresh its TTL clock.
    pub fn announce(&self, identity: Address, endpoints: Vec<String>) {
        let now = self.time_source.now();
        self.table.lock().upsert(identity, endpoints, now);
        self.announces.fetch_add(1, Ordering::Relaxed);
    }

    /// Current endpoints of `identity`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record exists or the record is past its TTL.
    pub fn resolve(&self, identity: &Address) -> Result<Vec<String>, DirectoryError> {
        let now = self.time_source.now();
        let table = self.table.lock();
        table
            .lookup(identity, now)
            .map(|record| record.endpoints.clone())
            .ok_or(DirectoryError::NotFound(*identity))
    }

    /// Evict every record idle for longer than the TTL.
    ///
    /// Full O(n) sweep under the lock. Never fails.
    pub fn sweep_expired(&self) -> SweepReport {
        let now = self.time_source.now();
        let report = self.table.lock().sweep(now);

        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.evicted
            .fetch_add(report.deleted as u64, Ordering::Relaxed);

        debug!(
            total = report.total,
            kept = report.kept,
            deleted = report.deleted,
            "Expired nodes cleaned"
        );
        report
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// Whether the directory holds no records.
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    /// Snapshot of directory statistics.
    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            records: self.len(),
            announces: self.announces.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}

/// Node directory service implementing the driving port.
///
/// Adds identity extraction and address parsing on top of [`NodeDirectory`].
///
/// # Example
///
/// ```rust,ignore
/// let (canceller, shutdown) = shared_types::cancel_channel();
/// let (service, janitor) =
///     DirectoryService::start(config, Arc::new(SystemTimeSource::new()), shutdown);
///
/// // ... serve ...
///
/// canceller.cancel();
/// janitor.await?;
/// ```
pub struct DirectoryService {
    /// The underlying registry
    pub(crate) directory: Arc<NodeDirectory>,
    /// Configuration the service was built with
    pub(crate) config: DirectoryConfig,
}

impl DirectoryService {
    /// Create a service without a janitor.
    ///
    /// Records still stop resolving after their TTL, but nothing reclaims
    /// their memory until [`NodeDirectory::sweep_expired`] runs.
    pub fn new(config: DirectoryConfig, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            directory: Arc::new(NodeDirectory::new(config.node_ttl, time_source)),
            config,
        }
    }

    /// Create a service and spawn its janitor on the current tokio runtime.
    ///
    /// The janitor runs until `shutdown` fires; await the returned handle
    /// before exiting the process.
    pub fn start(
        config: DirectoryConfig,
        time_source: Arc<dyn TimeSource>,
        shutdown: CancelSignal,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let service = Arc::new(Self::new(config, time_source));
        let janitor = spawn_janitor(
            Arc::clone(&service.directory),
            service.config.cleanup_period,
            shutdown,
        );
        (service, janitor)
    }

    /// The underlying registry.
    pub fn directory(&self) -> &Arc<NodeDirectory> {
        &self.directory
    }

    /// Configuration the service was built with.
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Snapshot of directory statistics.
    pub fn stats(&self) -> DirectoryStats {
        self.directory.stats()
    }
}
