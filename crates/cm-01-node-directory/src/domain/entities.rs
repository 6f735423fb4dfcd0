//! Core Domain Entities for the Node Directory

use serde::Serialize;
use shared_types::{Address, Timestamp};

/// What the directory knows about one account.
///
/// Invariant: at most one record per identity; `last_seen` never decreases
/// across successive announces for the same identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Account address taken from the authenticated channel.
    pub identity: Address,
    /// Endpoints as announced, in announce order. Reachability is not checked.
    pub endpoints: Vec<String>,
    /// When the identity last announced.
    pub last_seen: Timestamp,
}

impl NodeRecord {
    /// Create a new record.
    pub fn new(identity: Address, endpoints: Vec<String>, last_seen: Timestamp) -> Self {
        Self {
            identity,
            endpoints,
            last_seen,
        }
    }

    /// A record is expired once `last_seen` falls strictly before `cutoff`.
    pub fn is_expired(&self, cutoff: Timestamp) -> bool {
        self.last_seen < cutoff
    }
}

/// Counts from a single janitor sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records present when the sweep started.
    pub total: usize,
    /// Records that survived.
    pub kept: usize,
    /// Records evicted.
    pub deleted: usize,
}

/// Point-in-time directory statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    /// Records currently stored (live or awaiting the next sweep).
    pub records: usize,
    /// Announces accepted since start.
    pub announces: u64,
    /// Sweeps completed since start.
    pub sweeps: u64,
    /// Records evicted by sweeps since start.
    pub evicted: u64,
}
