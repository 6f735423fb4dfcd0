//! Directory record table.
//!
//! Plain, unsynchronized state. Callers supply `now`; the service layer owns
//! the lock and the clock.

use std::collections::HashMap;
use std::time::Duration;

use shared_types::{Address, Timestamp};

use super::entities::{NodeRecord, SweepReport};

/// Mapping from identity to its single current record.
#[derive(Debug)]
pub struct DirectoryTable {
    records: HashMap<Address, NodeRecord>,
    ttl: Duration,
}

impl DirectoryTable {
    /// Create an empty table with the given record TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            records: HashMap::new(),
            ttl,
        }
    }

    /// Oldest `last_seen` still considered live at `now`.
    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now.saturating_sub(self.ttl)
    }

    /// Replace the record for `identity` with `endpoints`, stamped `now`.
    ///
    /// Last write wins; previous endpoints are discarded, never merged. The
    /// stored `last_seen` is clamped so it never moves backwards.
    pub fn upsert(&mut self, identity: Address, endpoints: Vec<String>, now: Timestamp) {
        let last_seen = match self.records.get(&identity) {
            Some(previous) => previous.last_seen.max(now),
            None => now,
        };
        self.records
            .insert(identity, NodeRecord::new(identity, endpoints, last_seen));
    }

    /// The live record for `identity`, if any.
    ///
    /// A record past its TTL that has not been swept yet is not live.
    pub fn lookup(&self, identity: &Address, now: Timestamp) -> Option<&NodeRecord> {
        let cutoff = self.cutoff(now);
        self.records
            .get(identity)
            .filter(|record| !record.is_expired(cutoff))
    }

    /// Remove every record whose `last_seen` is before `now - ttl`.
    pub fn sweep(&mut self, now: Timestamp) -> SweepReport {
        let cutoff = self.cutoff(now);
        let total = self.records.len();
        self.records.retain(|_, record| !record.is_expired(cutoff));
        let kept = self.records.len();

        SweepReport {
            total,
            kept,
            deleted: total - kept,
        }
    }

    /// Number of stored records, live or awaiting a sweep.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
