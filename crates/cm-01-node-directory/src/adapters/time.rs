//! Clocks behind the [`TimeSource`] port.
//!
//! The directory only needs whole seconds: record ages are compared against
//! a TTL measured in seconds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use shared_types::Timestamp;

use crate::ports::TimeSource;

/// Wall clock, truncated to whole seconds.
///
/// A host clock set before 1970 reads as the epoch itself, which makes every
/// record look fresh rather than failing the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    /// The host wall clock.
    pub const fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Timestamp::new(since_epoch.as_secs())
    }
}

/// A clock that only moves when told to.
///
/// Shared through `Arc` between the directory and a test that steps it.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    secs: AtomicU64,
}

impl ManualTimeSource {
    /// Start the clock at `secs` since the epoch.
    pub fn new(secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(secs),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.secs.fetch_add(by.as_secs(), Ordering::SeqCst);
    }

    /// Jump to an absolute time, forwards or backwards.
    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.load(Ordering::SeqCst))
    }
}
