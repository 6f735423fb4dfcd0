//! # Deal Watcher Configuration
//!
//! Wait bounds and poll cadences for the deal watcher.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on waiting for a newly created deal (15 minutes).
pub const DEFAULT_DEAL_WAIT_TIMEOUT: Duration = Duration::from_secs(900);

/// Default discovery poll cadence.
pub const DEFAULT_DISCOVERY_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default closed-deal poll cadence.
pub const DEFAULT_CLOSED_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Why a [`DealWatcherConfig`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A poll interval is zero.
    #[error("{field} must be greater than zero")]
    ZeroInterval {
        /// Offending field.
        field: &'static str,
    },

    /// Discovery would not get a probe in before its own deadline.
    #[error("discovery_poll_interval ({poll_secs}s) must be shorter than deal_wait_timeout ({timeout_secs}s)")]
    PollNotShorterThanTimeout {
        /// Configured discovery interval, in seconds.
        poll_secs: u64,
        /// Configured wait timeout, in seconds.
        timeout_secs: u64,
    },
}

/// Deal watcher configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealWatcherConfig {
    /// Overall bound for `wait_for_deal_created` when the caller has no
    /// better one.
    #[serde(with = "secs")]
    pub deal_wait_timeout: Duration,

    /// Discovery poll sub-interval. Must be shorter than the wait timeout.
    #[serde(with = "secs")]
    pub discovery_poll_interval: Duration,

    /// Closed-deal poll interval.
    #[serde(with = "secs")]
    pub closed_poll_interval: Duration,
}

impl Default for DealWatcherConfig {
    fn default() -> Self {
        Self {
            deal_wait_timeout: DEFAULT_DEAL_WAIT_TIMEOUT,
            discovery_poll_interval: DEFAULT_DISCOVERY_POLL_INTERVAL,
            closed_poll_interval: DEFAULT_CLOSED_POLL_INTERVAL,
        }
    }
}

impl DealWatcherConfig {
    /// Create a config for testing (short waits).
    pub fn for_testing() -> Self {
        Self {
            deal_wait_timeout: Duration::from_secs(3),
            discovery_poll_interval: Duration::from_secs(1),
            closed_poll_interval: Duration::from_secs(5),
        }
    }

    /// Check the cadences are usable.
    ///
    /// # Errors
    ///
    /// The first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discovery_poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval {
                field: "discovery_poll_interval",
            });
        }
        if self.closed_poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval {
                field: "closed_poll_interval",
            });
        }
        if self.discovery_poll_interval >= self.deal_wait_timeout {
            return Err(ConfigError::PollNotShorterThanTimeout {
                poll_secs: self.discovery_poll_interval.as_secs(),
                timeout_secs: self.deal_wait_timeout.as_secs(),
            });
        }
        Ok(())
    }
}

/// Serde helper storing durations as whole seconds.
mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
