//! Value Objects for the Node Directory

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Directory configuration.
///
/// `node_ttl` bounds how long a record stays resolvable without a fresh
/// announce; `cleanup_period` is how often the janitor sweeps. A record is
/// physically removed at most `node_ttl + cleanup_period` after its last
/// announce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Address the directory transport listens on.
    pub listen_addr: SocketAddr,
    /// Maximum idle time before a record is stale (default: 60 seconds).
    #[serde(with = "secs")]
    pub node_ttl: Duration,
    /// Janitor sweep period (default: 10 seconds).
    #[serde(with = "secs")]
    pub cleanup_period: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            node_ttl: Duration::from_secs(60),
            cleanup_period: Duration::from_secs(10),
        }
    }
}

impl DirectoryConfig {
    /// Create a config suitable for testing (loopback, short periods)
    pub fn for_testing() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            node_ttl: Duration::from_secs(60),
            cleanup_period: Duration::from_secs(10),
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_config_defaults() {
        let config = DirectoryConfig::default();
        assert_eq!(config.node_ttl, Duration::from_secs(60));
        assert_eq!(config.cleanup_period, Duration::from_secs(10));
        assert_eq!(config.listen_addr.port(), 9090);
    }

    #[test]
    fn test_directory_config_durations_serialize_as_seconds() {
        let json = serde_json::to_value(DirectoryConfig::for_testing()).unwrap();
        assert_eq!(json["node_ttl"], 60);
        assert_eq!(json["cleanup_period"], 10);
    }
}
