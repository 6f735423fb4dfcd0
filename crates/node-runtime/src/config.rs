//! # Node Configuration
//!
//! Unified configuration for the directory, the deal watcher and logging.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. TOML file (every key optional)
//! 3. `CM_*` environment variables
//!
//! ## Config File Format
//!
//! ```toml
//! [directory]
//! listen_addr = "0.0.0.0:9090"
//! node_ttl_secs = 60
//! cleanup_period_secs = 10
//!
//! [deals]
//! deal_wait_timeout_secs = 900
//! discovery_poll_interval_secs = 3
//! closed_poll_interval_secs = 5
//!
//! [logging]
//! level = "info"
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use cm_01_node_directory::DirectoryConfig;
use cm_02_deal_watcher::{ConfigError as DealConfigError, DealWatcherConfig};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file.
pub const ENV_CONFIG_PATH: &str = "CM_CONFIG";
/// Listen address override.
pub const ENV_LISTEN_ADDR: &str = "CM_LISTEN_ADDR";
/// Node TTL override, in seconds.
pub const ENV_NODE_TTL_SECS: &str = "CM_NODE_TTL_SECS";
/// Janitor period override, in seconds.
pub const ENV_CLEANUP_PERIOD_SECS: &str = "CM_CLEANUP_PERIOD_SECS";
/// Deal wait timeout override, in seconds.
pub const ENV_DEAL_WAIT_TIMEOUT_SECS: &str = "CM_DEAL_WAIT_TIMEOUT_SECS";
/// Discovery poll interval override, in seconds.
pub const ENV_DEAL_POLL_INTERVAL_SECS: &str = "CM_DEAL_POLL_INTERVAL_SECS";
/// Log level override.
pub const ENV_LOG_LEVEL: &str = "CM_LOG_LEVEL";

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// Node directory configuration.
    pub directory: DirectoryConfig,
    /// Deal watcher configuration.
    pub deals: DealWatcherConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// The merged configuration is unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The `[deals]` section is unusable.
    #[error("invalid [deals] configuration: {0}")]
    Deals(#[from] DealConfigError),
}

/// Configuration file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    directory: DirectoryFile,
    #[serde(default)]
    deals: DealsFile,
    #[serde(default)]
    logging: LoggingFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectoryFile {
    listen_addr: Option<SocketAddr>,
    node_ttl_secs: Option<u64>,
    cleanup_period_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DealsFile {
    deal_wait_timeout_secs: Option<u64>,
    discovery_poll_interval_secs: Option<u64>,
    closed_poll_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingFile {
    level: Option<String>,
}

impl NodeConfig {
    /// Defaults, overlaid with `path` if given, overlaid with the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();

        let dir = file.directory;
        if let Some(addr) = dir.listen_addr {
            config.directory.listen_addr = addr;
        }
        if let Some(secs) = dir.node_ttl_secs {
            config.directory.node_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = dir.cleanup_period_secs {
            config.directory.cleanup_period = Duration::from_secs(secs);
        }

        let deals = file.deals;
        if let Some(secs) = deals.deal_wait_timeout_secs {
            config.deals.deal_wait_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = deals.discovery_poll_interval_secs {
            config.deals.discovery_poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = deals.closed_poll_interval_secs {
            config.deals.closed_poll_interval = Duration::from_secs(secs);
        }

        if let Some(level) = file.logging.level {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Apply `CM_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = parse_env(&lookup, ENV_LISTEN_ADDR)? {
            self.directory.listen_addr = addr;
        }
        if let Some(secs) = parse_env::<u64, _>(&lookup, ENV_NODE_TTL_SECS)? {
            self.directory.node_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64, _>(&lookup, ENV_CLEANUP_PERIOD_SECS)? {
            self.directory.cleanup_period = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64, _>(&lookup, ENV_DEAL_WAIT_TIMEOUT_SECS)? {
            self.deals.deal_wait_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64, _>(&lookup, ENV_DEAL_POLL_INTERVAL_SECS)? {
            self.deals.discovery_poll_interval = Duration::from_secs(secs);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory.node_ttl.is_zero() {
            return Err(ConfigError::Invalid(
                "directory.node_ttl_secs must be greater than zero".into(),
            ));
        }
        if self.directory.cleanup_period.is_zero() {
            return Err(ConfigError::Invalid(
                "directory.cleanup_period_secs must be greater than zero".into(),
            ));
        }
        self.deals.validate()?;
        Ok(())
    }
}

fn parse_env<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}
