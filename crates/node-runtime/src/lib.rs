//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! - `config` - `NodeConfig` from defaults, TOML and `CM_*` variables
//! - `telemetry` - tracing subscriber setup
//! - `server` - the directory HTTP server and its janitor

#![warn(missing_docs)]

pub mod config;
pub mod server;
pub mod telemetry;

pub use config::{ConfigError, LoggingConfig, NodeConfig};
pub use server::DirectoryServer;
pub use telemetry::init_tracing;
