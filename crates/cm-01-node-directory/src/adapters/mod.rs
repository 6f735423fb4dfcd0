//! Adapters for external integrations.
//!
//! - `time` - system and manual clocks
//! - `http` - JSON-over-HTTP transport boundary (feature `http`)

pub mod time;

#[cfg(feature = "http")]
pub mod http;

pub use time::{ManualTimeSource, SystemTimeSource};
