//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the directory requires the host application to provide.

use shared_types::Timestamp;

/// Abstract interface for reading the current time.
///
/// Enables deterministic testing by injecting controllable time sources.
/// Production uses the system clock; tests use a manual clock.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the janitor and every inbound call
/// read the clock concurrently.
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}
