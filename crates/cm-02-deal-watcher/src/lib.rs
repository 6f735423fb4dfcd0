//! # CM-02 Deal Watcher
//!
//! Observes deals on an external ledger on behalf of one account.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! The hub opens a deal request and then needs to know when the matching
//! deal exists, when it closes, and whether a given deal is one it may act
//! on. The ledger is the source of truth and is only ever polled:
//!
//! | Operation | Cadence | Ledger error |
//! |-----------|---------|--------------|
//! | `wait_for_deal_created` | immediate probe, then every discovery interval, until a deadline | transient, retried |
//! | `wait_for_deal_closed` | every closed-poll interval, no deadline | fatal |
//! | `accept_deal` | one call | propagated |
//! | `get_deal` | one call | propagated, except "unknown" which is `NotFound` |
//!
//! ## Module Structure
//!
//! ```text
//! cm-02-deal-watcher/
//! ├── domain/          # DealRequest, WaitState, errors
//! ├── ports/           # DealWatcherApi (inbound) + Ledger (outbound)
//! ├── application/     # PollLoop, discovery, tracker, DealWatcher
//! ├── adapters/        # InMemoryLedger
//! └── config.rs        # DealWatcherConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{InMemoryLedger, LedgerCall};
pub use application::{DealWatcher, PollEvent, PollLoop, MIN_POLL_INTERVAL};
pub use config::{ConfigError, DealWatcherConfig};
pub use domain::{
    Address, Deal, DealError, DealId, DealRequest, DealStatus, LedgerError, SpecHash, WaitState,
};
pub use ports::{DealWatcherApi, Ledger};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
