//! # Node Directory Service
//!
//! - `core` - the locked [`NodeDirectory`] and the [`DirectoryService`] facade
//! - `api` - `DirectoryApi` implementation (identity extraction, parsing)
//! - `maintenance` - the janitor that evicts stale records
//!
//! ## Locking
//!
//! All reads and writes go through one `parking_lot::Mutex` around the
//! record table. The clock is read before the lock is taken and nothing
//! inside the critical section awaits or does I/O. A single lock is the
//! scaling limit of this design; sharding by identity hash is the next step
//! if contention ever shows up.

// Semantic submodules
mod api;
mod core;
mod maintenance;

// Re-export public API
pub use core::{DirectoryService, NodeDirectory};
pub use maintenance::{run_janitor, spawn_janitor, MIN_CLEANUP_PERIOD};
