//! # Domain Layer
//!
//! Pure deal-watcher types: the polling request, the wait state machine and
//! errors. No I/O.

pub mod errors;
pub mod value_objects;

pub use errors::{DealError, LedgerError};
pub use value_objects::{DealRequest, WaitState};

pub use shared_types::{Address, Deal, DealId, DealStatus, SpecHash};
