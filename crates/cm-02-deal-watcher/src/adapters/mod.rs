//! # Adapters
//!
//! - `in_memory` - [`InMemoryLedger`], a scriptable ledger for tests

pub mod in_memory;

pub use in_memory::{InMemoryLedger, LedgerCall};
