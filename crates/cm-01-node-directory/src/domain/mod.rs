//! Domain Layer - Pure directory logic with no I/O
//!
//! This module contains:
//! - Node records and the live/expired predicate
//! - The record table with last-write-wins upsert and TTL sweep
//! - Directory configuration
//! - Error types and their stable status mapping

pub mod entities;
pub mod errors;
pub mod table;
pub mod value_objects;

pub use entities::{DirectoryStats, NodeRecord, SweepReport};
pub use errors::{DirectoryError, StatusCode};
pub use table::DirectoryTable;
pub use value_objects::DirectoryConfig;
