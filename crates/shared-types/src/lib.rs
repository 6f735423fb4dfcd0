//! # Shared Types Crate
//!
//! This crate contains the identity and deal entities, the error taxonomy,
//! and the cancellation primitive shared by the node directory and the deal
//! watcher.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Identity From The Channel**: An [`Address`] is only ever trusted when it
//!   comes from an authenticated transport credential, never from a payload.
//! - **Enumerable Failures**: Every crate error maps onto [`ErrorKind`] so
//!   callers can branch on kind instead of matching strings.

pub mod cancel;
pub mod entities;
pub mod errors;

pub use cancel::{cancel_channel, CancelSignal, Canceller};
pub use entities::*;
pub use errors::*;
