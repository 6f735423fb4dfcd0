//! # Node Directory Subsystem
//!
//! **Subsystem ID:** 1
//!
//! This crate implements the locator: an authenticated, TTL-bounded registry
//! mapping an account [`Address`] to the network endpoints that account last
//! announced.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** the record table, TTL predicate and errors (no I/O)
//! - **Ports Layer:** the inbound `DirectoryApi` and the outbound `TimeSource`
//! - **Service Layer:** the locked `NodeDirectory`, the identity-checking
//!   `DirectoryService` and the background janitor
//! - **Adapters Layer:** system clock, manual clock and the HTTP boundary
//!   (feature `http`)
//!
//! ## Identity
//!
//! `Announce` never trusts the request body for identity. The caller's
//! address comes from the [`PeerContext`] the authenticated transport attaches
//! to the call; see [`extract_identity`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cm_01_node_directory::{
//!     Address, DirectoryApi, DirectoryConfig, DirectoryService, ManualTimeSource,
//!     PeerContext, PeerCredential,
//! };
//!
//! let clock = Arc::new(ManualTimeSource::new(1_000));
//! let service = DirectoryService::new(DirectoryConfig::default(), clock);
//!
//! let me = Address::new([7u8; 20]);
//! let peer = PeerContext::new(PeerCredential::Account { address: me });
//! service.announce(Some(&peer), vec!["10.0.0.1:4242".into()]).unwrap();
//!
//! let endpoints = service.resolve(&me.to_string()).unwrap();
//! assert_eq!(endpoints, vec!["10.0.0.1:4242".to_string()]);
//! ```

pub mod adapters;
pub mod domain;
pub mod identity;
pub mod ports;
pub mod service;

// Domain
pub use domain::{
    DirectoryConfig, DirectoryError, DirectoryStats, DirectoryTable, NodeRecord, StatusCode,
    SweepReport,
};

// Identity extraction
pub use identity::{extract_identity, AuthenticationError, PeerContext, PeerCredential};

// Port traits
pub use ports::{DirectoryApi, TimeSource};

// Service
pub use service::{run_janitor, spawn_janitor, DirectoryService, NodeDirectory};

// Adapters
pub use adapters::{ManualTimeSource, SystemTimeSource};

#[cfg(feature = "http")]
pub use adapters::http::{
    router, AnnounceReply, AnnounceRequest, ErrorBody, ResolveReply, ResolveRequest,
};

pub use shared_types::{Address, Timestamp};
