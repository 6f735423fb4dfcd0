//! # Ports Layer
//!
//! Hexagonal architecture ports:
//! - Inbound (Driving): [`DealWatcherApi`]
//! - Outbound (Driven): [`Ledger`]

pub mod inbound;
pub mod outbound;

pub use inbound::DealWatcherApi;
pub use outbound::Ledger;
