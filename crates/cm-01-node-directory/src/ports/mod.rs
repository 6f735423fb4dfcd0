//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the directory API exposed to the transport
//! - **Driven Ports (Outbound):** the clock the directory requires

pub mod inbound;
pub mod outbound;

pub use inbound::DirectoryApi;
pub use outbound::TimeSource;
