//! # Application Layer
//!
//! - `poll` - timer/deadline/cancellation schedule shared by both loops
//! - `discovery` - wait for a created deal
//! - `tracker` - wait for a closed deal
//! - `service` - [`DealWatcher`], the four operations behind one identity

pub mod discovery;
pub mod poll;
pub mod service;
pub mod tracker;

pub use poll::{PollEvent, PollLoop, MIN_POLL_INTERVAL};
pub use service::DealWatcher;
