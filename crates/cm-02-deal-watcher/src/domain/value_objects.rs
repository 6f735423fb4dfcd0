//! # Value Objects
//!
//! Polling inputs and the wait state machine.

use shared_types::{Address, Deal, DealStatus, SpecHash};

/// What the hub is waiting for: a pending deal with `counterparty` for the
/// specification fingerprinted by `spec_hash`. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DealRequest {
    /// The other party of the expected deal.
    pub counterparty: Address,
    /// Fingerprint of the work specification the deal must carry.
    pub spec_hash: SpecHash,
}

impl DealRequest {
    /// Create a request.
    pub fn new(counterparty: Address, spec_hash: SpecHash) -> Self {
        Self {
            counterparty,
            spec_hash,
        }
    }

    /// Whether `deal` is the one being waited for: still pending and opened
    /// for exactly this specification.
    pub fn matches(&self, deal: &Deal) -> bool {
        deal.status == DealStatus::Pending && deal.spec_hash == self.spec_hash
    }
}

/// State of a bounded wait.
///
/// ```text
/// Waiting ──probe hit──────▶ Matched
///    │  ╲──deadline────────▶ TimedOut
///    ╰─────cancellation────▶ Cancelled
/// ```
///
/// Every state except `Waiting` is terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WaitState<T> {
    /// Still polling.
    Waiting,
    /// The probe found what it was looking for.
    Matched(T),
    /// The deadline passed first.
    TimedOut,
    /// The cancellation signal fired first.
    Cancelled,
}

impl<T> WaitState<T> {
    /// Whether the wait is over.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Waiting)
    }
}
