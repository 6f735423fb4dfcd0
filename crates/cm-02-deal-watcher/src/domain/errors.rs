//! # Domain Errors
//!
//! Error types for the deal watcher and for the ledger collaborator it
//! consumes.

use std::time::Duration;

use shared_types::{DealId, ErrorKind, ParseError};
use thiserror::Error;

/// Failures reported by a ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger has no deal with this identifier.
    #[error("deal {0} is unknown to the ledger")]
    UnknownDeal(DealId),

    /// The ledger could not be reached or did not answer.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger refused a state-changing call.
    #[error("ledger rejected the call: {0}")]
    Rejected(String),
}

/// Deal watcher error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    /// Malformed deal id (or other textual input).
    #[error(transparent)]
    Validation(#[from] ParseError),

    /// No deal with this id that is supplied by us and accepted.
    ///
    /// Reported identically whether the ledger knows the deal or not.
    #[error("deal {0} not found")]
    NotFound(DealId),

    /// No matching deal appeared before the deadline.
    #[error("no matching deal appeared within {}s", .0.as_secs())]
    Timeout(Duration),

    /// The caller's cancellation signal fired.
    #[error("wait cancelled")]
    Cancelled,

    /// The ledger collaborator failed.
    #[error(transparent)]
    Provider(#[from] LedgerError),
}

impl DealError {
    /// Taxonomy category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Provider(_) => ErrorKind::TransientProvider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            DealError::from(ParseError::InvalidDealId("x".into())).kind(),
            ErrorKind::Validation
        );
        assert_eq!(DealError::NotFound(DealId::from(1)).kind(), ErrorKind::NotFound);
        assert_eq!(
            DealError::Timeout(Duration::from_secs(3)).kind(),
            ErrorKind::Timeout
        );
        assert_eq!(DealError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            DealError::from(LedgerError::Unavailable("down".into())).kind(),
            ErrorKind::TransientProvider
        );
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err = DealError::from(LedgerError::Rejected("not supplier".into()));
        assert_eq!(err.to_string(), "ledger rejected the call: not supplier");
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(
            DealError::Timeout(Duration::from_secs(900)).to_string(),
            "no matching deal appeared within 900s"
        );
    }
}
