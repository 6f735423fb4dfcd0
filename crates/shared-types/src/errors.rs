//! # Error Types
//!
//! Defines the error taxonomy used across crates and the parse errors for
//! the textual forms of shared entities.

use std::fmt;
use thiserror::Error;

/// Stable failure categories.
///
/// Every error that crosses a service boundary reports one of these so the
/// caller can branch on kind. The set is closed; adding a variant is a
/// breaking change for transport mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No credential, or a credential of the wrong kind, on an inbound call.
    Authentication,
    /// Malformed identity or deal-id syntax.
    Validation,
    /// No live record, or no owned-and-accepted deal.
    NotFound,
    /// A bounded wait hit its deadline.
    Timeout,
    /// An external cancellation signal was observed.
    Cancelled,
    /// The ledger collaborator failed to answer.
    TransientProvider,
    /// Anything else. Should not happen.
    Internal,
}

impl ErrorKind {
    /// Upper-snake name used on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "AUTHENTICATION",
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::Timeout => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::TransientProvider => "TRANSIENT_PROVIDER",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced when parsing the textual form of a shared entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Account address is not 40 hex digits (optionally `0x`-prefixed).
    #[error("invalid address {0:?}: expected 40 hex digits")]
    InvalidAddress(String),

    /// Specification fingerprint is not 64 hex digits.
    #[error("invalid specification hash {0:?}: expected 64 hex digits")]
    InvalidSpecHash(String),

    /// Deal identifier is not a decimal unsigned integer.
    #[error("invalid deal id {0:?}: expected a decimal integer")]
    InvalidDealId(String),
}

impl ParseError {
    /// All parse failures are validation failures.
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
