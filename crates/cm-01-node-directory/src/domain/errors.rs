//! Domain Errors for the Node Directory

use std::fmt;

use shared_types::{Address, ErrorKind, ParseError};
use thiserror::Error;

use crate::identity::AuthenticationError;

/// Errors that can occur during directory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Caller did not present an account credential.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// Requested identity is not a well-formed address.
    #[error(transparent)]
    InvalidIdentity(#[from] ParseError),

    /// No live record for the identity.
    #[error("node with address {0} cannot be found")]
    NotFound(Address),

    /// The request body could not be decoded.
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl DirectoryError {
    /// Taxonomy category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::InvalidIdentity(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MalformedRequest(_) => ErrorKind::Validation,
        }
    }

    /// Transport status for this error.
    pub fn status(&self) -> StatusCode {
        StatusCode::from(self.kind())
    }
}

/// Status categories exposed at the transport boundary.
///
/// Mirrors the usual RPC status vocabulary so clients can tell a malformed
/// request from a missing record from a server fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Malformed request (bad identity syntax).
    InvalidArgument,
    /// No live record.
    NotFound,
    /// Missing or wrong-kind credential.
    Unauthenticated,
    /// Anything the caller cannot fix.
    Internal,
}

impl StatusCode {
    /// Upper-snake name used on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Internal => "INTERNAL",
        }
    }
}

impl From<ErrorKind> for StatusCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Authentication => Self::Unauthenticated,
            ErrorKind::Validation => Self::InvalidArgument,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Timeout
            | ErrorKind::Cancelled
            | ErrorKind::TransientProvider
            | ErrorKind::Internal => Self::Internal,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
