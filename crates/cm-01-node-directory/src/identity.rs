//! # Identity Extraction
//!
//! Turns the authentication context an inbound call arrived with into a
//! verified account address.
//!
//! The transport (TLS with account-bound certificates, maintained by the
//! certificate rotator) attaches a [`PeerContext`] to every call it
//! authenticated. Only an [`PeerCredential::Account`] credential identifies a
//! directory participant; every other principal kind is rejected. The request
//! payload is never consulted.

use std::net::SocketAddr;

use shared_types::Address;
use thiserror::Error;

/// The kind of principal the transport authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerCredential {
    /// Certificate bound to an account key. The only accepted kind.
    Account {
        /// Address derived from the certificate's account key.
        address: Address,
    },
    /// Any other authenticated principal (plain TLS, API token, ...).
    Other {
        /// Short name of the credential kind, for diagnostics.
        kind: String,
    },
}

/// Authentication context attached to an inbound call by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerContext {
    /// Remote socket address, when the transport knows it.
    pub remote_addr: Option<SocketAddr>,
    /// What the channel authenticated.
    pub credential: PeerCredential,
}

impl PeerContext {
    /// Context without a known remote address.
    pub fn new(credential: PeerCredential) -> Self {
        Self {
            remote_addr: None,
            credential,
        }
    }

    /// Attach the remote socket address.
    #[must_use]
    pub fn with_remote_addr(mut self, remote_addr: SocketAddr) -> Self {
        self.remote_addr = Some(remote_addr);
        self
    }
}

/// Reasons an inbound call cannot be tied to an account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    /// The call carries no authentication context at all.
    #[error("no authenticated peer attached to the call")]
    MissingPeer,

    /// The channel authenticated a principal that is not an account.
    #[error("wrong credential type: expected account, got {kind}")]
    WrongCredential {
        /// Credential kind the transport reported.
        kind: String,
    },
}

/// Extract the caller's account address from its authentication context.
///
/// Pure: no side effects and no directory access.
pub fn extract_identity(peer: Option<&PeerContext>) -> Result<Address, AuthenticationError> {
    let peer = peer.ok_or(AuthenticationError::MissingPeer)?;

    match &peer.credential {
        PeerCredential::Account { address } => Ok(*address),
        PeerCredential::Other { kind } => Err(AuthenticationError::WrongCredential {
            kind: kind.clone(),
        }),
    }
}
