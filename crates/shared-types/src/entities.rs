//! # Core Domain Entities
//!
//! Identity and deal entities shared across the coordination core.
//!
//! ## Clusters
//!
//! - **Identity**: [`Address`], derived from a secp256k1 account key
//! - **Deals**: [`DealId`], [`SpecHash`], [`DealStatus`], [`Deal`]
//! - **Time**: [`Timestamp`]

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use sha3::{Digest, Keccak256};

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

use crate::errors::ParseError;

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 20-byte account address.
///
/// Equality is exact byte equality. The textual form is `0x` followed by 40
/// lowercase hex digits; parsing also accepts uppercase digits and a missing
/// prefix.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, SerializeDisplay, DeserializeFromStr,
)]
pub struct Address([u8; 20]);

impl Address {
    /// Address length in bytes.
    pub const LEN: usize = 20;

    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive the account address of a secp256k1 public key.
    ///
    /// The address is the last 20 bytes of the Keccak-256 digest of the
    /// uncompressed public point, without its leading tag byte.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let digest = Keccak256::digest(&point.as_bytes()[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = strip_hex_prefix(s);
        let mut bytes = [0u8; 20];
        if digits.len() != 2 * Self::LEN || hex::decode_to_slice(digits, &mut bytes).is_err() {
            return Err(ParseError::InvalidAddress(s.to_string()));
        }
        Ok(Self(bytes))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// CLUSTER B: DEALS
// =============================================================================

/// Fingerprint of a work specification. Opaque to this core; compared by
/// exact byte equality only.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub struct SpecHash([u8; 32]);

impl SpecHash {
    /// Wrap raw fingerprint bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw fingerprint bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for SpecHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SpecHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpecHash({self})")
    }
}

impl FromStr for SpecHash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = strip_hex_prefix(s);
        let mut bytes = [0u8; 32];
        if digits.len() != 64 || hex::decode_to_slice(digits, &mut bytes).is_err() {
            return Err(ParseError::InvalidSpecHash(s.to_string()));
        }
        Ok(Self(bytes))
    }
}

/// Ledger-assigned deal identifier, a 256-bit unsigned integer written in
/// decimal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct DealId(U256);

impl DealId {
    /// Wrap a raw identifier.
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// The raw identifier.
    pub const fn value(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DealId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidDealId(s.to_string()));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| ParseError::InvalidDealId(s.to_string()))
    }
}

impl From<u64> for DealId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

/// Deal lifecycle status.
///
/// Transitions only move forward: `Pending -> Accepted -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStatus {
    /// Opened by the buyer, awaiting the supplier's acceptance.
    Pending,
    /// Accepted by the supplier; work may run.
    Accepted,
    /// Finished or cancelled. Terminal.
    Closed,
}

impl DealStatus {
    /// Position in the lifecycle. A deal's rank never decreases.
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Accepted => 1,
            Self::Closed => 2,
        }
    }

    /// Whether moving from `self` to `next` respects lifecycle order.
    pub const fn can_transition_to(&self, next: DealStatus) -> bool {
        next.rank() >= self.rank()
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// A deal as recorded on the ledger. Observed, never owned, by this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// Ledger identifier.
    pub id: DealId,
    /// Account that opened the deal.
    pub buyer: Address,
    /// Account expected to perform the work.
    pub supplier: Address,
    /// Fingerprint of the specification the deal was opened for.
    pub spec_hash: SpecHash,
    /// Current lifecycle status.
    pub status: DealStatus,
    /// When the deal was opened.
    pub start_time: Timestamp,
    /// When the deal ends (or ended).
    pub end_time: Timestamp,
}

// =============================================================================
// CLUSTER C: TIME
// =============================================================================

/// Whole seconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from seconds since the epoch.
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds since the epoch.
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// `self - duration`, clamped at the epoch.
    pub fn saturating_sub(&self, duration: Duration) -> Self {
        Self(self.0.saturating_sub(duration.as_secs()))
    }

    /// `self + duration`, clamped at `u64::MAX`.
    pub fn saturating_add(&self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_secs()))
    }
}
