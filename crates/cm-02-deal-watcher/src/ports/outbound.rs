//! # Outbound Ports
//!
//! The ledger collaborator the watcher polls. Implemented by an external
//! ledger client in production and by
//! [`InMemoryLedger`](crate::adapters::InMemoryLedger) in tests.

use async_trait::async_trait;
use k256::ecdsa::SigningKey;

use crate::domain::{Address, Deal, DealId, LedgerError};

/// Ledger client - outbound port.
///
/// Implementations must be safe to share between concurrent polling tasks.
/// List queries return ids in the ledger's own order; callers impose none.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Ids of deals between `self_addr` and `counterparty` that are not yet
    /// closed.
    async fn get_opened_deals(
        &self,
        self_addr: Address,
        counterparty: Address,
    ) -> Result<Vec<DealId>, LedgerError>;

    /// Ids of closed deals between `self_addr` and `counterparty`.
    async fn get_closed_deals(
        &self,
        self_addr: Address,
        counterparty: Address,
    ) -> Result<Vec<DealId>, LedgerError>;

    /// Full record of one deal.
    async fn get_deal_info(&self, id: DealId) -> Result<Deal, LedgerError>;

    /// Accept a pending deal, signed with `key`.
    async fn accept_deal(&self, key: &SigningKey, id: DealId) -> Result<(), LedgerError>;
}
