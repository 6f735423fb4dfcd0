//! # Inbound Ports
//!
//! API trait defining what the deal watcher can do.

use std::time::Duration;

use async_trait::async_trait;
use shared_types::CancelSignal;

use crate::domain::{Address, Deal, DealError, DealId, DealRequest};

/// Deal watcher API - inbound port.
///
/// Held by the hub as `Arc<dyn DealWatcherApi>`.
#[async_trait]
pub trait DealWatcherApi: Send + Sync {
    /// The watcher's own account address.
    fn address(&self) -> Address;

    /// Wait until a pending deal matching `request` exists, probing once
    /// immediately and then on the discovery interval.
    ///
    /// # Errors
    ///
    /// - `Timeout` if nothing matched within `timeout`
    /// - `Provider` if the last probe before the deadline failed at the ledger
    /// - `Cancelled` if `cancel` fired first
    async fn wait_for_deal_created(
        &self,
        request: &DealRequest,
        timeout: Duration,
        cancel: CancelSignal,
    ) -> Result<Deal, DealError>;

    /// Wait until deal `deal_id` with `counterparty` is reported closed.
    ///
    /// Has no deadline of its own; bound it through `cancel`.
    ///
    /// # Errors
    ///
    /// - `Provider` on the first failing closed-deal query
    /// - `Cancelled` if `cancel` fired first
    async fn wait_for_deal_closed(
        &self,
        deal_id: DealId,
        counterparty: Address,
        cancel: CancelSignal,
    ) -> Result<(), DealError>;

    /// Accept the deal whose decimal id is `deal_id`.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed id, otherwise the ledger's error.
    async fn accept_deal(&self, deal_id: &str) -> Result<(), DealError>;

    /// The deal whose decimal id is `deal_id`, if we supply it and it is
    /// accepted.
    ///
    /// # Errors
    ///
    /// `NotFound` both when the ledger does not know the deal and when it
    /// fails either predicate.
    async fn get_deal(&self, deal_id: &str) -> Result<Deal, DealError>;
}
