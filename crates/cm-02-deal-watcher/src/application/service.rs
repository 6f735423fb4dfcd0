//! # Deal Watcher Service
//!
//! Application service binding a ledger client to the watcher's own signing
//! identity.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use shared_types::CancelSignal;
use tracing::info;

use crate::application::{discovery, tracker};
use crate::config::DealWatcherConfig;
use crate::domain::{Address, Deal, DealError, DealId, DealRequest, DealStatus, LedgerError};
use crate::ports::{DealWatcherApi, Ledger};

/// Deal Watcher Service - observes deals on the ledger on behalf of one
/// account.
pub struct DealWatcher<L: Ledger + ?Sized> {
    /// Configuration.
    config: DealWatcherConfig,
    /// Account key used to accept deals.
    key: SigningKey,
    /// Address derived from `key`.
    address: Address,
    /// Ledger client.
    ledger: Arc<L>,
}

impl<L: Ledger + ?Sized> DealWatcher<L> {
    /// Create a watcher acting as the account behind `key`.
    pub fn new(ledger: Arc<L>, key: SigningKey, config: DealWatcherConfig) -> Self {
        let address = Address::from_verifying_key(key.verifying_key());
        Self {
            config,
            key,
            address,
            ledger,
        }
    }

    /// Our own account address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Configuration the watcher was built with.
    pub fn config(&self) -> &DealWatcherConfig {
        &self.config
    }

    /// The ledger client.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// [`wait_for_deal_created`](DealWatcherApi::wait_for_deal_created)
    /// bounded by the configured `deal_wait_timeout`.
    pub async fn wait_for_deal_created_default(
        &self,
        request: &DealRequest,
        cancel: CancelSignal,
    ) -> Result<Deal, DealError> {
        discovery::wait_for_deal_created(
            self.ledger.as_ref(),
            self.address,
            request,
            self.config.deal_wait_timeout,
            self.config.discovery_poll_interval,
            cancel,
        )
        .await
    }
}

#[async_trait]
impl<L: Ledger + ?Sized + 'static> DealWatcherApi for DealWatcher<L> {
    fn address(&self) -> Address {
        self.address
    }

    async fn wait_for_deal_created(
        &self,
        request: &DealRequest,
        timeout: Duration,
        cancel: CancelSignal,
    ) -> Result<Deal, DealError> {
        discovery::wait_for_deal_created(
            self.ledger.as_ref(),
            self.address,
            request,
            timeout,
            self.config.discovery_poll_interval,
            cancel,
        )
        .await
    }

    async fn wait_for_deal_closed(
        &self,
        deal_id: DealId,
        counterparty: Address,
        cancel: CancelSignal,
    ) -> Result<(), DealError> {
        tracker::wait_for_deal_closed(
            self.ledger.as_ref(),
            self.address,
            deal_id,
            counterparty,
            self.config.closed_poll_interval,
            cancel,
        )
        .await
    }

    async fn accept_deal(&self, deal_id: &str) -> Result<(), DealError> {
        let id: DealId = deal_id.parse()?;

        self.ledger.accept_deal(&self.key, id).await?;
        info!(deal_id = %id, "Deal accepted");
        Ok(())
    }

    async fn get_deal(&self, deal_id: &str) -> Result<Deal, DealError> {
        let id: DealId = deal_id.parse()?;

        let deal = match self.ledger.get_deal_info(id).await {
            Ok(deal) => deal,
            Err(LedgerError::UnknownDeal(_)) => return Err(DealError::NotFound(id)),
            Err(err) => return Err(err.into()),
        };

        if deal.supplier == self.address && deal.status == DealStatus::Accepted {
            Ok(deal)
        } else {
            Err(DealError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryLedger, LedgerCall};
    use shared_types::{SpecHash, Timestamp};

    fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_slice(&[seed; 32]).unwrap()
    }

    fn deal(id: u64, buyer: Address, supplier: Address, status: DealStatus) -> Deal {
        Deal {
            id: DealId::from(id),
            buyer,
            supplier,
            spec_hash: SpecHash::new([0x5a; 32]),
            status,
            start_time: Timestamp::new(1_000),
            end_time: Timestamp::new(2_000),
        }
    }

    fn watcher(ledger: Arc<InMemoryLedger>) -> DealWatcher<InMemoryLedger> {
        DealWatcher::new(ledger, signing_key(7), DealWatcherConfig::for_testing())
    }

    #[test]
    fn test_address_derived_from_key() {
        let watcher = watcher(Arc::new(InMemoryLedger::new()));
        assert_eq!(
            watcher.address(),
            Address::from_verifying_key(signing_key(7).verifying_key())
        );
    }

    #[tokio::test]
    async fn test_get_deal_returns_accepted_deal_we_supply() {
        let ledger = Arc::new(InMemoryLedger::new());
        let watcher = watcher(ledger.clone());
        let buyer = Address::new([1; 20]);
        ledger.insert(deal(5, buyer, watcher.address(), DealStatus::Accepted));

        let found = watcher.get_deal("5").await.unwrap();
        assert_eq!(found.id, DealId::from(5));
    }

    #[tokio::test]
    async fn test_get_deal_hides_deals_we_cannot_see() {
        let ledger = Arc::new(InMemoryLedger::new());
        let watcher = watcher(ledger.clone());
        let other = Address::new([9; 20]);
        let me = watcher.address();

        ledger.insert(deal(1, other, me, DealStatus::Pending));
        ledger.insert(deal(2, me, other, DealStatus::Accepted));
        ledger.insert(deal(3, other, me, DealStatus::Closed));

        let unknown = watcher.get_deal("404").await.unwrap_err();
        let pending = watcher.get_deal("1").await.unwrap_err();
        let not_supplier = watcher.get_deal("2").await.unwrap_err();
        let closed = watcher.get_deal("3").await.unwrap_err();

        for (err, id) in [(unknown, 404), (pending, 1), (not_supplier, 2), (closed, 3)] {
            assert_eq!(err, DealError::NotFound(DealId::from(id)));
            assert_eq!(err.to_string(), format!("deal {id} not found"));
        }
    }

    #[tokio::test]
    async fn test_get_deal_propagates_ledger_outage() {
        let ledger = Arc::new(InMemoryLedger::new());
        let watcher = watcher(ledger.clone());
        ledger.fail_next(LedgerCall::DealInfo, 1);

        let err = watcher.get_deal("1").await.unwrap_err();
        assert!(matches!(err, DealError::Provider(LedgerError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_malformed_ids_never_reach_the_ledger() {
        let ledger = Arc::new(InMemoryLedger::new());
        let watcher = watcher(ledger.clone());

        for bad in ["", "abc", "-1", "0x10", "1.5"] {
            assert!(matches!(
                watcher.accept_deal(bad).await,
                Err(DealError::Validation(_))
            ));
            assert!(matches!(
                watcher.get_deal(bad).await,
                Err(DealError::Validation(_))
            ));
        }
        assert_eq!(ledger.calls(LedgerCall::Accept), 0);
        assert_eq!(ledger.calls(LedgerCall::DealInfo), 0);
    }

    #[tokio::test]
    async fn test_accept_deal_signs_as_self() {
        let ledger = Arc::new(InMemoryLedger::new());
        let watcher = watcher(ledger.clone());
        let buyer = Address::new([1; 20]);
        ledger.insert(deal(12, buyer, watcher.address(), DealStatus::Pending));

        watcher.accept_deal("12").await.unwrap();

        assert_eq!(
            ledger.deal(DealId::from(12)).unwrap().status,
            DealStatus::Accepted
        );
        assert_eq!(watcher.get_deal("12").await.unwrap().id, DealId::from(12));
    }

    #[tokio::test]
    async fn test_accept_deal_propagates_rejection_unchanged() {
        let ledger = Arc::new(InMemoryLedger::new());
        let watcher = watcher(ledger.clone());
        let someone = Address::new([3; 20]);
        ledger.insert(deal(4, someone, someone, DealStatus::Pending));

        let err = watcher.accept_deal("4").await.unwrap_err();
        assert!(matches!(err, DealError::Provider(LedgerError::Rejected(_))));
        assert_eq!(
            ledger.deal(DealId::from(4)).unwrap().status,
            DealStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let ledger: Arc<dyn Ledger> = Arc::new(InMemoryLedger::new());
        let api: Arc<dyn DealWatcherApi> = Arc::new(DealWatcher::new(
            ledger,
            signing_key(7),
            DealWatcherConfig::for_testing(),
        ));

        assert!(matches!(
            api.get_deal("1").await,
            Err(DealError::NotFound(_))
        ));
    }
}
