//! # In-Memory Ledger
//!
//! A [`Ledger`] backed by a vector of deals, with scripted failures,
//! optional per-call latency and per-call counters. Used by tests and local
//! runs without a chain.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use parking_lot::Mutex;

use crate::domain::{Address, Deal, DealId, DealStatus, LedgerError};
use crate::ports::Ledger;

/// Ledger operations, for scripting failures and reading counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgerCall {
    /// `get_opened_deals`
    OpenedDeals,
    /// `get_closed_deals`
    ClosedDeals,
    /// `get_deal_info`
    DealInfo,
    /// `accept_deal`
    Accept,
}

impl LedgerCall {
    const COUNT: usize = 4;

    const fn index(self) -> usize {
        match self {
            Self::OpenedDeals => 0,
            Self::ClosedDeals => 1,
            Self::DealInfo => 2,
            Self::Accept => 3,
        }
    }
}

#[derive(Default)]
struct LedgerState {
    /// Deals in insertion order, which is the order list queries report.
    deals: Vec<Deal>,
    /// Remaining scripted failures per call.
    failures: [u32; LedgerCall::COUNT],
    /// Delay before every call answers.
    latency: Duration,
}

/// In-memory ledger for tests.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    calls: [AtomicU64; LedgerCall::COUNT],
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a deal, or replace the deal with the same id in place.
    pub fn insert(&self, deal: Deal) {
        let mut state = self.state.lock();
        match state.deals.iter_mut().find(|d| d.id == deal.id) {
            Some(existing) => *existing = deal,
            None => state.deals.push(deal),
        }
    }

    /// Move a deal forward in its lifecycle.
    ///
    /// Returns `false` if the deal is unknown or the move would regress its
    /// status.
    pub fn set_status(&self, id: DealId, status: DealStatus) -> bool {
        let mut state = self.state.lock();
        match state.deals.iter_mut().find(|d| d.id == id) {
            Some(deal) if deal.status.can_transition_to(status) => {
                deal.status = status;
                true
            }
            _ => false,
        }
    }

    /// Current record of a deal.
    pub fn deal(&self, id: DealId) -> Option<Deal> {
        self.state.lock().deals.iter().find(|d| d.id == id).cloned()
    }

    /// Make the next `times` calls of `call` fail with
    /// [`LedgerError::Unavailable`].
    pub fn fail_next(&self, call: LedgerCall, times: u32) {
        self.state.lock().failures[call.index()] = times;
    }

    /// Delay every subsequent call by `latency` (tokio time).
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = latency;
    }

    /// How many times `call` has been made, including failed calls.
    pub fn calls(&self, call: LedgerCall) -> u64 {
        self.calls[call.index()].load(Ordering::SeqCst)
    }

    /// Count the call, wait out the configured latency, then consume a
    /// scripted failure if one is pending.
    async fn enter(&self, call: LedgerCall) -> Result<(), LedgerError> {
        self.calls[call.index()].fetch_add(1, Ordering::SeqCst);

        let latency = self.state.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock();
        let remaining = &mut state.failures[call.index()];
        if *remaining > 0 {
            *remaining -= 1;
            return Err(LedgerError::Unavailable(format!("scripted {call:?} failure")));
        }
        Ok(())
    }

    fn between(&self, a: Address, b: Address, closed: bool) -> Vec<DealId> {
        self.state
            .lock()
            .deals
            .iter()
            .filter(|d| {
                (d.buyer == a && d.supplier == b) || (d.buyer == b && d.supplier == a)
            })
            .filter(|d| (d.status == DealStatus::Closed) == closed)
            .map(|d| d.id)
            .collect()
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn get_opened_deals(
        &self,
        self_addr: Address,
        counterparty: Address,
    ) -> Result<Vec<DealId>, LedgerError> {
        self.enter(LedgerCall::OpenedDeals).await?;
        Ok(self.between(self_addr, counterparty, false))
    }

    async fn get_closed_deals(
        &self,
        self_addr: Address,
        counterparty: Address,
    ) -> Result<Vec<DealId>, LedgerError> {
        self.enter(LedgerCall::ClosedDeals).await?;
        Ok(self.between(self_addr, counterparty, true))
    }

    async fn get_deal_info(&self, id: DealId) -> Result<Deal, LedgerError> {
        self.enter(LedgerCall::DealInfo).await?;
        self.deal(id).ok_or(LedgerError::UnknownDeal(id))
    }

    async fn accept_deal(&self, key: &SigningKey, id: DealId) -> Result<(), LedgerError> {
        self.enter(LedgerCall::Accept).await?;
        let signer = Address::from_verifying_key(key.verifying_key());

        let mut state = self.state.lock();
        let deal = state
            .deals
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(LedgerError::UnknownDeal(id))?;

        if deal.supplier != signer {
            return Err(LedgerError::Rejected(format!(
                "{signer} is not the supplier of deal {id}"
            )));
        }
        if deal.status != DealStatus::Pending {
            return Err(LedgerError::Rejected(format!(
                "deal {id} is {}, not PENDING",
                deal.status
            )));
        }

        deal.status = DealStatus::Accepted;
        Ok(())
    }
}
