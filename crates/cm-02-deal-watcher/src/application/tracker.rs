//! # Deal Lifecycle Tracker
//!
//! Watch a known deal until the ledger reports it closed.
//!
//! ## Error policy
//!
//! Unlike discovery, a failed closed-deal list query ends the wait at once
//! with that error: a lifecycle observation must not stall silently on a
//! degraded ledger. A failed `get_deal_info` for a listed id only skips
//! that id.

use std::time::Duration;

use shared_types::CancelSignal;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::application::poll::{PollEvent, PollLoop};
use crate::domain::{Address, DealError, DealId, DealStatus, LedgerError, WaitState};
use crate::ports::Ledger;

/// One check: is `deal_id` among the closed deals with `counterparty`, and
/// does the ledger confirm it closed?
pub async fn is_deal_closed<L: Ledger + ?Sized>(
    ledger: &L,
    self_addr: Address,
    deal_id: DealId,
    counterparty: Address,
) -> Result<bool, LedgerError> {
    let ids = ledger.get_closed_deals(self_addr, counterparty).await?;

    debug!(
        counterparty = %counterparty,
        closed = ids.len(),
        "Checked closed deals"
    );

    for id in ids.into_iter().filter(|id| *id == deal_id) {
        match ledger.get_deal_info(id).await {
            Ok(deal) if deal.id == deal_id && deal.status == DealStatus::Closed => {
                return Ok(true)
            }
            Ok(_) => {}
            Err(err) => {
                debug!(deal_id = %id, error = %err, "Skipping closed deal");
            }
        }
    }

    Ok(false)
}

/// Poll [`is_deal_closed`] every `poll_interval` until it holds or `cancel`
/// fires. The first check runs one interval after the call, and a check
/// still waiting on the ledger is abandoned when `cancel` fires.
pub async fn wait_for_deal_closed<L: Ledger + ?Sized>(
    ledger: &L,
    self_addr: Address,
    deal_id: DealId,
    counterparty: Address,
    poll_interval: Duration,
    cancel: CancelSignal,
) -> Result<(), DealError> {
    let started = Instant::now();
    let mut poll = PollLoop::new(poll_interval, cancel);

    let state = loop {
        let state = match poll.next().await {
            PollEvent::Probe => {
                match poll
                    .guard(is_deal_closed(ledger, self_addr, deal_id, counterparty))
                    .await
                {
                    Ok(closed) => {
                        if closed? {
                            WaitState::Matched(())
                        } else {
                            WaitState::Waiting
                        }
                    }
                    Err(event) => interrupted(event),
                }
            }
            event => interrupted(event),
        };
        if state.is_terminal() {
            break state;
        }
    };

    if matches!(state, WaitState::Matched(())) {
        info!(deal_id = %deal_id, "Deal closed");
    }
    closed_outcome(state, started.elapsed())
}

fn interrupted(event: PollEvent) -> WaitState<()> {
    match event {
        PollEvent::Cancelled => WaitState::Cancelled,
        PollEvent::DeadlineElapsed => WaitState::TimedOut,
        PollEvent::Probe => WaitState::Waiting,
    }
}

fn closed_outcome(state: WaitState<()>, waited: Duration) -> Result<(), DealError> {
    match state {
        WaitState::Matched(()) => Ok(()),
        WaitState::Cancelled => Err(DealError::Cancelled),
        WaitState::TimedOut | WaitState::Waiting => Err(DealError::Timeout(waited)),
    }
}
