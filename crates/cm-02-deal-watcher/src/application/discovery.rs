//! # Deal Discovery
//!
//! Find the pending deal a counterparty opened for a given specification.
//!
//! ## Error policy
//!
//! Ledger failures are transient here. A failed list query makes that probe
//! a miss and the loop keeps going; a failed `get_deal_info` skips just that
//! candidate. If the deadline arrives while the most recent probe had failed
//! at the ledger, that ledger error is returned instead of `Timeout`.

use std::time::Duration;

use shared_types::CancelSignal;
use tracing::{debug, info, warn};

use crate::application::poll::{PollEvent, PollLoop};
use crate::domain::{Address, Deal, DealError, DealRequest, LedgerError, WaitState};
use crate::ports::Ledger;

/// One probe: list open deals with the counterparty, then take the first
/// candidate, in ledger order, that `request` matches.
pub async fn find_deal_once<L: Ledger + ?Sized>(
    ledger: &L,
    self_addr: Address,
    request: &DealRequest,
) -> Result<Option<Deal>, LedgerError> {
    let ids = ledger
        .get_opened_deals(self_addr, request.counterparty)
        .await?;

    info!(
        counterparty = %request.counterparty,
        spec_hash = %request.spec_hash,
        candidates = ids.len(),
        "Probing for created deal"
    );

    for id in ids {
        let deal = match ledger.get_deal_info(id).await {
            Ok(deal) => deal,
            Err(err) => {
                debug!(deal_id = %id, error = %err, "Skipping candidate");
                continue;
            }
        };

        if request.matches(&deal) {
            return Ok(Some(deal));
        }
    }

    Ok(None)
}

/// Wait until [`find_deal_once`] hits, the deadline passes or `cancel`
/// fires. A probe still running when the deadline passes is abandoned.
pub async fn wait_for_deal_created<L: Ledger + ?Sized>(
    ledger: &L,
    self_addr: Address,
    request: &DealRequest,
    timeout: Duration,
    poll_interval: Duration,
    cancel: CancelSignal,
) -> Result<Deal, DealError> {
    let mut poll = PollLoop::new(poll_interval, cancel)
        .with_deadline(timeout)
        .with_immediate_probe();
    let mut last_error: Option<LedgerError> = None;

    let state = loop {
        let state = match poll.next().await {
            PollEvent::Probe => match poll
                .guard(find_deal_once(ledger, self_addr, request))
                .await
            {
                Ok(Ok(Some(deal))) => WaitState::Matched(deal),
                Ok(Ok(None)) => {
                    last_error = None;
                    WaitState::Waiting
                }
                Ok(Err(err)) => {
                    warn!(error = %err, "Deal probe failed, will retry");
                    last_error = Some(err);
                    WaitState::Waiting
                }
                Err(PollEvent::Cancelled) => WaitState::Cancelled,
                Err(_) => WaitState::TimedOut,
            },
            PollEvent::DeadlineElapsed => WaitState::TimedOut,
            PollEvent::Cancelled => WaitState::Cancelled,
        };
        if state.is_terminal() {
            break state;
        }
    };

    match state {
        WaitState::Matched(deal) => {
            info!(deal_id = %deal.id, "Found created deal");
            Ok(deal)
        }
        WaitState::Cancelled => Err(DealError::Cancelled),
        WaitState::TimedOut | WaitState::Waiting => Err(match last_error {
            Some(err) => DealError::Provider(err),
            None => DealError::Timeout(timeout),
        }),
    }
}
