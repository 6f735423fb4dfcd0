//! # Deal Lifecycle Tests
//!
//! Discovery, closed-deal tracking and their error policies against the
//! in-memory ledger, under paused tokio time.
//!
//! ## Test Categories
//!
//! 1. **Discovery** - immediate probe, matching, timeout, transient errors
//! 2. **Tracking** - closure, cancellation, fatal errors
//! 3. **Slow ledger** - deadline and cancellation while a call is in flight
//! 4. **End to end** - discover, accept, fetch, close

use std::sync::Arc;
use std::time::Duration;

use cm_02_deal_watcher::{
    Address, Deal, DealError, DealId, DealRequest, DealStatus, DealWatcher, DealWatcherApi,
    DealWatcherConfig, InMemoryLedger, LedgerCall, LedgerError, SpecHash,
};
use k256::ecdsa::SigningKey;
use shared_types::{cancel_channel, CancelSignal, ErrorKind, Timestamp};
use tokio::time::Instant;

// =============================================================================
// TEST HELPERS
// =============================================================================

const BUYER: Address = Address::new([0xb0; 20]);
const SPEC: SpecHash = SpecHash::new([0x5e; 32]);

fn setup() -> (Arc<InMemoryLedger>, DealWatcher<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::new());
    let key = SigningKey::from_slice(&[0x42; 32]).unwrap();
    let watcher = DealWatcher::new(ledger.clone(), key, DealWatcherConfig::for_testing());
    (ledger, watcher)
}

fn make_deal(id: u64, supplier: Address, spec: SpecHash, status: DealStatus) -> Deal {
    Deal {
        id: DealId::from(id),
        buyer: BUYER,
        supplier,
        spec_hash: spec,
        status,
        start_time: Timestamp::new(1_700_000_000),
        end_time: Timestamp::new(1_700_003_600),
    }
}

fn request() -> DealRequest {
    DealRequest::new(BUYER, SPEC)
}

// =============================================================================
// DISCOVERY
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_existing_deal_found_without_waiting() {
    let (ledger, watcher) = setup();
    ledger.insert(make_deal(1, watcher.address(), SPEC, DealStatus::Pending));

    let start = Instant::now();
    let deal = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(deal.id, DealId::from(1));
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(ledger.calls(LedgerCall::OpenedDeals), 1);
}

#[tokio::test(start_paused = true)]
async fn test_first_match_in_ledger_order_wins() {
    let (ledger, watcher) = setup();
    let me = watcher.address();
    ledger.insert(make_deal(10, me, SpecHash::new([0; 32]), DealStatus::Pending));
    ledger.insert(make_deal(11, me, SPEC, DealStatus::Accepted));
    ledger.insert(make_deal(12, me, SPEC, DealStatus::Pending));
    ledger.insert(make_deal(13, me, SPEC, DealStatus::Pending));

    let deal = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(deal.id, DealId::from(12));
}

#[tokio::test(start_paused = true)]
async fn test_deal_created_later_is_found_on_a_tick() {
    let (ledger, watcher) = setup();
    let me = watcher.address();

    let writer = ledger.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        writer.insert(make_deal(7, me, SPEC, DealStatus::Pending));
    });

    let start = Instant::now();
    let deal = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(deal.id, DealId::from(7));
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_no_deal_times_out_at_deadline() {
    let (ledger, watcher) = setup();

    let start = Instant::now();
    let err = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap_err();

    assert_eq!(err, DealError::Timeout(Duration::from_secs(3)));
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(start.elapsed(), Duration::from_secs(3));
    // Immediate probe plus ticks at 1s and 2s; the deadline beats the 3s tick.
    assert_eq!(ledger.calls(LedgerCall::OpenedDeals), 3);
}

#[tokio::test(start_paused = true)]
async fn test_transient_error_mid_poll_is_tolerated() {
    let (ledger, watcher) = setup();
    let me = watcher.address();
    ledger.fail_next(LedgerCall::OpenedDeals, 2);

    let writer = ledger.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        writer.insert(make_deal(3, me, SPEC, DealStatus::Pending));
    });

    let deal = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(deal.id, DealId::from(3));
    assert_eq!(ledger.calls(LedgerCall::OpenedDeals), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_candidate_lookup_skips_only_that_candidate() {
    let (ledger, watcher) = setup();
    let me = watcher.address();
    ledger.insert(make_deal(1, me, SPEC, DealStatus::Pending));
    ledger.insert(make_deal(2, me, SPEC, DealStatus::Pending));
    ledger.fail_next(LedgerCall::DealInfo, 1);

    let deal = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(deal.id, DealId::from(2));
}

#[tokio::test(start_paused = true)]
async fn test_last_ledger_error_is_returned_at_deadline() {
    let (ledger, watcher) = setup();
    ledger.fail_next(LedgerCall::OpenedDeals, u32::MAX);

    let err = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, DealError::Provider(LedgerError::Unavailable(_))));
    assert_eq!(err.kind(), ErrorKind::TransientProvider);
}

#[tokio::test(start_paused = true)]
async fn test_recovered_ledger_times_out_normally() {
    let (ledger, watcher) = setup();
    ledger.fail_next(LedgerCall::OpenedDeals, 1);

    let err = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap_err();

    assert_eq!(err, DealError::Timeout(Duration::from_secs(3)));
}

#[tokio::test(start_paused = true)]
async fn test_discovery_cancelled() {
    let (_ledger, watcher) = setup();
    let (canceller, signal) = cancel_channel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1_200)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(900), signal)
        .await
        .unwrap_err();

    assert_eq!(err, DealError::Cancelled);
    assert_eq!(start.elapsed(), Duration::from_millis(1_200));
}

#[tokio::test(start_paused = true)]
async fn test_default_timeout_comes_from_config() {
    let (_ledger, watcher) = setup();

    let err = watcher
        .wait_for_deal_created_default(&request(), CancelSignal::never())
        .await
        .unwrap_err();

    assert_eq!(err, DealError::Timeout(watcher.config().deal_wait_timeout));
}

// =============================================================================
// TRACKING
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_closed_deal_observed_on_first_tick() {
    let (ledger, watcher) = setup();
    ledger.insert(make_deal(5, watcher.address(), SPEC, DealStatus::Closed));

    let start = Instant::now();
    watcher
        .wait_for_deal_closed(DealId::from(5), BUYER, CancelSignal::never())
        .await
        .unwrap();

    // No immediate probe: the first check is one interval in.
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_closure_observed_after_transition() {
    let (ledger, watcher) = setup();
    ledger.insert(make_deal(5, watcher.address(), SPEC, DealStatus::Accepted));
    ledger.insert(make_deal(6, watcher.address(), SPEC, DealStatus::Closed));

    let writer = ledger.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert!(writer.set_status(DealId::from(5), DealStatus::Closed));
    });

    let start = Instant::now();
    watcher
        .wait_for_deal_closed(DealId::from(5), BUYER, CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(15));
    assert_eq!(ledger.calls(LedgerCall::ClosedDeals), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_returns_before_next_tick() {
    let (ledger, watcher) = setup();
    let (canceller, signal) = cancel_channel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = watcher
        .wait_for_deal_closed(DealId::from(5), BUYER, signal)
        .await
        .unwrap_err();

    assert_eq!(err, DealError::Cancelled);
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(start.elapsed(), Duration::from_millis(500));
    assert_eq!(ledger.calls(LedgerCall::ClosedDeals), 0);
}

#[tokio::test(start_paused = true)]
async fn test_closed_query_failure_is_fatal() {
    let (ledger, watcher) = setup();
    ledger.fail_next(LedgerCall::ClosedDeals, 1);

    let err = watcher
        .wait_for_deal_closed(DealId::from(5), BUYER, CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, DealError::Provider(LedgerError::Unavailable(_))));
    assert_eq!(ledger.calls(LedgerCall::ClosedDeals), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_info_for_closed_id_is_skipped() {
    let (ledger, watcher) = setup();
    ledger.insert(make_deal(5, watcher.address(), SPEC, DealStatus::Closed));
    ledger.fail_next(LedgerCall::DealInfo, 1);

    let start = Instant::now();
    watcher
        .wait_for_deal_closed(DealId::from(5), BUYER, CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

// =============================================================================
// SLOW LEDGER
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_discovery_deadline_holds_while_ledger_is_slow() {
    let (ledger, watcher) = setup();
    ledger.set_latency(Duration::from_secs(100));

    let start = Instant::now();
    let err = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(3), CancelSignal::never())
        .await
        .unwrap_err();

    assert_eq!(err, DealError::Timeout(Duration::from_secs(3)));
    assert_eq!(start.elapsed(), Duration::from_secs(3));
    assert_eq!(ledger.calls(LedgerCall::OpenedDeals), 1);
}

#[tokio::test(start_paused = true)]
async fn test_discovery_cancel_interrupts_slow_probe() {
    let (ledger, watcher) = setup();
    ledger.set_latency(Duration::from_secs(100));
    let (canceller, signal) = cancel_channel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(700)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(30), signal)
        .await
        .unwrap_err();

    assert_eq!(err, DealError::Cancelled);
    assert_eq!(start.elapsed(), Duration::from_millis(700));
}

#[tokio::test(start_paused = true)]
async fn test_tracker_cancel_interrupts_slow_check() {
    let (ledger, watcher) = setup();
    ledger.set_latency(Duration::from_secs(100));
    let (canceller, signal) = cancel_channel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = watcher
        .wait_for_deal_closed(DealId::from(5), BUYER, signal)
        .await
        .unwrap_err();

    assert_eq!(err, DealError::Cancelled);
    assert_eq!(start.elapsed(), Duration::from_millis(5_500));
    assert_eq!(ledger.calls(LedgerCall::ClosedDeals), 1);
}

#[tokio::test(start_paused = true)]
async fn test_zero_intervals_do_not_panic() {
    let ledger = Arc::new(InMemoryLedger::new());
    let key = SigningKey::from_slice(&[0x42; 32]).unwrap();
    let config = DealWatcherConfig {
        deal_wait_timeout: Duration::from_secs(1),
        discovery_poll_interval: Duration::ZERO,
        closed_poll_interval: Duration::ZERO,
    };
    let watcher = DealWatcher::new(ledger.clone(), key, config);
    ledger.insert(make_deal(8, watcher.address(), SPEC, DealStatus::Closed));

    let err = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(1), CancelSignal::never())
        .await
        .unwrap_err();
    assert_eq!(err, DealError::Timeout(Duration::from_secs(1)));

    let start = Instant::now();
    watcher
        .wait_for_deal_closed(DealId::from(8), BUYER, CancelSignal::never())
        .await
        .unwrap();
    assert_eq!(start.elapsed(), cm_02_deal_watcher::MIN_POLL_INTERVAL);
}

// =============================================================================
// END TO END
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_discover_accept_get_close() {
    let (ledger, watcher) = setup();
    let watcher: Arc<dyn DealWatcherApi> = Arc::new(watcher);
    let me = watcher.address();

    let writer = ledger.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(4)).await;
        writer.insert(make_deal(99, me, SPEC, DealStatus::Pending));
    });

    let deal = watcher
        .wait_for_deal_created(&request(), Duration::from_secs(30), CancelSignal::never())
        .await
        .unwrap();
    assert_eq!(deal.status, DealStatus::Pending);

    // Not ours to see until accepted.
    assert!(matches!(
        watcher.get_deal(&deal.id.to_string()).await,
        Err(DealError::NotFound(_))
    ));

    watcher.accept_deal(&deal.id.to_string()).await.unwrap();
    let accepted = watcher.get_deal("99").await.unwrap();
    assert_eq!(accepted.status, DealStatus::Accepted);
    assert_eq!(accepted.supplier, me);

    let closer = ledger.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(7)).await;
        assert!(closer.set_status(DealId::from(99), DealStatus::Closed));
    });

    watcher
        .wait_for_deal_closed(deal.id, BUYER, CancelSignal::never())
        .await
        .unwrap();

    assert!(matches!(
        watcher.get_deal("99").await,
        Err(DealError::NotFound(_))
    ));
}
