//! # Poll Loop
//!
//! The suspension points shared by discovery and closed-deal tracking.
//!
//! A [`PollLoop`] yields one [`PollEvent`] per call to [`PollLoop::next`]:
//! either "probe now", "deadline passed" or "cancelled". When several are
//! ready at once, cancellation wins over the deadline, which wins over a
//! probe tick. Between events the loop only sleeps; it never spins.
//!
//! A probe itself may be slow. [`PollLoop::guard`] runs it under the same
//! cancel and deadline watch, so neither is missed while the ledger answers.

use std::future::Future;
use std::time::Duration;

use shared_types::CancelSignal;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::warn;

/// Shortest probe period a [`PollLoop`] accepts.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the caller should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollEvent {
    /// Run one probe.
    Probe,
    /// The overall deadline passed.
    DeadlineElapsed,
    /// The cancellation signal fired.
    Cancelled,
}

/// Timer-driven probe schedule with an optional deadline.
#[derive(Debug)]
pub struct PollLoop {
    ticks: Interval,
    deadline: Option<Instant>,
    cancel: CancelSignal,
    probe_now: bool,
}

impl PollLoop {
    /// Probe every `period`, starting one period from now.
    ///
    /// Periods below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(period: Duration, cancel: CancelSignal) -> Self {
        let period = if period < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = period.as_millis() as u64,
                "Poll interval below minimum, clamping"
            );
            MIN_POLL_INTERVAL
        } else {
            period
        };

        let mut ticks = time::interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            ticks,
            deadline: None,
            cancel,
            probe_now: false,
        }
    }

    /// Stop with [`PollEvent::DeadlineElapsed`] once `timeout` has passed.
    #[must_use]
    pub fn with_deadline(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Yield one [`PollEvent::Probe`] before the first tick.
    #[must_use]
    pub fn with_immediate_probe(mut self) -> Self {
        self.probe_now = true;
        self
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> PollEvent {
        if self.cancel.is_cancelled() {
            return PollEvent::Cancelled;
        }
        if std::mem::take(&mut self.probe_now) {
            return PollEvent::Probe;
        }

        let deadline = self.deadline;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => PollEvent::Cancelled,
            _ = sleep_until(deadline) => PollEvent::DeadlineElapsed,
            _ = self.ticks.tick() => PollEvent::Probe,
        }
    }

    /// Run `probe` unless cancellation or the deadline comes first.
    ///
    /// On `Err` the probe future has been dropped and the error holds the
    /// event that interrupted it.
    pub async fn guard<F: Future>(&mut self, probe: F) -> Result<F::Output, PollEvent> {
        let deadline = self.deadline;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PollEvent::Cancelled),
            _ = sleep_until(deadline) => Err(PollEvent::DeadlineElapsed),
            out = probe => Ok(out),
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
