use std::sync::Arc;
use std::time::Duration;

use shared_types::CancelSignal;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::service::NodeDirectory;

/// Shortest sweep period the janitor accepts. Record timestamps have
/// one-second resolution, so sweeping faster gains nothing.
pub const MIN_CLEANUP_PERIOD: Duration = Duration::from_secs(1);

/// Background janitor: sweep `directory` every `period` until `shutdown`
/// fires.
///
/// The first sweep happens one full period after start. Shutdown wins over a
/// tick that is ready at the same time. A sweep cannot fail, so the loop
/// only ever exits through `shutdown`.
pub async fn run_janitor(directory: Arc<NodeDirectory>, period: Duration, mut shutdown: CancelSignal) {
    let period = if period < MIN_CLEANUP_PERIOD {
        warn!(
            requested_ms = period.as_millis() as u64,
            "Cleanup period below minimum, clamping"
        );
        MIN_CLEANUP_PERIOD
    } else {
        period
    };

    let mut cleanup_interval = tokio::time::interval_at(Instant::now() + period, period);
    cleanup_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(period_secs = period.as_secs(), "Directory janitor started");

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!("Directory janitor stopped");
                return;
            }
            _ = cleanup_interval.tick() => {
                directory.sweep_expired();
            }
        }
    }
}

/// Spawn [`run_janitor`] on the current tokio runtime.
pub fn spawn_janitor(
    directory: Arc<NodeDirectory>,
    period: Duration,
    shutdown: CancelSignal,
) -> JoinHandle<()> {
    tokio::spawn(run_janitor(directory, period, shutdown))
}
