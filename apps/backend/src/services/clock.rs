//! Session clock: one tick per interval until cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::services::coordinator::SessionCoordinator;

/// Spawns the ticking task. The first tick fires one full interval after
/// spawning.
pub fn spawn_clock(
    coordinator: Arc<SessionCoordinator>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = interval.as_millis() as u64, "Session clock started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let heartbeat = coordinator.tick();
                    debug!(tick = heartbeat.tick, time_left = heartbeat.time_left, "Clock tick");
                }
            }
        }

        info!("Session clock stopped");
    })
}
