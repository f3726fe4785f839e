use super::registry::GameRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Periodically evict sessions idle for longer than `max_idle`
pub fn spawn_idle_sweeper(
    registry: Arc<GameRegistry>,
    max_idle: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    info!(?max_idle, ?interval, "Starting idle session sweeper");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(MIN_SWEEP_INTERVAL));
        // First tick fires immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let evicted = registry.evict_idle(max_idle);
            if evicted > 0 {
                info!(evicted, remaining = registry.active_sessions(), "Idle sessions evicted");
            } else {
                debug!("No idle sessions to evict");
            }
        }
    })
}
