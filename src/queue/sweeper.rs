//! Background expiry of abandoned queue entries.

use chrono::Utc;
use std::time::Duration;

use super::service::VirtualQueue;

/// Spawns the sweeper and returns immediately.
pub fn start(queue: VirtualQueue, interval: Duration) -> tokio::task::JoinHandle<()> {
    tracing::info!("Starting queue sweeper every {:?}", interval);
    tokio::spawn(async move {
        sweep_loop(queue, interval).await;
    })
}

/// Runs `sweep_once` forever. A failed sweep is logged and retried on the next tick.
async fn sweep_loop(queue: VirtualQueue, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = queue.sweep_once(Utc::now()).await {
            tracing::warn!("Queue sweep failed: {}", e);
        }
    }
}
