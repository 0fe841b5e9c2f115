//! Periodic notification refresh.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use myesi_core::config::NotificationConfig;

use crate::center::NotificationCenter;

/// Refreshes a [`NotificationCenter`] every `interval ± jitter` until told
/// to stop.
///
/// A failed refresh is logged and the loop carries on; readers see the last
/// good records until the next successful tick.
#[derive(Debug, Clone)]
pub struct NotificationPoller {
    center: Arc<NotificationCenter>,
    interval: Duration,
    jitter: Duration,
}

impl NotificationPoller {
    /// Creates a poller with the configured interval and jitter.
    pub fn new(center: Arc<NotificationCenter>, config: &NotificationConfig) -> Self {
        Self {
            center,
            interval: config.poll_interval(),
            jitter: Duration::from_millis(config.poll_jitter_ms),
        }
    }

    /// Delay until the next tick: the interval shifted by a uniform amount
    /// within `±jitter`, never below zero.
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as i64;
        if jitter_ms == 0 {
            return self.interval;
        }
        let offset = rand::rng().random_range(-jitter_ms..=jitter_ms);
        let delay_ms = (self.interval.as_millis() as i64).saturating_add(offset).max(0);
        Duration::from_millis(delay_ms as u64)
    }

    /// One refresh followed by an arrival check.
    pub async fn tick(&self) {
        match self.center.refresh().await {
            Ok(count) => debug!(records = count, "Poll tick refreshed notifications"),
            Err(e) => warn!(error = %e, "Poll tick failed; keeping previous notifications"),
        }

        if let Err(e) = self.center.receive_arrival().await {
            warn!(error = %e, "Arrival check failed");
        }
    }

    /// Polls immediately and then on every delay until `shutdown` turns
    /// `true` or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            jitter_ms = self.jitter.as_millis() as u64,
            "Notification poller started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                _ = self.tick() => {}
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = time::sleep(self.next_delay()) => {}
            }
        }

        info!("Notification poller stopped");
    }

    /// Runs the poller on a background task.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}
