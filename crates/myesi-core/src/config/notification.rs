//! Notification refresh configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Polling and display settings for the notification aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Base interval between refreshes in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Maximum random jitter added to each interval, in milliseconds.
    #[serde(default = "default_poll_jitter")]
    pub poll_jitter_ms: u64,
    /// Timeout for a single refresh or mutation call, in milliseconds.
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_ms: u64,
    /// Unread counts above this value render as `"{cap}+"`.
    #[serde(default = "default_badge_cap")]
    pub badge_cap: usize,
}

impl NotificationConfig {
    /// The base poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// The refresh/mutation timeout.
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            poll_jitter_ms: default_poll_jitter(),
            refresh_timeout_ms: default_refresh_timeout(),
            badge_cap: default_badge_cap(),
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}

fn default_poll_jitter() -> u64 {
    2_000
}

fn default_refresh_timeout() -> u64 {
    10_000
}

fn default_badge_cap() -> usize {
    99
}
