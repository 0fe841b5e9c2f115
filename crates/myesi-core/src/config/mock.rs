//! Simulated backend configuration.

use serde::{Deserialize, Serialize};

/// Artificial latency and randomness of the simulated backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Delay before a login answer, in milliseconds.
    #[serde(default = "default_auth_delay")]
    pub auth_delay_ms: u64,
    /// Delay before a logout answer, in milliseconds.
    #[serde(default = "default_logout_delay")]
    pub logout_delay_ms: u64,
    /// Delay before a profile answer, in milliseconds.
    #[serde(default = "default_profile_delay")]
    pub profile_delay_ms: u64,
    /// Delay before a notification fetch answer, in milliseconds.
    #[serde(default = "default_notification_delay")]
    pub notification_delay_ms: u64,
    /// Delay before a notification mutation answer, in milliseconds.
    #[serde(default = "default_mutation_delay")]
    pub mutation_delay_ms: u64,
    /// Probability that a poll tick produces a new real-time notification.
    #[serde(default = "default_realtime_chance")]
    pub realtime_chance: f64,
}

impl MockConfig {
    /// A configuration without latency or random arrivals, for tests.
    pub fn instant() -> Self {
        Self {
            auth_delay_ms: 0,
            logout_delay_ms: 0,
            profile_delay_ms: 0,
            notification_delay_ms: 0,
            mutation_delay_ms: 0,
            realtime_chance: 0.0,
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            auth_delay_ms: default_auth_delay(),
            logout_delay_ms: default_logout_delay(),
            profile_delay_ms: default_profile_delay(),
            notification_delay_ms: default_notification_delay(),
            mutation_delay_ms: default_mutation_delay(),
            realtime_chance: default_realtime_chance(),
        }
    }
}

fn default_auth_delay() -> u64 {
    800
}

fn default_logout_delay() -> u64 {
    300
}

fn default_profile_delay() -> u64 {
    500
}

fn default_notification_delay() -> u64 {
    300
}

fn default_mutation_delay() -> u64 {
    200
}

fn default_realtime_chance() -> f64 {
    0.1
}
