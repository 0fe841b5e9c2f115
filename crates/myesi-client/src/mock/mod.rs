//! In-process simulated backend.
//!
//! Reproduces the demo REST backend: four demo accounts, a fixed set of
//! notifications and artificial latency on every call.

pub mod auth;
pub mod fixtures;
pub mod notifications;

pub use auth::MockAuthGateway;
pub use notifications::MockNotificationSource;

use std::time::Duration;

/// Sleep for the configured latency; a zero delay returns immediately.
pub(crate) async fn simulate_latency(delay_ms: u64) {
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
