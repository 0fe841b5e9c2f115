//! Backend REST endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Host fragment that marks the local development backend, which is always
/// replaced by the simulated one.
const LOCAL_DEV_BACKEND: &str = "localhost:5000";

/// REST API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `https://api.example.com/api`.
    #[serde(default)]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Force the simulated backend even when a base URL is configured.
    #[serde(default)]
    pub use_mock: bool,
}

impl ApiConfig {
    /// Whether the simulated backend should be used instead of HTTP.
    pub fn should_use_mock(&self) -> bool {
        self.use_mock || self.base_url.trim().is_empty() || self.base_url.contains(LOCAL_DEV_BACKEND)
    }

    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout(),
            use_mock: false,
        }
    }
}

fn default_timeout() -> u64 {
    10_000
}
