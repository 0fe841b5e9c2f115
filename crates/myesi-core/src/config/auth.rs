//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Session token and capability gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for token signatures. When absent, tokens are decoded
    /// without signature verification and only their expiry is trusted.
    #[serde(default)]
    pub token_secret: Option<String>,
    /// Lifetime of tokens issued by the simulated backend, in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Clock skew tolerance applied to expiry checks, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
    /// Where unauthenticated visitors are sent.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Where authenticated visitors without the required role are sent.
    #[serde(default = "default_forbidden_path")]
    pub forbidden_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_hours: default_token_ttl(),
            leeway_seconds: 0,
            login_path: default_login_path(),
            forbidden_path: default_forbidden_path(),
        }
    }
}

fn default_token_ttl() -> u64 {
    24
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_forbidden_path() -> String {
    "/unauthorized".to_string()
}
