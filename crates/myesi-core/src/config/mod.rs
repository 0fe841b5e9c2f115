//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file overlaid with `MYESI__`-prefixed environment variables.
//! Every section carries serde defaults, so an empty source is valid.

pub mod api;
pub mod auth;
pub mod logging;
pub mod mock;
pub mod notification;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::api::ApiConfig;
pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::mock::MockConfig;
pub use self::notification::NotificationConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Longest token lifetime the simulated backend may issue, in hours.
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;

/// Largest accepted clock skew tolerance, in seconds.
pub const MAX_LEEWAY_SECONDS: u64 = 24 * 60 * 60;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend REST endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Token decoding and gate settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Persisted session slot settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Notification refresh settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Simulated backend settings.
    #[serde(default)]
    pub mock: MockConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; environment variables prefixed with `MYESI`
    /// (sections separated by `__`) override it. The result is validated.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MYESI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the runtime cannot honor.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.notifications.poll_interval_seconds == 0 {
            return Err(AppError::configuration(
                "notifications.poll_interval_seconds must be at least 1",
            ));
        }
        if self.notifications.refresh_timeout_ms == 0 {
            return Err(AppError::configuration(
                "notifications.refresh_timeout_ms must be greater than 0",
            ));
        }
        if self.api.timeout_ms == 0 {
            return Err(AppError::configuration("api.timeout_ms must be greater than 0"));
        }

        let chance = self.mock.realtime_chance;
        if !chance.is_finite() || !(0.0..=1.0).contains(&chance) {
            return Err(AppError::configuration(format!(
                "mock.realtime_chance must be between 0 and 1, got {chance}"
            )));
        }

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            return Err(AppError::configuration(format!(
                "auth.token_ttl_hours must be between 1 and {MAX_TOKEN_TTL_HOURS}"
            )));
        }
        if self.auth.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(AppError::configuration(format!(
                "auth.leeway_seconds must not exceed {MAX_LEEWAY_SECONDS}"
            )));
        }
        for (key, path) in [
            ("auth.login_path", &self.auth.login_path),
            ("auth.forbidden_path", &self.auth.forbidden_path),
        ] {
            if !path.starts_with('/') {
                return Err(AppError::configuration(format!(
                    "{key} must start with '/', got '{path}'"
                )));
            }
        }

        Ok(())
    }
}
