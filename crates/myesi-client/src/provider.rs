//! Collaborator selection: simulated backend or REST.

use std::sync::Arc;

use tracing::info;

use myesi_auth::session::AuthGateway;
use myesi_core::config::AppConfig;
use myesi_core::result::AppResult;
use myesi_core::traits::token_store::TokenStore;
use myesi_notify::source::NotificationSource;

use crate::http::{ApiClient, HttpAuthGateway, HttpNotificationSource};
use crate::mock::{MockAuthGateway, MockNotificationSource};

/// The authentication endpoint and notification feed for one process.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct ClientProvider {
    gateway: Arc<dyn AuthGateway>,
    notifications: Arc<dyn NotificationSource>,
    mock: bool,
}

impl ClientProvider {
    /// Build the collaborators selected by `config.api`.
    ///
    /// `tokens` is the session slot the HTTP feed reads its bearer token from.
    pub fn from_config(config: &AppConfig, tokens: Arc<dyn TokenStore>) -> AppResult<Self> {
        if config.api.should_use_mock() {
            info!("Initializing simulated backend");
            return Ok(Self {
                gateway: Arc::new(MockAuthGateway::new(config)?),
                notifications: Arc::new(MockNotificationSource::new(&config.mock)),
                mock: true,
            });
        }

        let api = ApiClient::new(&config.api)?;
        info!(base_url = %api.base_url(), "Initializing REST backend");
        Ok(Self {
            gateway: Arc::new(HttpAuthGateway::with_client(api.clone())),
            notifications: Arc::new(HttpNotificationSource::with_client(api, tokens)),
            mock: false,
        })
    }

    /// Wrap existing collaborators (for testing).
    pub fn from_parts(
        gateway: Arc<dyn AuthGateway>,
        notifications: Arc<dyn NotificationSource>,
    ) -> Self {
        Self {
            gateway,
            notifications,
            mock: false,
        }
    }

    /// The authentication endpoint.
    pub fn gateway(&self) -> Arc<dyn AuthGateway> {
        Arc::clone(&self.gateway)
    }

    /// The notification feed.
    pub fn notifications(&self) -> Arc<dyn NotificationSource> {
        Arc::clone(&self.notifications)
    }

    /// Whether the simulated backend is in use.
    pub fn is_mock(&self) -> bool {
        self.mock
    }
}
