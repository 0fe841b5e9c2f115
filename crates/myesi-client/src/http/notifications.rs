//! Notification feed over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use myesi_core::config::ApiConfig;
use myesi_core::result::AppResult;
use myesi_core::traits::token_store::TokenStore;
use myesi_entity::notification::{NotificationId, NotificationPreferences};
use myesi_notify::source::{NotificationPage, NotificationQuery, NotificationSource};

use super::client::ApiClient;

/// [`NotificationSource`] backed by `/notifications/*` endpoints.
///
/// The bearer token is read from the session slot on every request, so a
/// login or logout takes effect on the next call.
#[derive(Debug, Clone)]
pub struct HttpNotificationSource {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl HttpNotificationSource {
    /// Build a feed for the configured backend.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> AppResult<Self> {
        Ok(Self::with_client(ApiClient::new(config)?, tokens))
    }

    /// Build a feed on an existing client.
    pub fn with_client(api: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self { api, tokens }
    }

    fn token(&self) -> Option<String> {
        self.tokens
            .load()
            .ok()
            .flatten()
            .map(|session| session.access_token)
    }

    fn request(&self, method: Method, path: &str, params: &[(&str, String)]) -> AppResult<reqwest::RequestBuilder> {
        let url = self.api.url(path, params)?;
        Ok(self.api.request(method, url, self.token().as_deref()))
    }
}

#[async_trait]
impl NotificationSource for HttpNotificationSource {
    async fn fetch(&self, query: &NotificationQuery) -> AppResult<NotificationPage> {
        let builder = self.request(Method::GET, "/notifications", &query.to_params())?;
        self.api.send_json(builder, "fetch notifications").await
    }

    async fn mark_read(&self, id: &NotificationId) -> AppResult<()> {
        let builder = self.request(Method::PATCH, &format!("/notifications/{id}/read"), &[])?;
        self.api.send_empty(builder, "mark notification read").await
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        let builder = self.request(Method::PATCH, "/notifications/read-all", &[])?;
        self.api.send_empty(builder, "mark all notifications read").await
    }

    async fn delete(&self, id: &NotificationId) -> AppResult<()> {
        let builder = self.request(Method::DELETE, &format!("/notifications/{id}"), &[])?;
        self.api.send_empty(builder, "delete notification").await
    }

    async fn preferences(&self) -> AppResult<NotificationPreferences> {
        let builder = self.request(Method::GET, "/notifications/preferences", &[])?;
        self.api.send_json(builder, "fetch notification preferences").await
    }

    async fn update_preferences(&self, patch: &NotificationPreferences) -> AppResult<()> {
        let builder = self
            .request(Method::PUT, "/notifications/preferences", &[])?
            .json(patch);
        self.api.send_empty(builder, "update notification preferences").await
    }
}
