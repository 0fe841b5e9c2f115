//! Authentication endpoint over HTTP.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tracing::{info, warn};

use myesi_auth::session::{AuthGateway, LoginResponse, UserPayload};
use myesi_core::config::ApiConfig;
use myesi_core::error::{AppError, ErrorKind};
use myesi_core::result::AppResult;
use myesi_entity::user::{Credentials, Identity};

use super::client::{ApiClient, ensure_success, rejection_message};

/// Shown when a 401 login rejection carries no message.
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
/// Shown when a 403 login rejection carries no message.
const ACCOUNT_DISABLED_MESSAGE: &str = "Your account has been deactivated";

/// [`AuthGateway`] backed by `/auth/*` endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    api: ApiClient,
}

impl HttpAuthGateway {
    /// Build a gateway for the configured backend.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    /// Build a gateway on an existing client.
    pub fn with_client(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse> {
        let url = self.api.url("/auth/login", &[])?;
        let builder = self.api.request(Method::POST, url, None).json(credentials);

        // 401/403 on login mean bad credentials and a disabled account, not
        // an expired session
        let response = self.api.send_raw(builder, "login").await?;
        let response = match response.status() {
            StatusCode::UNAUTHORIZED => {
                let message = rejection_message(response).await;
                return Err(AppError::invalid_credentials(
                    message.unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_string()),
                ));
            }
            StatusCode::FORBIDDEN => {
                let message = rejection_message(response).await;
                return Err(AppError::account_disabled(
                    message.unwrap_or_else(|| ACCOUNT_DISABLED_MESSAGE.to_string()),
                ));
            }
            _ => ensure_success(response, "login").await.inspect_err(|err| {
                warn!(error = %err, "Login request failed");
            })?,
        };

        let login: LoginResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("login: invalid response body: {e}"),
                e,
            )
        })?;
        info!(email = %credentials.email, "Backend accepted login");
        Ok(login)
    }

    async fn logout(&self, access_token: Option<&str>) -> AppResult<()> {
        let url = self.api.url("/auth/logout", &[])?;
        let builder = self.api.request(Method::POST, url, access_token);
        self.api.send_empty(builder, "logout").await
    }

    async fn profile(&self, access_token: &str) -> AppResult<Identity> {
        let url = self.api.url("/auth/profile", &[])?;
        let builder = self.api.request(Method::GET, url, Some(access_token));
        let payload: UserPayload = self.api.send_json(builder, "profile").await?;
        identity_from_payload(payload)
    }
}

fn identity_from_payload(payload: UserPayload) -> AppResult<Identity> {
    match payload {
        UserPayload {
            id: Some(id),
            email: Some(email),
            name,
            role: Some(role),
        } => Ok(Identity {
            id,
            email,
            name: name.unwrap_or_default(),
            role,
        }),
        _ => Err(AppError::new(
            ErrorKind::Serialization,
            "profile: response is missing id, email or role",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_payload_requires_identity_fields() {
        let payload: UserPayload = serde_json::from_value(serde_json::json!({
            "id": 7, "email": "auditor@myesi.com", "role": "Auditor"
        }))
        .unwrap();
        let identity = identity_from_payload(payload).unwrap();
        assert_eq!(identity.id, "7");
        assert_eq!(identity.name, "");

        let partial = UserPayload {
            email: Some("x@y.z".to_string()),
            ..UserPayload::default()
        };
        assert!(identity_from_payload(partial).is_err());
    }
}
