//! Simulated authentication endpoint.

use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use myesi_auth::jwt::{TokenDecoder, TokenEncoder};
use myesi_auth::password::PasswordHasher;
use myesi_auth::session::{AuthGateway, LoginResponse, UserPayload};
use myesi_core::config::{AppConfig, MockConfig};
use myesi_core::error::AppError;
use myesi_core::result::AppResult;
use myesi_entity::user::{Credentials, Identity, Role};

use super::simulate_latency;

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "demo123";

/// Refresh token handed out next to every access token.
const MOCK_REFRESH_TOKEN: &str = "mock_refresh_token";

#[derive(Debug, Clone)]
struct MockAccount {
    identity: Identity,
    password_hash: String,
    active: bool,
}

/// [`AuthGateway`] answering from an in-memory account table.
#[derive(Debug)]
pub struct MockAuthGateway {
    accounts: RwLock<Vec<MockAccount>>,
    hasher: PasswordHasher,
    encoder: TokenEncoder,
    decoder: TokenDecoder,
    delays: MockConfig,
}

impl MockAuthGateway {
    /// Build the gateway with the four demo accounts.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let hasher = PasswordHasher::new();
        // one hash for all demo accounts; hashing is slow
        let password_hash = hasher.hash_password(DEMO_PASSWORD)?;

        let accounts = demo_identities()
            .into_iter()
            .map(|identity| MockAccount {
                identity,
                password_hash: password_hash.clone(),
                active: true,
            })
            .collect();

        Ok(Self {
            accounts: RwLock::new(accounts),
            hasher,
            encoder: TokenEncoder::new(&config.auth),
            decoder: TokenDecoder::new(&config.auth),
            delays: config.mock.clone(),
        })
    }

    /// Add or replace an account (matched by email).
    pub fn with_account(self, identity: Identity, password: &str, active: bool) -> AppResult<Self> {
        let account = MockAccount {
            password_hash: self.hasher.hash_password(password)?,
            identity,
            active,
        };
        {
            let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
            accounts.retain(|a| !a.identity.email_matches(&account.identity.email));
            accounts.push(account);
        }
        Ok(self)
    }

    /// Enable or disable the account with `email`. Returns false when unknown.
    pub fn set_active(&self, email: &str, active: bool) -> bool {
        let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
        match accounts.iter_mut().find(|a| a.identity.email_matches(email)) {
            Some(account) => {
                account.active = active;
                true
            }
            None => false,
        }
    }

    fn find(&self, email: &str) -> Option<MockAccount> {
        self.accounts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|a| a.identity.email_matches(email))
            .cloned()
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse> {
        simulate_latency(self.delays.auth_delay_ms).await;

        let Some(account) = self.find(&credentials.email) else {
            debug!(email = %credentials.email, "Unknown demo account");
            return Err(AppError::invalid_credentials("Invalid email or password"));
        };

        if !self
            .hasher
            .verify_password(&credentials.password, &account.password_hash)?
        {
            debug!(email = %credentials.email, "Wrong demo password");
            return Err(AppError::invalid_credentials("Invalid email or password"));
        }

        if !account.active {
            warn!(email = %credentials.email, "Login to deactivated account");
            return Err(AppError::account_disabled("Your account has been deactivated"));
        }

        let issued = self.encoder.issue(&account.identity)?;
        info!(
            user_id = %account.identity.id,
            expires_at = %issued.expires_at,
            "Issued demo session token"
        );

        Ok(LoginResponse {
            access_token: issued.token,
            refresh_token: Some(MOCK_REFRESH_TOKEN.to_string()),
            user: Some(UserPayload::from(&account.identity)),
        })
    }

    async fn logout(&self, _access_token: Option<&str>) -> AppResult<()> {
        simulate_latency(self.delays.logout_delay_ms).await;
        Ok(())
    }

    async fn profile(&self, access_token: &str) -> AppResult<Identity> {
        simulate_latency(self.delays.profile_delay_ms).await;

        let claims = self
            .decoder
            .decode_valid(access_token)
            .map_err(|e| AppError::unauthenticated(format!("Invalid token: {}", e.message)))?;
        let id = claims.account_id().unwrap_or_default();

        self.accounts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|a| a.identity.id == id)
            .map(|a| a.identity.clone())
            .ok_or_else(|| AppError::unauthenticated("User not found"))
    }
}

fn demo_identities() -> Vec<Identity> {
    [
        ("admin_001", "Admin User", Role::Admin),
        ("dev_001", "Developer User", Role::Developer),
        ("analyst_001", "Analyst User", Role::Analyst),
        ("auditor_001", "Auditor User", Role::Auditor),
    ]
    .into_iter()
    .map(|(id, name, role)| Identity {
        id: id.to_string(),
        email: format!("{}@myesi.com", role.as_str()),
        name: name.to_string(),
        role: role.label().to_string(),
    })
    .collect()
}
