//! Session token issuing for the simulated backend.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use myesi_core::config::{AuthConfig, MAX_TOKEN_TTL_HOURS};
use myesi_core::error::AppError;
use myesi_entity::user::Identity;

use super::LEGACY_TOKEN_PREFIX;
use super::claims::Claims;

/// Signing key used when no secret is configured. Decoders without a secret
/// never verify signatures, so the value only has to be stable.
const UNVERIFIED_SIGNING_SECRET: &str = "myesi-unverified";

/// Issues signed HS256 session tokens.
#[derive(Clone)]
pub struct TokenEncoder {
    /// HMAC key for signing.
    encoding_key: EncodingKey,
    /// Token lifetime.
    ttl: Duration,
}

impl std::fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEncoder").field("ttl", &self.ttl).finish()
    }
}

/// A freshly issued token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded token.
    pub token: String,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
}

impl TokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config
            .token_secret
            .as_deref()
            .unwrap_or(UNVERIFIED_SIGNING_SECRET);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(config.token_ttl_hours.min(MAX_TOKEN_TTL_HOURS) as i64),
        }
    }

    /// Issue a token for `identity` valid for the configured lifetime.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, AppError> {
        self.issue_until(identity, Utc::now() + self.ttl)
    }

    /// Issue a token for `identity` expiring at `expires_at`.
    pub fn issue_until(
        &self,
        identity: &Identity,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let claims = Claims::for_identity(identity, Utc::now(), expires_at);
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token encoding failed: {e}")))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Issue an unsigned `mock_<base64(JSON)>` token, the format older
    /// simulated backends handed out.
    pub fn issue_legacy(&self, identity: &Identity) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims::for_identity(identity, now, now + self.ttl);
        Self::encode_legacy(&claims)
    }

    /// Encode arbitrary claims in the legacy unsigned format.
    pub fn encode_legacy(claims: &Claims) -> Result<String, AppError> {
        let json = serde_json::to_vec(claims)?;
        Ok(format!("{LEGACY_TOKEN_PREFIX}{}", STANDARD.encode(json)))
    }
}
