//! Session token decoding and expiry checks.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use myesi_core::config::AuthConfig;
use myesi_core::error::AppError;

use super::LEGACY_TOKEN_PREFIX;
use super::claims::Claims;

/// Decodes session tokens into [`Claims`].
///
/// With a configured secret, JWTs must carry a valid HS256 signature and the
/// unsigned legacy format is rejected. Without one, the payload is decoded
/// without verification, the same trust a browser client places in a token
/// it cannot verify; only the expiry is enforced.
#[derive(Clone)]
pub struct TokenDecoder {
    /// Signature verification, when a secret is configured.
    verification: Option<(DecodingKey, Validation)>,
    /// Clock skew tolerance for expiry checks.
    leeway_seconds: u64,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("verifies_signature", &self.verification.is_some())
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let verification = config.token_secret.as_ref().map(|secret| {
            let mut validation = Validation::new(Algorithm::HS256);
            // expiry is checked by `decode_valid` so both formats share one rule
            validation.validate_exp = false;
            validation.validate_aud = false;
            (DecodingKey::from_secret(secret.as_bytes()), validation)
        });

        Self {
            verification,
            leeway_seconds: config.leeway_seconds,
        }
    }

    /// Decodes a token without checking its expiry.
    ///
    /// Fails with `TokenMalformed` when the token cannot be decoded or its
    /// signature does not verify.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::token_malformed("empty token"));
        }

        if let Some(encoded) = token.strip_prefix(LEGACY_TOKEN_PREFIX) {
            if self.verification.is_some() {
                return Err(AppError::token_malformed(
                    "unsigned token rejected: signature verification is enabled",
                ));
            }
            return decode_legacy(encoded);
        }

        match &self.verification {
            Some((key, validation)) => decode_verified(token, key, validation),
            None => decode_unverified(token),
        }
    }

    /// Decodes a token and rejects it when expired.
    pub fn decode_valid(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode(token)?;
        if self.is_expired(&claims) {
            return Err(AppError::token_expired("Token has expired"));
        }
        Ok(claims)
    }

    /// Whether the claims are expired right now.
    pub fn is_expired(&self, claims: &Claims) -> bool {
        claims.is_expired_at(Utc::now().timestamp(), self.leeway_seconds)
    }
}

/// `mock_<base64(JSON)>`, standard alphabet with padding.
fn decode_legacy(encoded: &str) -> Result<Claims, AppError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| AppError::token_malformed(format!("invalid token encoding: {e}")))?;
    parse_payload(&bytes)
}

fn decode_verified(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<Claims, AppError> {
    decode::<Claims>(token, key, validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                AppError::token_malformed("Invalid token signature")
            }
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                AppError::token_malformed("Invalid token format")
            }
            _ => AppError::token_malformed(format!("Token validation failed: {e}")),
        })
}

/// Reads the payload segment of a `header.payload.signature` token.
fn decode_unverified(token: &str) -> Result<Claims, AppError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts[1].is_empty() {
        return Err(AppError::token_malformed("Invalid token format"));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| AppError::token_malformed(format!("invalid token encoding: {e}")))?;
    parse_payload(&bytes)
}

fn parse_payload(bytes: &[u8]) -> Result<Claims, AppError> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::token_malformed(format!("invalid token payload: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use myesi_core::ErrorKind;
    use myesi_entity::user::Identity;

    use super::*;
    use crate::jwt::encoder::TokenEncoder;

    fn identity() -> Identity {
        Identity {
            id: "analyst_001".to_string(),
            email: "analyst@myesi.com".to_string(),
            name: "Analyst User".to_string(),
            role: "Analyst".to_string(),
        }
    }

    fn config(secret: Option<&str>) -> AuthConfig {
        AuthConfig {
            token_secret: secret.map(str::to_string),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_unverified_round_trip() {
        let cfg = config(None);
        let token = TokenEncoder::new(&cfg).issue(&identity()).unwrap().token;
        let claims = TokenDecoder::new(&cfg).decode_valid(&token).unwrap();
        assert_eq!(claims.account_id(), Some("analyst_001"));
        assert_eq!(claims.role, "Analyst");
    }

    #[test]
    fn test_verified_rejects_wrong_secret() {
        let token = TokenEncoder::new(&config(Some("issuer-secret")))
            .issue(&identity())
            .unwrap()
            .token;

        let ok = TokenDecoder::new(&config(Some("issuer-secret"))).decode_valid(&token);
        assert!(ok.is_ok());

        let err = TokenDecoder::new(&config(Some("other-secret")))
            .decode(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenMalformed);
    }

    #[test]
    fn test_expired_token() {
        let cfg = config(None);
        let expired = Utc::now() - Duration::seconds(1);
        let token = TokenEncoder::new(&cfg)
            .issue_until(&identity(), expired)
            .unwrap()
            .token;

        let decoder = TokenDecoder::new(&cfg);
        assert!(decoder.decode(&token).is_ok());
        let err = decoder.decode_valid(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenExpired);
    }

    #[test]
    fn test_legacy_format() {
        let cfg = config(None);
        let token = TokenEncoder::new(&cfg).issue_legacy(&identity()).unwrap();
        assert!(token.starts_with(LEGACY_TOKEN_PREFIX));

        let claims = TokenDecoder::new(&cfg).decode_valid(&token).unwrap();
        assert_eq!(claims.email, "analyst@myesi.com");

        let err = TokenDecoder::new(&config(Some("secret")))
            .decode(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenMalformed);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let decoder = TokenDecoder::new(&config(None));
        for token in ["", "abc", "a.b", "a.!!!.c", "mock_%%%", "mock_bm90IGpzb24="] {
            let err = decoder.decode(token).unwrap_err();
            assert_eq!(err.kind, ErrorKind::TokenMalformed, "token {token:?}");
        }
    }

    #[test]
    fn test_missing_exp_is_malformed() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"userId":"x","email":"a@b.c","role":"Admin"}"#);
        let token = format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig");
        let err = TokenDecoder::new(&config(None)).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenMalformed);
    }
}
