//! Claims carried by a session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use myesi_core::error::AppError;
use myesi_entity::user::Identity;

/// Claims payload embedded in every session token.
///
/// The account identifier has been issued under three names over time
/// (`userId`, `id`, `sub`); all are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier as issued by the current backend.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Account identifier as issued by older backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Standard JWT subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Role string; casing varies.
    #[serde(default)]
    pub role: String,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Build claims for an identity expiring at `expires_at`.
    pub fn for_identity(identity: &Identity, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id: Some(identity.id.clone()),
            id: None,
            sub: None,
            email: identity.email.clone(),
            name: identity.name.clone(),
            role: identity.role.clone(),
            iat: Some(issued_at.timestamp()),
            exp: expires_at.timestamp(),
        }
    }

    /// The account identifier, whichever claim carries it.
    pub fn account_id(&self) -> Option<&str> {
        [&self.user_id, &self.id, &self.sub]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is expired at `now` (seconds since epoch).
    ///
    /// A token is valid only while `now < exp + leeway`.
    pub fn is_expired_at(&self, now: i64, leeway_seconds: u64) -> bool {
        let leeway = i64::try_from(leeway_seconds).unwrap_or(i64::MAX);
        now >= self.exp.saturating_add(leeway)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp(), 0)
    }

    /// Returns the remaining TTL in seconds (0 if expired).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }

    /// Derive the identity these claims describe.
    ///
    /// Fails when the account id, email or role is missing.
    pub fn to_identity(&self) -> Result<Identity, AppError> {
        let id = self
            .account_id()
            .ok_or_else(|| AppError::token_malformed("missing claim: userId"))?;
        if self.email.trim().is_empty() {
            return Err(AppError::token_malformed("missing claim: email"));
        }
        if self.role.trim().is_empty() {
            return Err(AppError::token_malformed("missing claim: role"));
        }

        Ok(Identity {
            id: id.to_string(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
        })
    }
}
