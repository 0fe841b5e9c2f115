//! Persistence trait for the single "current access token" slot.

use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Contents of the persisted session slot.
///
/// Field names match what the browser dashboard wrote to local storage, so
/// the same JSON can be shared between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    /// The raw access token.
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Snapshot of the identity the token was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

impl StoredSession {
    /// A slot holding only a token.
    pub fn token_only(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user: None,
        }
    }
}

/// Trait for backends holding the persisted session slot (file, memory).
///
/// Writes are last-write-wins. Implementations must report a missing or
/// unreadable slot as `Ok(None)`, never as an error, so that a corrupt slot
/// degrades to "not authenticated" instead of a crash.
pub trait TokenStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read the slot. `None` if absent or malformed.
    fn load(&self) -> AppResult<Option<StoredSession>>;

    /// Overwrite the slot.
    fn save(&self, session: &StoredSession) -> AppResult<()>;

    /// Remove the token and the user snapshot.
    fn clear(&self) -> AppResult<()>;
}
