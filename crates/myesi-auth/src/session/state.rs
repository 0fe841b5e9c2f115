//! In-memory session state.

use serde::{Deserialize, Serialize};

use myesi_entity::user::Identity;

use crate::jwt::Claims;

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The persisted slot has not been examined yet.
    Checking,
    /// No valid session.
    Anonymous,
    /// A valid, unexpired token and its identity are loaded.
    Authenticated,
}

/// The authenticated identity and the token backing it.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub identity: Identity,
    pub access_token: String,
    pub claims: Claims,
}

#[derive(Debug, Clone)]
pub(crate) enum SessionState {
    Checking,
    Anonymous,
    Authenticated(ActiveSession),
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Checking => SessionStatus::Checking,
            Self::Anonymous => SessionStatus::Anonymous,
            Self::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            Self::Authenticated(active) => Some(active),
            _ => None,
        }
    }

    /// Whether the state is backed by exactly this token.
    pub fn holds_token(&self, token: &str) -> bool {
        self.active().is_some_and(|a| a.access_token == token)
    }
}
