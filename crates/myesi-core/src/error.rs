//! Unified application error types for MyESI.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Callers that need to branch on the
//! outcome (login, notification mutations) match on [`ErrorKind`].

use std::fmt;
use thiserror::Error;

/// Message shown to the user when a login attempt fails without a usable
/// message from the backend.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please try again.";

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The email/password pair was rejected (HTTP 401 on login).
    InvalidCredentials,
    /// The account exists but has been deactivated (HTTP 403 on login).
    AccountDisabled,
    /// No authenticated session exists.
    Unauthenticated,
    /// A session token is past its expiration instant.
    TokenExpired,
    /// A session token could not be decoded.
    TokenMalformed,
    /// The identity is authenticated but lacks the required role.
    Authorization,
    /// Input validation failed before any network call.
    Validation,
    /// The requested record was not found.
    NotFound,
    /// A newer operation superseded this one.
    Conflict,
    /// A remote collaborator could not be reached or answered with an error.
    Network,
    /// A remote collaborator did not answer within the configured timeout.
    Timeout,
    /// Reading or writing persisted state failed.
    Storage,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::AccountDisabled => write!(f, "ACCOUNT_DISABLED"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::TokenMalformed => write!(f, "TOKEN_MALFORMED"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Network => write!(f, "NETWORK"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout MyESI.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credentials error.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create an account-disabled error.
    pub fn account_disabled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountDisabled, message)
    }

    /// Create an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a token-malformed error.
    pub fn token_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenMalformed, message)
    }

    /// Create an authorization (forbidden) error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the caller may retry the operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::Timeout)
    }

    /// Whether this error means the session token can no longer be trusted.
    pub fn invalidates_session(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Unauthenticated | ErrorKind::TokenExpired | ErrorKind::TokenMalformed
        )
    }

    /// The message to show the user for a failed login attempt.
    ///
    /// Credential and validation errors carry the backend's message; every
    /// other failure collapses to a generic retry hint.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::InvalidCredentials
            | ErrorKind::AccountDisabled
            | ErrorKind::Validation
            | ErrorKind::Conflict => self.message.clone(),
            _ => LOGIN_FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");
        Self::with_source(ErrorKind::Validation, message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(AppError::network("down").is_retryable());
        assert!(AppError::timeout("slow").is_retryable());
        assert!(!AppError::invalid_credentials("nope").is_retryable());
        assert!(!AppError::token_expired("old").is_retryable());
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = AppError::network("connection refused (os error 111)");
        assert_eq!(err.user_message(), LOGIN_FALLBACK_MESSAGE);

        let err = AppError::invalid_credentials("Invalid email or password");
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::authorization("role 'developer' lacks access");
        assert_eq!(
            err.to_string(),
            "AUTHORIZATION: role 'developer' lacks access"
        );
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err = AppError::from(io);
        assert!(std::error::Error::source(&err).is_some());
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Storage);
        assert!(cloned.source.is_none());
    }
}
