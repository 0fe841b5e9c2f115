//! Login credentials.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Email/password pair submitted to the authentication endpoint.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    /// Account email.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Plaintext password. Never logged.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl Credentials {
    /// Create a credentials pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
