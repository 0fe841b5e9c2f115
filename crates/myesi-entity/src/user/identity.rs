//! The authenticated identity.

use serde::{Deserialize, Serialize};

use super::requirement::RequiredRole;
use super::role::{Role, normalize_role};

/// The user a session token was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque account identifier.
    pub id: String,
    /// Account email, unique per account (compare case-insensitively).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role string as issued; casing varies by source.
    pub role: String,
}

impl Identity {
    /// The role in normalized (lowercase) form.
    pub fn normalized_role(&self) -> String {
        normalize_role(&self.role)
    }

    /// The role as a known [`Role`], if it is one.
    pub fn known_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// Whether this identity satisfies the requirement.
    pub fn has_role(&self, required: &RequiredRole) -> bool {
        required.is_satisfied_by(&self.role)
    }

    /// Whether `email` refers to this account.
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}
