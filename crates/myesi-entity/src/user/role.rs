//! User role enumeration and role string normalization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical form of a role string for comparison.
///
/// Role strings arrive with inconsistent casing (`"Admin"` from the backend,
/// `"admin"` in route declarations). Every comparison in the workspace goes
/// through this function.
///
/// Surrounding whitespace is also dropped, so `" Admin "` matches `admin`.
/// For role strings without surrounding whitespace this is plain
/// case-insensitive equality.
pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}

/// Roles recognised by the MyESI portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Platform administrator: users, audit logs, billing.
    Admin,
    /// Uploads and manages SBOMs for their projects.
    Developer,
    /// Reviews vulnerability analytics and reports.
    Analyst,
    /// Reviews compliance and audit trails.
    Auditor,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Developer, Role::Analyst, Role::Auditor];

    /// Return the role as its canonical (lowercase) string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Developer => "developer",
            Self::Analyst => "analyst",
            Self::Auditor => "auditor",
        }
    }

    /// Return the capitalised label the backend uses.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Developer => "Developer",
            Self::Analyst => "Analyst",
            Self::Auditor => "Auditor",
        }
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Role {
    type Err = myesi_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_role(s).as_str() {
            "admin" => Ok(Self::Admin),
            "developer" => Ok(Self::Developer),
            "analyst" => Ok(Self::Analyst),
            "auditor" => Ok(Self::Auditor),
            _ => Err(myesi_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: Admin, Developer, Analyst, Auditor"
            ))),
        }
    }
}
