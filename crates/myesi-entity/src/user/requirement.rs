//! Role requirements attached to protected views.

use serde::{Deserialize, Serialize};

use super::role::{Role, normalize_role};

/// The role(s) a protected view requires.
///
/// A single role must match exactly (after normalization); a list is
/// satisfied when the identity's role matches any element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredRole {
    /// Exactly this role.
    One(String),
    /// Any of these roles.
    AnyOf(Vec<String>),
}

impl RequiredRole {
    /// Whether `role` satisfies this requirement. Case never matters.
    pub fn is_satisfied_by(&self, role: &str) -> bool {
        let role = normalize_role(role);
        match self {
            Self::One(required) => normalize_role(required) == role,
            Self::AnyOf(required) => required.iter().any(|r| normalize_role(r) == role),
        }
    }

    /// The required roles in normalized form.
    pub fn normalized(&self) -> Vec<String> {
        match self {
            Self::One(required) => vec![normalize_role(required)],
            Self::AnyOf(required) => required.iter().map(|r| normalize_role(r)).collect(),
        }
    }
}

impl From<&str> for RequiredRole {
    fn from(role: &str) -> Self {
        Self::One(role.to_string())
    }
}

impl From<String> for RequiredRole {
    fn from(role: String) -> Self {
        Self::One(role)
    }
}

impl From<Role> for RequiredRole {
    fn from(role: Role) -> Self {
        Self::One(role.as_str().to_string())
    }
}

impl From<&[&str]> for RequiredRole {
    fn from(roles: &[&str]) -> Self {
        Self::AnyOf(roles.iter().map(|r| r.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RequiredRole {
    fn from(roles: [&str; N]) -> Self {
        Self::AnyOf(roles.iter().map(|r| r.to_string()).collect())
    }
}

impl From<Vec<String>> for RequiredRole {
    fn from(roles: Vec<String>) -> Self {
        Self::AnyOf(roles)
    }
}

impl From<&[Role]> for RequiredRole {
    fn from(roles: &[Role]) -> Self {
        Self::AnyOf(roles.iter().map(|r| r.as_str().to_string()).collect())
    }
}

impl std::fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::One(role) => write!(f, "{role}"),
            Self::AnyOf(roles) => write!(f, "any of [{}]", roles.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_role_ignores_case() {
        let required = RequiredRole::from("Admin");
        assert!(required.is_satisfied_by("admin"));
        assert!(required.is_satisfied_by("ADMIN"));
        assert!(!required.is_satisfied_by("developer"));
    }

    #[test]
    fn test_any_of() {
        let required = RequiredRole::from(["Admin", "Auditor"]);
        assert!(required.is_satisfied_by("admin"));
        assert!(required.is_satisfied_by("auditor"));
        assert!(!required.is_satisfied_by("analyst"));
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let required = RequiredRole::AnyOf(Vec::new());
        assert!(!required.is_satisfied_by("admin"));
    }

    #[test]
    fn test_deserialize_string_or_list() {
        let one: RequiredRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(one, RequiredRole::One("admin".to_string()));

        let many: RequiredRole = serde_json::from_str("[\"Admin\",\"Auditor\"]").unwrap();
        assert_eq!(many.normalized(), vec!["admin", "auditor"]);
    }
}
