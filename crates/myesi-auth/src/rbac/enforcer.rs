//! RBAC enforcement: checks whether a role string holds a permission.

use std::collections::BTreeSet;

use myesi_core::error::AppError;
use myesi_entity::user::Role;

use super::policies::{Permission, RbacPolicies};

/// Enforces role-based permissions for console actions.
///
/// Role strings are matched case-insensitively; unknown roles hold nothing.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    /// The policy configuration.
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Returns `Ok(())` when `role` holds `permission`, an authorization
    /// error otherwise.
    pub fn require_permission(&self, role: &str, permission: Permission) -> Result<(), AppError> {
        if self.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' does not have permission '{permission}'"
            )))
        }
    }

    /// Checks whether the role has the permission.
    pub fn has_permission(&self, role: &str, permission: Permission) -> bool {
        role.parse::<Role>()
            .map(|role| self.policies.has_permission(role, permission))
            .unwrap_or(false)
    }

    /// The permissions granted to a role, sorted by name.
    pub fn permissions_for(&self, role: &str) -> BTreeSet<&'static str> {
        role.parse::<Role>()
            .map(|role| {
                self.policies
                    .permissions_for_role(role)
                    .into_iter()
                    .map(|p| p.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}
