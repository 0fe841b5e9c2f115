//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use myesi_core::error::AppError;
use myesi_entity::user::Role;

/// A console capability granted to roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    // User management
    /// List user accounts.
    #[serde(rename = "users.view")]
    UsersView,
    /// Create user accounts.
    #[serde(rename = "users.create")]
    UsersCreate,
    /// Edit user accounts.
    #[serde(rename = "users.edit")]
    UsersEdit,
    /// Delete user accounts.
    #[serde(rename = "users.delete")]
    UsersDelete,

    // SBOM
    /// View SBOMs and their findings.
    #[serde(rename = "sbom.view")]
    SbomView,
    /// Upload new SBOMs.
    #[serde(rename = "sbom.create")]
    SbomCreate,
    /// Edit existing SBOMs.
    #[serde(rename = "sbom.edit")]
    SbomEdit,

    // Reports
    /// View risk reports.
    #[serde(rename = "reports.view")]
    ReportsView,

    // Audit
    /// View audit trails.
    #[serde(rename = "audit.view")]
    AuditView,
    /// Create audit entries.
    #[serde(rename = "audit.create")]
    AuditCreate,

    /// Grants every other permission.
    #[serde(rename = "all")]
    All,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 11] = [
        Permission::UsersView,
        Permission::UsersCreate,
        Permission::UsersEdit,
        Permission::UsersDelete,
        Permission::SbomView,
        Permission::SbomCreate,
        Permission::SbomEdit,
        Permission::ReportsView,
        Permission::AuditView,
        Permission::AuditCreate,
        Permission::All,
    ];

    /// Dotted wire name, e.g. `sbom.view`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsersView => "users.view",
            Self::UsersCreate => "users.create",
            Self::UsersEdit => "users.edit",
            Self::UsersDelete => "users.delete",
            Self::SbomView => "sbom.view",
            Self::SbomCreate => "sbom.create",
            Self::SbomEdit => "sbom.edit",
            Self::ReportsView => "reports.view",
            Self::AuditView => "audit.view",
            Self::AuditCreate => "audit.create",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("Unknown permission: {s}")))
    }
}

/// Defines the mapping from each role to its set of granted permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    /// Role → set of permissions.
    policies: HashMap<Role, HashSet<Permission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        policies.insert(
            Role::Admin,
            HashSet::from([
                Permission::UsersView,
                Permission::UsersCreate,
                Permission::UsersEdit,
                Permission::UsersDelete,
                Permission::All,
            ]),
        );
        policies.insert(
            Role::Developer,
            HashSet::from([
                Permission::SbomView,
                Permission::SbomCreate,
                Permission::SbomEdit,
            ]),
        );
        policies.insert(
            Role::Analyst,
            HashSet::from([Permission::SbomView, Permission::ReportsView]),
        );
        policies.insert(
            Role::Auditor,
            HashSet::from([
                Permission::SbomView,
                Permission::AuditView,
                Permission::AuditCreate,
            ]),
        );

        Self { policies }
    }

    /// Returns the permissions explicitly granted to the role.
    pub fn permissions_for_role(&self, role: Role) -> HashSet<Permission> {
        self.policies.get(&role).cloned().unwrap_or_default()
    }

    /// Checks whether the role holds `permission`, directly or through `all`.
    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.policies
            .get(&role)
            .map(|perms| perms.contains(&Permission::All) || perms.contains(&permission))
            .unwrap_or(false)
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_grants_everything() {
        let policies = RbacPolicies::new();
        for permission in Permission::ALL {
            assert!(policies.has_permission(Role::Admin, permission));
        }
    }

    #[test]
    fn test_analyst_grants() {
        let policies = RbacPolicies::new();
        assert!(policies.has_permission(Role::Analyst, Permission::ReportsView));
        assert!(!policies.has_permission(Role::Analyst, Permission::SbomCreate));
        assert!(!policies.has_permission(Role::Analyst, Permission::AuditView));
    }

    #[test]
    fn test_permission_names() {
        assert_eq!("audit.create".parse::<Permission>().unwrap(), Permission::AuditCreate);
        assert!("audit.delete".parse::<Permission>().is_err());
        assert_eq!(
            serde_json::to_value(Permission::SbomView).unwrap(),
            serde_json::json!("sbom.view")
        );
    }
}
