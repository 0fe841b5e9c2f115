//! Role landing pages and navigation menus.

use serde::{Deserialize, Serialize};

use myesi_entity::user::{Role, normalize_role};

use super::routes::{RouteAccess, RouteTable};

/// Landing path when a role has no portal.
pub const FALLBACK_HOME: &str = "/";

/// Where a role lands after login. Role casing is ignored.
pub fn home_path(role: &str) -> &'static str {
    match role.parse::<Role>() {
        Ok(Role::Admin) => "/admin/dashboard",
        Ok(Role::Developer) => "/developer/dashboard",
        Ok(Role::Analyst) => "/analyst/dashboard",
        Ok(Role::Auditor) => "/auditor/dashboard",
        Err(_) => FALLBACK_HOME,
    }
}

/// The role whose portal `path` belongs to, judged by its prefix.
pub fn role_from_path(path: &str) -> Option<Role> {
    let first = path.trim_start_matches('/').split('/').next()?;
    Role::ALL.into_iter().find(|role| role.as_str() == first)
}

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Display label.
    pub name: String,
    /// Target path.
    pub path: String,
}

impl RouteTable {
    /// Menu entries for `role`: every labelled route the role may enter.
    pub fn menu_for(&self, role: &str) -> Vec<MenuItem> {
        let role = normalize_role(role);
        self.entries()
            .iter()
            .filter_map(|entry| {
                let label = entry.label.as_ref()?;
                match &entry.access {
                    RouteAccess::Protected(Some(required)) if required.is_satisfied_by(&role) => {
                        Some(MenuItem {
                            name: label.clone(),
                            path: entry.path.clone(),
                        })
                    }
                    _ => None,
                }
            })
            .collect()
    }
}
