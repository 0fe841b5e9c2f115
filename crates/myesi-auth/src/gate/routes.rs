//! The console's route table.

use myesi_entity::user::{RequiredRole, Role};

/// How a path may be entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone may enter.
    Public,
    /// Requires a session, and the role when one is given.
    Protected(Option<RequiredRole>),
    /// Forwards to another path.
    Redirect(String),
}

/// One declared route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Exact path.
    pub path: String,
    /// Entry rule.
    pub access: RouteAccess,
    /// Menu label; routes without one are not listed in navigation.
    pub label: Option<String>,
}

/// Exact-match route table with a catch-all fallback.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    fallback: RouteAccess,
}

impl RouteTable {
    /// An empty table whose unknown paths resolve to `fallback`.
    pub fn new(fallback: RouteAccess) -> Self {
        Self {
            entries: Vec::new(),
            fallback,
        }
    }

    /// Declare a public path.
    pub fn public(mut self, path: &str) -> Self {
        self.push(path, RouteAccess::Public, None);
        self
    }

    /// Declare a path forwarding to `to`.
    pub fn redirect(mut self, path: &str, to: &str) -> Self {
        self.push(path, RouteAccess::Redirect(to.to_string()), None);
        self
    }

    /// Declare a path requiring `role`, listed in menus under `label`.
    pub fn protected(mut self, path: &str, role: impl Into<RequiredRole>, label: &str) -> Self {
        self.push(
            path,
            RouteAccess::Protected(Some(role.into())),
            Some(label.to_string()),
        );
        self
    }

    fn push(&mut self, path: &str, access: RouteAccess, label: Option<String>) {
        self.entries.retain(|e| e.path != path);
        self.entries.push(RouteEntry {
            path: path.to_string(),
            access,
            label,
        });
    }

    /// The MyESI console routes: one portal per role plus the public pages.
    /// `/` and unknown paths forward to the login page.
    pub fn myesi(login_path: &str, forbidden_path: &str) -> Self {
        Self::new(RouteAccess::Redirect(login_path.to_string()))
            .redirect("/", login_path)
            .public(login_path)
            .public(forbidden_path)
            .protected("/admin/dashboard", Role::Admin, "Dashboard")
            .protected("/admin/users", Role::Admin, "User Management")
            .protected("/admin/audit-logs", Role::Admin, "Audit Logs")
            .protected("/admin/subscription-status", Role::Admin, "Subscription Status")
            .protected("/admin/reports", Role::Admin, "Reports")
            .protected("/admin/notifications", Role::Admin, "Notifications")
            .protected("/admin/billing", Role::Admin, "Billing")
            .protected("/developer/dashboard", Role::Developer, "Dashboard")
            .protected("/developer/reports", Role::Developer, "Reports")
            .protected("/developer/billing", Role::Developer, "Billing")
            .protected("/analyst/dashboard", Role::Analyst, "Dashboard")
            .protected("/analyst/reports", Role::Analyst, "Reports")
            .protected("/analyst/billing", Role::Analyst, "Billing")
            .protected("/auditor/dashboard", Role::Auditor, "Dashboard")
            .protected("/auditor/reports", Role::Auditor, "Audit Reports")
            .protected("/auditor/compliance", Role::Auditor, "Compliance")
            .protected("/auditor/logs", Role::Auditor, "System Logs")
            .protected("/auditor/billing", Role::Auditor, "Billing")
    }

    /// Entry rule for `path`. A trailing slash and any query or fragment
    /// are ignored.
    pub fn resolve(&self, path: &str) -> RouteAccess {
        let path = normalize_path(path);
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.access.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// All declared routes, in declaration order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}

fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
