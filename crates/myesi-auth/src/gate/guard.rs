//! One-shot gate evaluation for a navigation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use myesi_core::config::AuthConfig;
use myesi_entity::user::RequiredRole;

use crate::session::{SessionManager, SessionStatus};

use super::routes::{RouteAccess, RouteTable};

/// Outcome of entering a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// The session is not resolved yet; show a neutral placeholder and
    /// neither render nor redirect.
    Checking,
    /// Render the protected content.
    Allow,
    /// Not authenticated: go to `to`, then return to `from` after login.
    RedirectLogin {
        /// Login location.
        to: String,
        /// Originally requested location.
        from: String,
    },
    /// Authenticated without the required role.
    RedirectForbidden {
        /// Forbidden-page location.
        to: String,
    },
    /// The route itself forwards elsewhere.
    Redirect {
        /// Target location.
        to: String,
    },
}

impl GateDecision {
    /// Whether content may be rendered.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The location to navigate to, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::RedirectLogin { to, .. } | Self::RedirectForbidden { to } | Self::Redirect { to } => {
                Some(to)
            }
            Self::Checking | Self::Allow => None,
        }
    }
}

/// Decides whether a session may enter a location.
///
/// Holds no per-route state: every navigation is evaluated afresh against
/// the live session.
#[derive(Debug, Clone)]
pub struct RouteGate {
    login_path: String,
    forbidden_path: String,
}

impl RouteGate {
    /// Creates a gate redirecting to the configured login/forbidden paths.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            forbidden_path: config.forbidden_path.clone(),
        }
    }

    /// Evaluates entry to `location` guarded by `required`.
    pub fn evaluate(
        &self,
        session: &SessionManager,
        location: &str,
        required: Option<&RequiredRole>,
    ) -> GateDecision {
        if session.status() == SessionStatus::Checking {
            return GateDecision::Checking;
        }

        if !session.is_authenticated() {
            debug!(location = %location, "Gate: not authenticated");
            return GateDecision::RedirectLogin {
                to: self.login_path.clone(),
                from: location.to_string(),
            };
        }

        if let Some(required) = required {
            if !session.has_role(required.clone()) {
                debug!(location = %location, required = %required, "Gate: role not permitted");
                return GateDecision::RedirectForbidden {
                    to: self.forbidden_path.clone(),
                };
            }
        }

        GateDecision::Allow
    }

    /// Evaluates entry to `path` as declared in `table`.
    pub fn evaluate_route(
        &self,
        session: &SessionManager,
        table: &RouteTable,
        path: &str,
    ) -> GateDecision {
        match table.resolve(path) {
            RouteAccess::Public => GateDecision::Allow,
            RouteAccess::Redirect(to) => GateDecision::Redirect { to },
            RouteAccess::Protected(required) => self.evaluate(session, path, required.as_ref()),
        }
    }
}
