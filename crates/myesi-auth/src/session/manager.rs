//! Session lifecycle manager: restore, login, logout and role queries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::{debug, info, warn};
use validator::Validate;

use myesi_core::config::{AppConfig, AuthConfig};
use myesi_core::error::{AppError, ErrorKind};
use myesi_core::result::AppResult;
use myesi_core::traits::{StoredSession, TokenStore};
use myesi_entity::user::{Credentials, Identity, RequiredRole};

use crate::gate::GateDecision;
use crate::jwt::{Claims, TokenDecoder};

use super::gateway::{AuthGateway, UserPayload};
use super::state::{ActiveSession, SessionState, SessionStatus};

/// Owns the single authenticated identity of a running console.
///
/// Constructed explicitly and handed to whatever needs it. Every login
/// attempt draws a ticket; only the attempt holding the newest ticket may
/// commit, so when logins overlap the last caller wins and logout cancels
/// any exchange still in flight.
pub struct SessionManager {
    /// Token decoding and expiry checks.
    decoder: TokenDecoder,
    /// Persisted token slot.
    store: Arc<dyn TokenStore>,
    /// Remote authentication endpoint.
    gateway: Arc<dyn AuthGateway>,
    /// Current state.
    state: RwLock<SessionState>,
    /// Ticket counter for login attempts.
    attempts: AtomicU64,
    /// Upper bound on every remote call.
    request_timeout: Duration,
    /// Redirect targets.
    auth_config: AuthConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("status", &self.status())
            .field("store", &self.store)
            .field("gateway", &self.gateway)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl SessionManager {
    /// Creates a manager in the `Checking` state. Call [`initialize`] before
    /// answering any query.
    ///
    /// [`initialize`]: Self::initialize
    pub fn new(
        auth_config: &AuthConfig,
        request_timeout: Duration,
        store: Arc<dyn TokenStore>,
        gateway: Arc<dyn AuthGateway>,
    ) -> Self {
        Self {
            decoder: TokenDecoder::new(auth_config),
            store,
            gateway,
            state: RwLock::new(SessionState::Checking),
            attempts: AtomicU64::new(0),
            request_timeout,
            auth_config: auth_config.clone(),
        }
    }

    /// Creates a manager from the application configuration.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn TokenStore>,
        gateway: Arc<dyn AuthGateway>,
    ) -> Self {
        Self::new(&config.auth, config.api.timeout(), store, gateway)
    }

    /// Restores the session from the persisted slot.
    ///
    /// Never fails and never touches the network: an expired or undecodable
    /// token is purged and the session ends up anonymous.
    pub fn initialize(&self) -> SessionStatus {
        let restored = self.restore();
        let mut state = self.write_state();
        *state = restored;
        state.status()
    }

    fn restore(&self) -> SessionState {
        let slot = match self.store.load() {
            Ok(Some(slot)) => slot,
            Ok(None) => {
                debug!("No persisted session");
                return SessionState::Anonymous;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                return SessionState::Anonymous;
            }
        };

        let snapshot: Option<UserPayload> = slot
            .user
            .as_ref()
            .and_then(|user| serde_json::from_value(user.clone()).ok());

        let restored = self
            .decoder
            .decode_valid(&slot.access_token)
            .and_then(|claims| {
                let identity = resolve_identity(&claims, snapshot.as_ref())?;
                Ok((claims, identity))
            });

        match restored {
            Ok((claims, identity)) => {
                info!(user_id = %identity.id, role = %identity.role, "Session restored");
                SessionState::Authenticated(ActiveSession {
                    identity,
                    access_token: slot.access_token,
                    claims,
                })
            }
            Err(e) => {
                if e.kind == ErrorKind::TokenExpired {
                    info!("Persisted token expired; purging");
                } else {
                    warn!(error = %e, "Persisted token unreadable; purging");
                }
                self.clear_slot();
                SessionState::Anonymous
            }
        }
    }

    /// Exchanges credentials for a session.
    ///
    /// On success the token and identity snapshot are persisted and the
    /// session becomes authenticated. On any failure nothing is persisted and
    /// the previous session, if any, is left as it was; the error's
    /// [`user_message`](AppError::user_message) is fit for display.
    pub async fn login(&self, credentials: &Credentials) -> AppResult<Identity> {
        match self.try_login(credentials).await {
            Ok(identity) => {
                info!(user_id = %identity.id, role = %identity.role, "Login successful");
                Ok(identity)
            }
            Err(e) => {
                warn!(email = %credentials.email, kind = %e.kind, error = %e.message, "Login failed");
                Err(e)
            }
        }
    }

    async fn try_login(&self, credentials: &Credentials) -> AppResult<Identity> {
        credentials.validate()?;
        let ticket = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        let response = tokio::time::timeout(self.request_timeout, self.gateway.login(credentials))
            .await
            .map_err(|_| AppError::timeout("Login request timed out"))??;

        let claims = self.decoder.decode_valid(&response.access_token)?;
        let identity = resolve_identity(&claims, response.user.as_ref())?;

        let mut state = self.write_state();
        if self.attempts.load(Ordering::SeqCst) != ticket {
            return Err(AppError::conflict("Login superseded by a newer request"));
        }

        self.store.save(&StoredSession {
            access_token: response.access_token.clone(),
            user: Some(serde_json::to_value(UserPayload::from(&identity))?),
        })?;

        *state = SessionState::Authenticated(ActiveSession {
            identity: identity.clone(),
            access_token: response.access_token,
            claims,
        });
        Ok(identity)
    }

    /// Ends the session.
    ///
    /// The endpoint is notified on a best-effort basis; local state and the
    /// persisted slot are cleared whatever the outcome.
    pub async fn logout(&self) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let token = self.access_token();
        let user_id = self.identity().map(|i| i.id);

        match tokio::time::timeout(self.request_timeout, self.gateway.logout(token.as_deref())).await
        {
            Ok(Ok(())) => debug!("Remote logout acknowledged"),
            Ok(Err(e)) => warn!(error = %e, "Remote logout failed; clearing local session anyway"),
            Err(_) => warn!("Remote logout timed out; clearing local session anyway"),
        }

        let mut state = self.write_state();
        self.clear_slot();
        *state = SessionState::Anonymous;
        info!(user_id = ?user_id, "Logged out");
    }

    /// Refreshes the identity from the endpoint's profile of the current
    /// token.
    ///
    /// A rejection that invalidates the token ends the session.
    pub async fn fetch_profile(&self) -> AppResult<Identity> {
        let token = self
            .access_token()
            .ok_or_else(|| AppError::unauthenticated("No active session"))?;

        let profile = tokio::time::timeout(self.request_timeout, self.gateway.profile(&token))
            .await
            .map_err(|_| AppError::timeout("Profile request timed out"))?;

        let identity = match profile {
            Ok(identity) => identity,
            Err(e) => {
                if e.invalidates_session() {
                    self.expire_token(&token, "profile rejected");
                }
                return Err(e);
            }
        };

        let mut state = self.write_state();
        match &mut *state {
            SessionState::Authenticated(active) if active.access_token == token => {
                active.identity = identity.clone();
                let slot = StoredSession {
                    access_token: token,
                    user: Some(serde_json::to_value(UserPayload::from(&identity))?),
                };
                if let Err(e) = self.store.save(&slot) {
                    warn!(error = %e, "Failed to persist refreshed profile");
                }
                Ok(identity)
            }
            _ => Err(AppError::conflict("Session changed while fetching profile")),
        }
    }

    /// Reacts to a remote call rejected with `status`.
    ///
    /// 401 ends the session and sends the caller to login, remembering
    /// `location`; 403 sends the caller to the forbidden page. Other statuses
    /// need no navigation.
    pub fn handle_remote_rejection(&self, status: u16, location: &str) -> Option<GateDecision> {
        match status {
            401 => {
                if let Some(token) = self.access_token() {
                    self.expire_token(&token, "remote rejected token");
                }
                Some(GateDecision::RedirectLogin {
                    to: self.auth_config.login_path.clone(),
                    from: location.to_string(),
                })
            }
            403 => Some(GateDecision::RedirectForbidden {
                to: self.auth_config.forbidden_path.clone(),
            }),
            _ => None,
        }
    }

    /// Whether the current identity satisfies `required`, ignoring case.
    /// `false` without an identity.
    pub fn has_role(&self, required: impl Into<RequiredRole>) -> bool {
        let required = required.into();
        self.read_state()
            .active()
            .is_some_and(|active| active.identity.has_role(&required))
    }

    /// Whether an unexpired session is loaded.
    ///
    /// The token's expiry is re-checked on every call; a session found
    /// expired is purged.
    pub fn is_authenticated(&self) -> bool {
        let expired_token = {
            let state = self.read_state();
            match state.active() {
                None => return false,
                Some(active) if self.decoder.is_expired(&active.claims) => {
                    active.access_token.clone()
                }
                Some(_) => return true,
            }
        };

        self.expire_token(&expired_token, "token expired");
        false
    }

    /// Current status, without re-checking expiry.
    pub fn status(&self) -> SessionStatus {
        self.read_state().status()
    }

    /// The current identity.
    pub fn identity(&self) -> Option<Identity> {
        self.read_state().active().map(|a| a.identity.clone())
    }

    /// The current access token.
    pub fn access_token(&self) -> Option<String> {
        self.read_state().active().map(|a| a.access_token.clone())
    }

    /// Claims of the current token.
    pub fn claims(&self) -> Option<Claims> {
        self.read_state().active().map(|a| a.claims.clone())
    }

    /// `Authorization` header value for the current token.
    pub fn bearer_header(&self) -> Option<String> {
        self.access_token().map(|token| format!("Bearer {token}"))
    }

    /// Drops in-memory state and returns to `Checking`. The persisted slot
    /// is kept so a later [`initialize`](Self::initialize) can restore it.
    pub fn dispose(&self) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        *self.write_state() = SessionState::Checking;
        debug!("Session manager disposed");
    }

    /// Purges the session if it is still backed by `token`.
    fn expire_token(&self, token: &str, reason: &str) {
        let mut state = self.write_state();
        if state.holds_token(token) {
            self.clear_slot();
            *state = SessionState::Anonymous;
            info!(reason = %reason, "Session ended");
        }
    }

    fn clear_slot(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Combines the backend's user payload with the token claims. Payload fields
/// win; blank or missing ones fall back to the claims.
fn resolve_identity(claims: &Claims, user: Option<&UserPayload>) -> AppResult<Identity> {
    fn pick(preferred: Option<&String>, fallback: Option<&str>) -> Option<String> {
        preferred
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .or(fallback.filter(|s| !s.trim().is_empty()))
            .map(str::to_string)
    }

    let id = pick(user.and_then(|u| u.id.as_ref()), claims.account_id())
        .ok_or_else(|| AppError::token_malformed("missing claim: userId"))?;
    let email = pick(user.and_then(|u| u.email.as_ref()), Some(&claims.email))
        .ok_or_else(|| AppError::token_malformed("missing claim: email"))?;
    let role = pick(user.and_then(|u| u.role.as_ref()), Some(&claims.role))
        .ok_or_else(|| AppError::token_malformed("missing claim: role"))?;
    let name = pick(user.and_then(|u| u.name.as_ref()), Some(&claims.name)).unwrap_or_default();

    Ok(Identity {
        id,
        email,
        name,
        role,
    })
}
