//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;

use myesi_auth::jwt::TokenEncoder;
use myesi_auth::session::AuthGateway;
use myesi_auth::{FileTokenStore, RouteGate, RouteTable, SessionManager};
use myesi_client::{MockAuthGateway, MockNotificationSource};
use myesi_core::config::{AppConfig, MockConfig};
use myesi_core::traits::token_store::{StoredSession, TokenStore};
use myesi_entity::notification::{Notification, NotificationId, Severity};
use myesi_entity::user::{Credentials, Identity};
use myesi_notify::NotificationCenter;

/// Password of every demo account.
pub const DEMO_PASSWORD: &str = "demo123";

/// Test application context: a session manager over a file slot in a
/// scratch directory, talking to the simulated backend.
pub struct TestApp {
    /// Application config
    pub config: AppConfig,
    /// The persisted slot
    pub store: Arc<FileTokenStore>,
    /// Authentication endpoint
    pub gateway: Arc<dyn AuthGateway>,
    /// Session under test
    pub session: Arc<SessionManager>,
    /// Route gate
    pub gate: RouteGate,
    /// Dashboard routes
    pub routes: RouteTable,
    _dir: TempDir,
}

impl TestApp {
    /// A context backed by the demo accounts. The session is not yet
    /// initialized.
    pub fn new() -> Self {
        let config = test_config();
        let gateway = Arc::new(MockAuthGateway::new(&config).expect("Failed to build mock gateway"));
        Self::with_gateway(config, gateway)
    }

    /// A context using `gateway` as the authentication endpoint.
    pub fn with_gateway(mut config: AppConfig, gateway: Arc<dyn AuthGateway>) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        config.session.token_file = dir
            .path()
            .join("session.json")
            .to_string_lossy()
            .into_owned();

        let store = Arc::new(FileTokenStore::from_config(&config.session));
        let session = Arc::new(SessionManager::from_config(
            &config,
            store.clone(),
            gateway.clone(),
        ));

        Self {
            gate: RouteGate::new(&config.auth),
            routes: RouteTable::myesi(&config.auth.login_path, &config.auth.forbidden_path),
            config,
            store,
            gateway,
            session,
            _dir: dir,
        }
    }

    /// A second manager over the same slot, as a new process would build.
    pub fn restart(&self) -> Arc<SessionManager> {
        let session = Arc::new(SessionManager::from_config(
            &self.config,
            self.store.clone(),
            self.gateway.clone(),
        ));
        session.initialize();
        session
    }

    /// Log in as a demo account.
    pub async fn login_as(&self, email: &str) -> Identity {
        self.session
            .login(&Credentials::new(email, DEMO_PASSWORD))
            .await
            .expect("Demo login failed")
    }

    /// Write a token directly into the persisted slot.
    pub fn persist_token(&self, token: &str) {
        self.store
            .save(&StoredSession::token_only(token))
            .expect("Failed to write session slot");
    }

    /// A signed token for `identity` expiring at `expires_at`.
    pub fn token_until(&self, identity: &Identity, expires_at: DateTime<Utc>) -> String {
        TokenEncoder::new(&self.config.auth)
            .issue_until(identity, expires_at)
            .expect("Failed to issue token")
            .token
    }

    /// The raw slot contents.
    pub fn slot(&self) -> Option<StoredSession> {
        self.store.load().expect("Failed to read session slot")
    }
}

/// Configuration without latency or random arrivals.
pub fn test_config() -> AppConfig {
    AppConfig {
        mock: MockConfig::instant(),
        ..AppConfig::default()
    }
}

/// An identity with the given role.
pub fn identity(id: &str, role: &str) -> Identity {
    Identity {
        id: id.to_string(),
        email: format!("{id}@myesi.com"),
        name: format!("{role} Tester"),
        role: role.to_string(),
    }
}

/// A notification record `minutes_ago` old.
pub fn notification(id: u64, kind: &str, read: bool, minutes_ago: i64) -> Notification {
    Notification {
        id: NotificationId::from(id),
        notification_type: kind.to_string(),
        severity: if kind.ends_with("critical") || kind == "payment_failed" {
            Severity::Critical
        } else {
            Severity::Info
        },
        title: format!("{kind} #{id}"),
        message: String::new(),
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        read,
        action_url: None,
        cvss_score: None,
        details: serde_json::Map::new(),
    }
}

/// Three unread records (`cve_critical`, `cve_high`, `payment_failed`) and
/// two read billing records.
pub fn mixed_records() -> Vec<Notification> {
    vec![
        notification(1, "cve_critical", false, 5),
        notification(2, "cve_high", false, 10),
        notification(3, "payment_failed", false, 15),
        notification(4, "payment_success", true, 20),
        notification(5, "invoice_available", true, 25),
    ]
}

/// A center over a simulated feed seeded with `records`.
pub fn center_with(records: Vec<Notification>) -> (Arc<MockNotificationSource>, Arc<NotificationCenter>) {
    let config = test_config();
    let source = Arc::new(MockNotificationSource::with_records(&config.mock, records));
    let center = Arc::new(NotificationCenter::new(source.clone(), &config.notifications));
    (source, center)
}
