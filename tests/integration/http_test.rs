//! Integration tests for the REST collaborators against a local stub
//! backend.

mod helpers;

use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use myesi_auth::GateDecision;
use myesi_auth::session::AuthGateway;
use myesi_client::{HttpAuthGateway, HttpNotificationSource, rejection_status};
use myesi_core::ErrorKind;
use myesi_core::config::ApiConfig;
use myesi_entity::notification::{NotificationId, Severity};
use myesi_entity::user::Credentials;
use myesi_notify::{NotificationQuery, NotificationSource};

use helpers::TestApp;

/// Stub of the REST backend.
struct Backend {
    /// Token handed out on a successful login.
    token: String,
    /// Query string of the last notification fetch.
    last_query: Mutex<Option<String>>,
}

impl Backend {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {}", self.token))
    }
}

async fn login(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    match body["email"].as_str().unwrap_or_default() {
        "admin@myesi.com" => Json(json!({
            "success": true,
            "data": {
                "accessToken": backend.token,
                "refreshToken": "refresh-1",
                "user": {
                    "id": "admin_001",
                    "email": "admin@myesi.com",
                    "name": "Admin User",
                    "role": "admin"
                }
            }
        }))
        .into_response(),
        "suspended@myesi.com" => (
            StatusCode::FORBIDDEN,
            Json(json!({ "success": false, "message": "Account suspended by administrator" })),
        )
            .into_response(),
        "locked@myesi.com" => StatusCode::FORBIDDEN.into_response(),
        "quiet@myesi.com" => StatusCode::UNAUTHORIZED.into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Wrong email or password" })),
        )
            .into_response(),
    }
}

async fn notifications(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if !backend.authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token expired" })))
            .into_response();
    }
    *backend.last_query.lock().unwrap() = query;

    Json(json!({
        "success": true,
        "data": {
            "notifications": [
                {
                    "id": 1,
                    "type": "cve_critical",
                    "severity": "critical",
                    "title": "Critical CVE",
                    "message": "CVE-2024-1234 affects openssl",
                    "timestamp": "2024-05-01T10:00:00Z",
                    "read": false,
                    "cvssScore": 9.8,
                    "cveId": "CVE-2024-1234"
                },
                {
                    "id": "inv-7",
                    "type": "invoice_available",
                    "severity": "info",
                    "title": "Invoice ready",
                    "message": "Your May invoice is available",
                    "timestamp": "2024-05-01T09:00:00Z",
                    "read": true
                }
            ],
            "total": 2,
            "unreadCount": 1
        }
    }))
    .into_response()
}

async fn mark_read(Path(id): Path<String>) -> Response {
    if id == "1" {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "Notification not found" })))
            .into_response()
    }
}

async fn remove() -> Response {
    (StatusCode::FORBIDDEN, Json(json!({ "message": "Admins only" }))).into_response()
}

async fn preferences() -> Response {
    Json(json!({ "success": false, "message": "Preferences unavailable" })).into_response()
}

/// Serves the stub on an ephemeral port and returns its base URL.
async fn spawn_backend(token: String) -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend {
        token,
        last_query: Mutex::new(None),
    });
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(|| async { StatusCode::NO_CONTENT }))
        .route("/notifications", get(notifications))
        .route("/notifications/preferences", get(preferences))
        .route("/notifications/{id}/read", patch(mark_read))
        .route("/notifications/{id}", delete(remove))
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub backend");
    let addr = listener.local_addr().expect("Failed to read stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub backend failed");
    });

    (format!("http://{addr}"), backend)
}

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_ms: 5_000,
        use_mock: false,
    }
}

fn admin_token() -> String {
    TestApp::new().token_until(
        &helpers::identity("admin_001", "Admin"),
        chrono::Utc::now() + chrono::Duration::hours(1),
    )
}

#[tokio::test]
async fn test_login_rejections_map_to_credential_errors() {
    let (base, _backend) = spawn_backend(admin_token()).await;
    let gateway = HttpAuthGateway::new(&api_config(&base)).unwrap();

    let err = gateway
        .login(&Credentials::new("intruder@myesi.com", "demo123"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert_eq!(err.message, "Wrong email or password");

    let err = gateway
        .login(&Credentials::new("quiet@myesi.com", "demo123"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert_eq!(err.message, "Invalid email or password");

    let err = gateway
        .login(&Credentials::new("suspended@myesi.com", "demo123"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountDisabled);
    assert_eq!(err.user_message(), "Account suspended by administrator");

    let err = gateway
        .login(&Credentials::new("locked@myesi.com", "demo123"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccountDisabled);
    assert_eq!(err.message, "Your account has been deactivated");

    // login rejections are not session rejections
    assert_eq!(rejection_status(&err), None);
}

#[tokio::test]
async fn test_enveloped_login_through_session() {
    let token = admin_token();
    let (base, _backend) = spawn_backend(token.clone()).await;
    let gateway = Arc::new(HttpAuthGateway::new(&api_config(&base)).unwrap());
    let app = TestApp::with_gateway(helpers::test_config(), gateway);
    app.session.initialize();

    let identity = app
        .session
        .login(&Credentials::new("admin@myesi.com", "demo123"))
        .await
        .unwrap();
    assert_eq!(identity.id, "admin_001");
    assert_eq!(identity.name, "Admin User");
    assert!(app.session.has_role("Admin"));
    assert_eq!(app.slot().unwrap().access_token, token);
    assert_eq!(
        app.session.bearer_header(),
        Some(format!("Bearer {token}"))
    );

    app.session.logout().await;
    assert!(app.slot().is_none());
}

#[tokio::test]
async fn test_feed_uses_session_token() {
    let token = admin_token();
    let (base, backend) = spawn_backend(token.clone()).await;
    let app = TestApp::new();
    app.persist_token(&token);

    let feed = HttpNotificationSource::new(&api_config(&base), app.store.clone()).unwrap();
    let page = feed
        .fetch(&NotificationQuery {
            unread_only: true,
            severity: Some(Severity::Critical),
            ..NotificationQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.unread_count, 1);
    assert_eq!(page.notifications[0].id, NotificationId::from(1));
    assert_eq!(page.notifications[0].detail_str("cveId"), Some("CVE-2024-1234"));
    assert_eq!(page.notifications[1].id.as_str(), "inv-7");
    assert_eq!(
        backend.last_query.lock().unwrap().as_deref(),
        Some("unreadOnly=true&severity=critical")
    );

    feed.mark_read(&NotificationId::from(1)).await.unwrap();
    let err = feed.mark_read(&NotificationId::from(99)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "Notification not found");
}

#[tokio::test]
async fn test_feed_rejections_drive_navigation() {
    let (base, _backend) = spawn_backend(admin_token()).await;
    let app = TestApp::new();
    app.session.initialize();
    app.login_as("admin@myesi.com").await;

    // the stub does not accept tokens issued by the demo accounts
    let feed = HttpNotificationSource::new(&api_config(&base), app.store.clone()).unwrap();
    let err = feed.fetch(&NotificationQuery::default()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
    assert_eq!(rejection_status(&err), Some(401));

    let err = feed.delete(&NotificationId::from(1)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(rejection_status(&err), Some(403));
    assert_eq!(
        app.session.handle_remote_rejection(403, "/admin/notifications"),
        Some(GateDecision::RedirectForbidden {
            to: "/unauthorized".to_string()
        })
    );
    assert!(app.session.is_authenticated());

    assert_eq!(
        app.session.handle_remote_rejection(401, "/admin/notifications"),
        Some(GateDecision::RedirectLogin {
            to: "/login".to_string(),
            from: "/admin/notifications".to_string()
        })
    );
    assert!(!app.session.is_authenticated());
    assert!(app.slot().is_none());
}

#[tokio::test]
async fn test_unsuccessful_body_surfaces_backend_message() {
    let (base, _backend) = spawn_backend(admin_token()).await;
    let app = TestApp::new();
    let feed = HttpNotificationSource::new(&api_config(&base), app.store.clone()).unwrap();

    let err = feed.preferences().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.message, "Preferences unavailable");
}
