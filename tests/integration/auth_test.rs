//! Integration tests for the session lifecycle against the simulated
//! backend.

mod helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};

use myesi_auth::jwt::TokenEncoder;
use myesi_auth::{GateDecision, SessionStatus};
use myesi_core::ErrorKind;
use myesi_entity::user::Credentials;

use helpers::{DEMO_PASSWORD, TestApp};

#[tokio::test]
async fn test_expired_token_purged_on_initialize() {
    let app = TestApp::new();
    let token = app.token_until(
        &helpers::identity("admin_001", "Admin"),
        Utc::now() - Duration::seconds(1),
    );
    app.persist_token(&token);

    assert_eq!(app.session.initialize(), SessionStatus::Anonymous);
    assert!(!app.session.is_authenticated());
    assert!(app.session.identity().is_none());
    assert!(app.slot().is_none());
}

#[tokio::test]
async fn test_undecodable_token_purged_on_initialize() {
    let app = TestApp::new();
    app.persist_token("not-a-token");

    assert_eq!(app.session.initialize(), SessionStatus::Anonymous);
    assert!(app.slot().is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.session.initialize();

    let err = app
        .session
        .login(&Credentials::new("admin@myesi.com", "wrong-password"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(!app.session.is_authenticated());
    assert!(app.slot().is_none());
}

#[tokio::test]
async fn test_login_rejects_invalid_input_before_network() {
    let app = TestApp::new();
    app.session.initialize();

    let err = app
        .session
        .login(&Credentials::new("admin", DEMO_PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.user_message(), "Invalid email format");
}

#[tokio::test]
async fn test_login_persists_and_restores() {
    let app = TestApp::new();
    app.session.initialize();

    let identity = app.login_as("Analyst@MyESI.com").await;
    assert_eq!(identity.id, "analyst_001");
    assert_eq!(identity.role, "Analyst");
    assert_eq!(app.session.status(), SessionStatus::Authenticated);

    let slot = app.slot().expect("slot written");
    assert_eq!(Some(slot.access_token.clone()), app.session.access_token());
    let user = slot.user.expect("user snapshot written");
    assert_eq!(user["email"], "analyst@myesi.com");

    let restored = app.restart();
    assert!(restored.is_authenticated());
    assert_eq!(restored.identity(), Some(identity));
    assert_eq!(
        restored.bearer_header(),
        Some(format!("Bearer {}", slot.access_token))
    );
}

#[tokio::test]
async fn test_failed_login_keeps_previous_session() {
    let app = TestApp::new();
    app.session.initialize();
    let admin = app.login_as("admin@myesi.com").await;

    let err = app
        .session
        .login(&Credentials::new("developer@myesi.com", "nope-nope"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert_eq!(app.session.identity(), Some(admin));
    assert!(app.slot().is_some());
}

#[tokio::test]
async fn test_logout_clears_slot() {
    let app = TestApp::new();
    app.session.initialize();
    app.login_as("auditor@myesi.com").await;

    app.session.logout().await;

    assert_eq!(app.session.status(), SessionStatus::Anonymous);
    assert!(app.slot().is_none());
    assert_eq!(app.restart().status(), SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_legacy_token_restored() {
    let app = TestApp::new();
    let token = TokenEncoder::new(&app.config.auth)
        .issue_legacy(&helpers::identity("dev_001", "developer"))
        .unwrap();
    app.persist_token(&token);

    assert_eq!(app.session.initialize(), SessionStatus::Authenticated);
    assert!(app.session.has_role("Developer"));
}

#[tokio::test]
async fn test_signed_tokens_required_when_secret_configured() {
    let mut config = helpers::test_config();
    config.auth.token_secret = Some("integration-secret".to_string());
    let gateway = Arc::new(myesi_client::MockAuthGateway::new(&config).unwrap());
    let app = TestApp::with_gateway(config, gateway);
    app.session.initialize();

    app.login_as("admin@myesi.com").await;
    assert!(app.restart().is_authenticated());

    let forged = TokenEncoder::new(&helpers::test_config().auth)
        .issue(&helpers::identity("admin_001", "Admin"))
        .unwrap()
        .token;
    app.persist_token(&forged);
    let restored = app.restart();
    assert!(!restored.is_authenticated());
    assert!(app.slot().is_none());
}

#[tokio::test]
async fn test_profile_fetch() {
    let app = TestApp::new();
    app.session.initialize();
    app.login_as("developer@myesi.com").await;

    let profile = app.session.fetch_profile().await.unwrap();
    assert_eq!(profile.id, "dev_001");
    assert_eq!(profile.name, "Developer User");
}

#[tokio::test]
async fn test_remote_unauthorized_ends_session() {
    let app = TestApp::new();
    app.session.initialize();
    app.login_as("admin@myesi.com").await;

    let decision = app
        .session
        .handle_remote_rejection(401, "/admin/users")
        .unwrap();
    assert_eq!(
        decision,
        GateDecision::RedirectLogin {
            to: "/login".to_string(),
            from: "/admin/users".to_string(),
        }
    );
    assert!(!app.session.is_authenticated());
    assert!(app.slot().is_none());
}

#[tokio::test]
async fn test_remote_forbidden_keeps_session() {
    let app = TestApp::new();
    app.session.initialize();
    app.login_as("analyst@myesi.com").await;

    let decision = app.session.handle_remote_rejection(403, "/admin/users");
    assert_eq!(
        decision,
        Some(GateDecision::RedirectForbidden {
            to: "/unauthorized".to_string(),
        })
    );
    assert!(app.session.is_authenticated());
    assert!(app.session.handle_remote_rejection(500, "/").is_none());
}
