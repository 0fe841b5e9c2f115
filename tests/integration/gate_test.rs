//! Integration tests for route gating and role navigation.

mod helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};

use myesi_auth::{GateDecision, RbacEnforcer, home_path};
use myesi_auth::rbac::Permission;
use myesi_client::MockAuthGateway;
use myesi_entity::user::{Credentials, RequiredRole};

use helpers::TestApp;

fn login_redirect(from: &str) -> GateDecision {
    GateDecision::RedirectLogin {
        to: "/login".to_string(),
        from: from.to_string(),
    }
}

fn forbidden() -> GateDecision {
    GateDecision::RedirectForbidden {
        to: "/unauthorized".to_string(),
    }
}

#[tokio::test]
async fn test_lowercase_role_allowed_by_any_of() {
    let config = helpers::test_config();
    let gateway = MockAuthGateway::new(&config)
        .unwrap()
        .with_account(helpers::identity("ops_001", "admin"), "secret123", true)
        .unwrap();
    let app = TestApp::with_gateway(config, Arc::new(gateway));
    app.session.initialize();
    app.session
        .login(&Credentials::new("ops_001@myesi.com", "secret123"))
        .await
        .unwrap();

    let required = RequiredRole::from(&["Admin", "Auditor"][..]);
    let decision = app
        .gate
        .evaluate(&app.session, "/admin/audit-logs", Some(&required));
    assert_eq!(decision, GateDecision::Allow);
}

#[tokio::test]
async fn test_wrong_role_is_forbidden_not_login() {
    let app = TestApp::new();
    app.session.initialize();
    app.login_as("developer@myesi.com").await;

    let required = RequiredRole::from("Admin");
    assert_eq!(
        app.gate.evaluate(&app.session, "/admin/users", Some(&required)),
        forbidden()
    );
    assert_eq!(
        app.gate.evaluate_route(&app.session, &app.routes, "/admin/users"),
        forbidden()
    );
    assert_eq!(
        app.gate
            .evaluate_route(&app.session, &app.routes, "/developer/reports/"),
        GateDecision::Allow
    );
}

#[tokio::test]
async fn test_anonymous_is_sent_to_login() {
    let app = TestApp::new();
    app.session.initialize();

    assert_eq!(
        app.gate
            .evaluate_route(&app.session, &app.routes, "/auditor/compliance?tab=soc2"),
        login_redirect("/auditor/compliance?tab=soc2")
    );
    assert_eq!(
        app.gate.evaluate(&app.session, "/anything", None),
        login_redirect("/anything")
    );
}

#[tokio::test]
async fn test_checking_before_initialize() {
    let app = TestApp::new();
    let required = RequiredRole::from("Admin");
    assert_eq!(
        app.gate.evaluate(&app.session, "/admin/dashboard", Some(&required)),
        GateDecision::Checking
    );

    app.session.initialize();
    app.login_as("admin@myesi.com").await;
    app.session.dispose();
    assert_eq!(
        app.gate.evaluate(&app.session, "/admin/dashboard", Some(&required)),
        GateDecision::Checking
    );
}

#[tokio::test]
async fn test_public_and_redirect_routes() {
    let app = TestApp::new();
    app.session.initialize();

    for path in ["/login", "/unauthorized"] {
        assert_eq!(
            app.gate.evaluate_route(&app.session, &app.routes, path),
            GateDecision::Allow,
            "{path}"
        );
    }
    for path in ["/", "/no/such/page"] {
        assert_eq!(
            app.gate.evaluate_route(&app.session, &app.routes, path),
            GateDecision::Redirect {
                to: "/login".to_string()
            },
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_session_expiring_mid_navigation() {
    let app = TestApp::new();
    let identity = helpers::identity("admin_001", "Admin");
    app.persist_token(&app.token_until(&identity, Utc::now() + Duration::seconds(2)));
    app.session.initialize();

    let required = RequiredRole::from("admin");
    assert_eq!(
        app.gate.evaluate(&app.session, "/admin/reports", Some(&required)),
        GateDecision::Allow
    );

    tokio::time::sleep(std::time::Duration::from_millis(3_100)).await;

    assert_eq!(
        app.gate.evaluate(&app.session, "/admin/reports", Some(&required)),
        login_redirect("/admin/reports")
    );
    assert!(app.slot().is_none());
}

#[tokio::test]
async fn test_role_home_menu_and_permissions() {
    let app = TestApp::new();
    app.session.initialize();
    let identity = app.login_as("auditor@myesi.com").await;

    assert_eq!(home_path(&identity.role), "/auditor/dashboard");

    let menu = app.routes.menu_for(&identity.role);
    assert_eq!(menu.len(), 5);
    assert!(menu.iter().all(|item| item.path.starts_with("/auditor/")));
    for item in &menu {
        assert!(
            app.gate
                .evaluate_route(&app.session, &app.routes, &item.path)
                .is_allowed(),
            "{} should be reachable",
            item.path
        );
    }

    let rbac = RbacEnforcer::new();
    assert!(rbac.has_permission(&identity.role, Permission::AuditView));
    assert!(rbac.require_permission(&identity.role, Permission::UsersDelete).is_err());
    assert!(rbac.has_permission("ADMIN", Permission::UsersDelete));
}
