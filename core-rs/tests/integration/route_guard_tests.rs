//! Integration tests for route guarding through the application context
//!
//! Covers the guard's view of a live session from mount to logout:
//! - Loading while restoration is pending
//! - Redirect to login for anonymous visitors
//! - Redirect to landing on a missing grant
//! - Post-login return

use pcab_core::auth::{AppContext, AuthService};
use pcab_core::config::AuthConfig;
use pcab_core::errors::AuthError;
use pcab_core::guard::{GuardDecision, RouteGuard};
use pcab_core::session::{Action, ModulePermission, User};
use pcab_core::storage::{MemoryStorage, SessionStorage, AUTH_TOKEN_KEY, USER_DATA_KEY};
use std::sync::Arc;

fn guard() -> RouteGuard {
    RouteGuard::from_config(&AuthConfig::default()).unwrap()
}

#[test]
fn test_guard_without_provider_fails_fast() {
    let err = guard().check(&AppContext::empty(), "/quotations").unwrap_err();
    assert!(matches!(err, AuthError::MissingProvider(_)));
}

#[tokio::test]
async fn test_pending_restoration_renders_only_loading() {
    // A perfectly valid persisted session is waiting in storage
    let storage = Arc::new(MemoryStorage::new());
    let service = Arc::new(AuthService::new(storage.clone()));
    service.login("admin@portacabin.com", "admin123").await.unwrap();

    let reloaded = Arc::new(AuthService::new(storage));
    let ctx = AppContext::provide(reloaded.clone());
    let g = guard();

    for location in ["/", "/quotations", "/payroll/7/edit", "/nowhere"] {
        assert_eq!(g.check(&ctx, location).unwrap(), GuardDecision::Loading, "{}", location);
    }

    reloaded.restore_session().await;
    assert!(g.check(&ctx, "/quotations").unwrap().renders_content());
}

#[tokio::test]
async fn test_anonymous_visit_then_login_returns_to_location() {
    let service = Arc::new(AuthService::new(Arc::new(MemoryStorage::new())));
    let ctx = AppContext::mount(service).await;
    let g = guard();

    let redirect = g.check(&ctx, "/sales-orders/SO-12").unwrap();
    assert_eq!(
        redirect,
        GuardDecision::RedirectToLogin {
            to: "/login".to_string(),
            from: "/sales-orders/SO-12".to_string()
        }
    );

    ctx.auth().unwrap().login("admin@portacabin.com", "admin123").await.unwrap();
    let target = g.post_login_target(Some(&redirect));
    assert_eq!(target, "/sales-orders/SO-12");
    assert!(g.check(&ctx, &target).unwrap().renders_content());
}

#[tokio::test]
async fn test_missing_grant_redirects_to_landing_not_login() {
    let storage = Arc::new(MemoryStorage::new());
    let service = Arc::new(AuthService::new(storage));
    let ctx = AppContext::mount(service).await;
    let auth = ctx.auth().unwrap();
    auth.login("admin@portacabin.com", "admin123").await.unwrap();

    let reader = auth
        .user()
        .unwrap()
        .with_permissions(vec![ModulePermission::new("invoices", [Action::Read])]);
    auth.update_user(reader);

    let g = guard();
    assert!(g.check(&ctx, "/invoices").unwrap().renders_content());
    assert_eq!(
        g.check(&ctx, "/invoices/new").unwrap(),
        GuardDecision::RedirectToLanding { to: "/".to_string() }
    );
    assert_eq!(
        g.check(&ctx, "/payroll").unwrap(),
        GuardDecision::RedirectToLanding { to: "/".to_string() }
    );
}

#[tokio::test]
async fn test_corrupt_session_lands_on_login() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(AUTH_TOKEN_KEY, "tok").unwrap();
    storage.set(USER_DATA_KEY, "not json").unwrap();

    let ctx = AppContext::mount(Arc::new(AuthService::new(storage))).await;
    assert!(matches!(
        guard().check(&ctx, "/reports").unwrap(),
        GuardDecision::RedirectToLogin { .. }
    ));
}

#[tokio::test]
async fn test_logout_sends_next_visit_to_login() {
    let ctx = AppContext::mount(Arc::new(AuthService::new(Arc::new(MemoryStorage::new())))).await;
    let auth = ctx.auth().unwrap();
    auth.login("admin@portacabin.com", "admin123").await.unwrap();
    assert!(guard().check(&ctx, "/assets").unwrap().renders_content());

    auth.logout();
    assert!(matches!(
        guard().check(&ctx, "/assets").unwrap(),
        GuardDecision::RedirectToLogin { .. }
    ));
}

#[tokio::test]
async fn test_custom_routes_from_config() {
    let mut config = AuthConfig::default();
    config.spec.login_route = "/signin".to_string();
    config.spec.landing_route = "/quotations".to_string();
    let g = RouteGuard::from_config(&config).unwrap();

    let ctx = AppContext::mount(Arc::new(AuthService::new(Arc::new(MemoryStorage::new())))).await;
    let auth = ctx.auth().unwrap();

    assert!(matches!(
        g.check(&ctx, "/projects").unwrap(),
        GuardDecision::RedirectToLogin { ref to, .. } if to == "/signin"
    ));

    auth.login("admin@portacabin.com", "admin123").await.unwrap();
    let viewer = User::new("9", "V", "W", "v@portacabin.com", pcab_core::session::Role::Viewer);
    auth.update_user(viewer);

    assert_eq!(
        g.check(&ctx, "/payroll").unwrap(),
        GuardDecision::RedirectToLanding { to: "/quotations".to_string() }
    );
}
