//! Integration tests for the full session lifecycle
//!
//! Covers:
//! - Demo login and rejected login
//! - Profile update surviving a reload
//! - Logout surviving a reload
//! - Racing logins

use pcab_core::auth::{AppContext, AuthService, CredentialVerifier, VerifiedIdentity};
use pcab_core::errors::{AuthError, Result};
use pcab_core::session::{Action, ModulePermission, Role, Session, User};
use pcab_core::storage::{FileStorage, MemoryStorage, SessionStorage, AUTH_TOKEN_KEY, USER_DATA_KEY};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_demo_login_authenticates_with_token() {
    let service = Arc::new(AuthService::new(Arc::new(MemoryStorage::new())));
    let ctx = AppContext::mount(service).await;
    let auth = ctx.auth().unwrap();

    auth.login("admin@portacabin.com", "admin123").await.unwrap();

    let session = auth.session();
    assert!(session.is_authenticated());
    assert!(!session.is_loading());
    assert!(!session.token().unwrap().is_empty());
    assert_eq!(session.user().unwrap().role, Role::Admin);
}

#[tokio::test]
async fn test_wrong_credentials_rejected() {
    let service = Arc::new(AuthService::new(Arc::new(MemoryStorage::new())));
    let ctx = AppContext::mount(service).await;
    let auth = ctx.auth().unwrap();

    let err = auth.login("x@x.com", "wrong").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading());
}

#[tokio::test]
async fn test_update_user_survives_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");

    // 1. First "page load": sign in and edit the profile
    let first = Arc::new(AuthService::new(Arc::new(FileStorage::new(&path))));
    first.restore_session().await;
    first.login("admin@portacabin.com", "admin123").await.unwrap();

    let edited = User {
        phone: Some("+44 20 7946 0000".to_string()),
        department: Some("Operations".to_string()),
        ..first.user().unwrap()
    }
    .with_permissions(vec![
        ModulePermission::new("quotations", [Action::Create, Action::Read]),
        ModulePermission::new("reports", [Action::Read]),
    ]);
    first.update_user(edited.clone());
    let token = first.session().token().unwrap().to_string();

    // 2. Reload: a fresh service over the same storage file
    let second = Arc::new(AuthService::new(Arc::new(FileStorage::new(&path))));
    let restored = second.restore_session().await;

    assert!(restored.is_authenticated());
    assert_eq!(restored.user(), Some(&edited));
    assert_eq!(restored.token(), Some(token.as_str()));
    assert!(second.has_permission("quotations", Action::Create));
    assert!(!second.has_permission("quotations", Action::Delete));
}

#[tokio::test]
async fn test_logout_survives_reload() {
    let storage = Arc::new(MemoryStorage::new());

    let first = AuthService::new(storage.clone());
    first.login("admin@portacabin.com", "admin123").await.unwrap();
    first.logout();

    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_DATA_KEY).unwrap(), None);

    let second = AuthService::new(storage);
    assert_eq!(second.restore_session().await, Session::anonymous());
}

#[tokio::test]
async fn test_login_then_logout_matches_initial_except_loading() {
    let auth = AuthService::new(Arc::new(MemoryStorage::new()));
    auth.login("admin@portacabin.com", "admin123").await.unwrap();
    auth.logout();

    let expected = Session {
        is_loading: false,
        ..Session::initial()
    };
    assert_eq!(auth.session(), expected);
}

/// Verifier whose answer time depends on the email, to force an ordering
struct SlowFirstVerifier;

#[async_trait::async_trait]
impl CredentialVerifier for SlowFirstVerifier {
    async fn verify(&self, email: &str, _password: &str) -> Result<VerifiedIdentity> {
        let delay = if email.starts_with("slow") { 50 } else { 5 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(VerifiedIdentity {
            user: User::new(email, "Race", "User", email, Role::Employee),
            token: Some(format!("token-{}", email)),
        })
    }
}

#[tokio::test]
async fn test_racing_logins_last_resolved_wins() {
    let storage = Arc::new(MemoryStorage::new());
    let auth = AuthService::new(storage.clone()).with_verifier(Arc::new(SlowFirstVerifier));

    let (a, b) = tokio::join!(
        auth.login("slow@portacabin.com", "x"),
        auth.login("fast@portacabin.com", "x"),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(auth.session().token(), Some("token-slow@portacabin.com"));
    assert_eq!(
        storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(),
        Some("token-slow@portacabin.com")
    );
}

struct DownVerifier;

#[async_trait::async_trait]
impl CredentialVerifier for DownVerifier {
    async fn verify(&self, _email: &str, _password: &str) -> Result<VerifiedIdentity> {
        Err(AuthError::IdentityService("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_identity_service_failure_returns_to_anonymous() {
    let auth = AuthService::new(Arc::new(MemoryStorage::new())).with_verifier(Arc::new(DownVerifier));
    auth.restore_session().await;

    let err = auth.login("admin@portacabin.com", "admin123").await.unwrap_err();
    assert!(matches!(err, AuthError::IdentityService(_)));
    assert_eq!(auth.session(), Session::anonymous());
}
