//! Auth facade - login, logout, profile update and session restoration
//!
//! The only component with side effects: it reads and writes the durable
//! storage entries and calls the credential verifier. Everything else
//! flows through [`SessionStore::dispatch`](crate::session::SessionStore::dispatch).
//!
//! Storage failures never abort an operation. They are logged and the
//! in-memory session still changes, so the worst case is a session that
//! does not survive a reload.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::token::{DemoTokenMinter, TokenMinter};
use super::verifier::{CredentialVerifier, DemoVerifier, HttpVerifier};
use crate::config::AuthConfig;
use crate::errors::Result;
use crate::forms::LoginForm;
use crate::rbac::{self, PermissionEvaluator};
use crate::session::{Action, Session, SessionAction, SessionHandle, SessionStore, User};
use crate::storage::{SessionStorage, AUTH_TOKEN_KEY, USER_DATA_KEY};

pub struct AuthService {
    store: SessionHandle,
    storage: Arc<dyn SessionStorage>,
    verifier: Arc<dyn CredentialVerifier>,
    minter: Arc<dyn TokenMinter>,
    restore_started: AtomicBool,
}

impl AuthService {
    /// Service over a fresh store, using the demo verifier and token minter
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        AuthService {
            store: Arc::new(SessionStore::new()),
            storage,
            verifier: Arc::new(DemoVerifier::default()),
            minter: Arc::new(DemoTokenMinter),
            restore_started: AtomicBool::new(false),
        }
    }

    /// Service wired from config: HTTP verifier when an identity endpoint
    /// is set, demo verifier with the configured pair otherwise
    pub fn from_config(config: &AuthConfig, storage: Arc<dyn SessionStorage>) -> Self {
        let service = Self::new(storage);
        match &config.spec.identity_endpoint {
            Some(endpoint) => service.with_verifier(Arc::new(HttpVerifier::new(endpoint.clone()))),
            None => service.with_verifier(Arc::new(DemoVerifier::new(config.spec.demo.clone()))),
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_minter(mut self, minter: Arc<dyn TokenMinter>) -> Self {
        self.minter = minter;
        self
    }

    pub fn store(&self) -> &SessionHandle {
        &self.store
    }

    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    pub fn user(&self) -> Option<User> {
        self.store.with(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.with(|s| s.is_authenticated())
    }

    pub fn is_loading(&self) -> bool {
        self.store.with(|s| s.is_loading())
    }

    pub fn has_permission(&self, module: &str, action: Action) -> bool {
        self.store.with(|s| rbac::has_permission(s.user(), module, action))
    }

    pub fn can_access_module(&self, module: &str) -> bool {
        self.store.with(|s| rbac::can_access_module(s.user(), module))
    }

    pub fn evaluator(&self) -> PermissionEvaluator {
        PermissionEvaluator::new(self.store.clone())
    }

    /// Restore a persisted session at mount
    ///
    /// Both entries present, a non-empty token and the user record parsing
    /// → LOGIN_SUCCESS. Anything else (missing entry, empty token, corrupt
    /// JSON, unreadable storage) →
    /// SET_LOADING(false), leaving the session anonymous. Only the first
    /// call has any effect.
    pub async fn restore_session(&self) -> Session {
        if self.restore_started.swap(true, Ordering::SeqCst) {
            debug!("session restoration already ran, ignoring");
            return self.session();
        }

        let token = self.read_entry(AUTH_TOKEN_KEY);
        let raw_user = self.read_entry(USER_DATA_KEY);

        let action = match (token, raw_user) {
            (Some(token), Some(raw)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&raw) {
                    Ok(user) => {
                        debug!(user_id = %user.id, "restored persisted session");
                        SessionAction::LoginSuccess { user, token }
                    }
                    Err(e) => {
                        warn!(error = %e, "stored user record is corrupt, starting anonymous");
                        SessionAction::SetLoading(false)
                    }
                }
            }
            _ => {
                debug!("no persisted session");
                SessionAction::SetLoading(false)
            }
        };

        self.store.dispatch(action);
        self.session()
    }

    /// Sign in with an email/password pair
    ///
    /// On rejection the session returns to anonymous and the verifier's
    /// error is returned; for a bad pair its message is "Invalid credentials".
    /// Concurrent calls are not deduplicated: the last one to resolve wins.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.store.dispatch(SessionAction::LoginStart);

        match self.verifier.verify(email, password).await {
            Ok(identity) => {
                let user = identity.user;
                let token = identity.token.unwrap_or_else(|| self.minter.mint(&user));

                self.write_entry(AUTH_TOKEN_KEY, &token);
                self.persist_user(&user);

                info!(user_id = %user.id, role = %user.role, "login succeeded");
                self.store.dispatch(SessionAction::LoginSuccess { user, token });
                Ok(())
            }
            Err(e) => {
                info!(email, error = %e, "login rejected");
                self.store.dispatch(SessionAction::LoginFailure);
                Err(e)
            }
        }
    }

    /// Validate the form, then sign in
    ///
    /// An invalid form is rejected before any action is dispatched.
    pub async fn submit_login(&self, form: &LoginForm) -> Result<()> {
        form.validate().into_result()?;
        self.login(form.email.trim(), &form.password).await
    }

    /// Forget the persisted session and return to anonymous
    pub fn logout(&self) {
        self.remove_entry(AUTH_TOKEN_KEY);
        self.remove_entry(USER_DATA_KEY);
        self.store.dispatch(SessionAction::Logout);
        info!("logged out");
    }

    /// Replace the signed-in user's record
    ///
    /// The caller supplies a complete user; no shape checks are made.
    pub fn update_user(&self, user: User) {
        self.persist_user(&user);
        self.store.dispatch(SessionAction::UpdateUser(user));
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.write_entry(USER_DATA_KEY, &json),
            Err(e) => warn!(error = %e, "failed to serialize user record"),
        }
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap_or_else(|e| {
            warn!(key, error = %e, "storage read failed");
            None
        })
    }

    fn write_entry(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "storage write failed, session will not survive reload");
        }
    }

    fn remove_entry(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "storage remove failed");
        }
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("session", &self.store.snapshot())
            .finish_non_exhaustive()
    }
}
