//! Provider/consumer boundary for the auth service
//!
//! The application root builds one [`AuthService`] and installs it into an
//! [`AppContext`]. Views receive the context explicitly and reach the
//! service through [`AppContext::auth`], which fails fast when nothing was
//! installed.

use std::sync::Arc;

use super::facade::AuthService;
use crate::errors::{AuthError, Result};

#[derive(Debug, Clone, Default)]
pub struct AppContext {
    auth: Option<Arc<AuthService>>,
}

impl AppContext {
    /// Context with no auth provider installed
    pub fn empty() -> Self {
        Self::default()
    }

    /// Install the service without restoring a session
    ///
    /// The session stays in its loading state until
    /// [`AuthService::restore_session`] runs.
    pub fn provide(service: Arc<AuthService>) -> Self {
        AppContext {
            auth: Some(service),
        }
    }

    /// Install the service and restore the persisted session
    pub async fn mount(service: Arc<AuthService>) -> Self {
        service.restore_session().await;
        Self::provide(service)
    }

    /// Tear down: anything still in flight can no longer touch the session
    pub fn unmount(&self) {
        if let Some(service) = &self.auth {
            service.store().unmount();
        }
    }

    /// The installed auth service
    ///
    /// Reaching for auth outside a provider is a wiring bug, not a runtime
    /// condition, so this is an error rather than an anonymous answer.
    pub fn auth(&self) -> Result<&Arc<AuthService>> {
        self.auth.as_ref().ok_or_else(|| {
            AuthError::MissingProvider("auth accessed outside an AuthProvider".to_string())
        })
    }
}
