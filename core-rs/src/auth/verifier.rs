//! Credential verification
//!
//! The facade never checks passwords itself: it hands the pair to a
//! [`CredentialVerifier`]. [`DemoVerifier`] accepts one fixed pair,
//! [`HttpVerifier`] delegates to an identity service with the contract
//!
//! ```text
//! POST <endpoint> {"email": "...", "password": "..."}
//!   2xx     -> {"user": User, "token": "..."}
//!   401/403 -> invalid credentials
//! ```

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::DemoCredentials;
use crate::errors::{AuthError, Result};
use crate::session::{Role, User};

/// Identity returned by a successful check
///
/// `token` is set when the verifier issues its own; otherwise the facade
/// mints one.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub user: User,
    pub token: Option<String>,
}

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Check an email/password pair
    ///
    /// Rejected credentials must be reported as [`AuthError::InvalidCredentials`].
    async fn verify(&self, email: &str, password: &str) -> Result<VerifiedIdentity>;
}

/// Accepts a single configured pair and signs in the demo administrator
#[derive(Debug, Clone)]
pub struct DemoVerifier {
    credentials: DemoCredentials,
    latency: Duration,
}

impl DemoVerifier {
    pub fn new(credentials: DemoCredentials) -> Self {
        DemoVerifier {
            credentials,
            latency: Duration::ZERO,
        }
    }

    /// Simulated round-trip before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The administrator signed in by the demo pair
    pub fn demo_user(email: &str) -> User {
        User {
            department: Some("Management".to_string()),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            last_login: Some(Utc::now().to_rfc3339()),
            ..User::new("1", "Admin", "User", email, Role::Admin)
        }
    }
}

impl Default for DemoVerifier {
    fn default() -> Self {
        Self::new(DemoCredentials::default())
    }
}

#[async_trait]
impl CredentialVerifier for DemoVerifier {
    async fn verify(&self, email: &str, password: &str) -> Result<VerifiedIdentity> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if email == self.credentials.email && password == self.credentials.password {
            return Ok(VerifiedIdentity {
                user: Self::demo_user(email),
                token: None,
            });
        }

        Err(AuthError::InvalidCredentials)
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Success body of the identity service
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Delegates to a remote identity service
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpVerifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpVerifier {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Map a response status to the verifier contract
    fn check_status(status: StatusCode) -> Result<()> {
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(AuthError::InvalidCredentials)
        } else {
            Err(AuthError::IdentityService(format!(
                "identity service returned {}",
                status
            )))
        }
    }
}

#[async_trait]
impl CredentialVerifier for HttpVerifier {
    async fn verify(&self, email: &str, password: &str) -> Result<VerifiedIdentity> {
        debug!(endpoint = %self.endpoint, "verifying credentials with identity service");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        Self::check_status(response.status())?;

        let body: LoginResponse = response.json().await?;
        Ok(VerifiedIdentity {
            user: body.user,
            token: Some(body.token),
        })
    }
}
