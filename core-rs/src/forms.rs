//! Login form validation
//!
//! Runs before any credential check. A form that fails here never reaches
//! the session store, so no LOGIN_START is dispatched for it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::AuthError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Outcome of form validation, field errors in form order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormValidation {
    pub errors: Vec<FieldError>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Collapse into a single error for callers that only propagate
    pub fn into_result(self) -> Result<(), AuthError> {
        if self.is_valid() {
            return Ok(());
        }
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(AuthError::InvalidForm(joined))
    }
}

/// Email/password pair as typed into the login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        LoginForm {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> FormValidation {
        let mut result = FormValidation::default();
        let email = self.email.trim();

        if email.is_empty() {
            result.add("email", "Email is required");
        } else if !is_valid_email(email) {
            result.add("email", "Please enter a valid email address");
        }

        if self.password.is_empty() {
            result.add("password", "Password is required");
        }

        result
    }
}
