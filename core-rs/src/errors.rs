//! Error types for the Porta-Cabin core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Credential check rejected the email/password pair.
    ///
    /// The message is shown inline on the login form, keep it stable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Login form invalid: {0}")]
    InvalidForm(String),

    #[error("Session provider missing: {0}")]
    MissingProvider(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Identity service error: {0}")]
    IdentityService(String),

    #[error("Route error: {0}")]
    Route(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::IdentityService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
