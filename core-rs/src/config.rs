/**
 * config.rs
 * Parser for pcab.yaml files (YAML format)
 *
 * Format:
 * ```yaml
 * apiVersion: portacabin/v1
 * kind: AuthConfig
 * spec:
 *   storagePath: .pcab/session.json
 *   loginRoute: /login
 *   landingRoute: /
 *   demo:
 *     email: admin@portacabin.com
 *     password: admin123
 *   identityEndpoint: https://id.example.com/api/login   # optional
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AuthError;
use crate::forms::is_valid_email;

pub const API_VERSION: &str = "portacabin/v1";
pub const KIND: &str = "AuthConfig";

/// Default config file name looked up in a directory
pub const CONFIG_FILE_NAME: &str = "pcab.yaml";

/// pcab.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    pub api_version: String,
    pub kind: String,
    pub spec: AuthSpec,
}

/// Demo credential pair accepted by the built-in verifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemoCredentials {
    pub email: String,
    pub password: String,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        DemoCredentials {
            email: "admin@portacabin.com".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSpec {
    pub storage_path: PathBuf,
    pub login_route: String,
    pub landing_route: String,
    #[serde(default)]
    pub demo: DemoCredentials,
    /// Identity service login endpoint; demo verifier is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_endpoint: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            spec: AuthSpec {
                storage_path: PathBuf::from(".pcab/session.json"),
                login_route: crate::DEFAULT_LOGIN_ROUTE.to_string(),
                landing_route: "/".to_string(),
                demo: DemoCredentials::default(),
                identity_endpoint: None,
            },
        }
    }
}

impl AuthConfig {
    /// Load pcab.yaml from specified path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AuthError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AuthError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;

        let config: AuthConfig = serde_yaml::from_str(&content)
            .map_err(|e| AuthError::ParseError(format!("Invalid pcab.yaml: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load pcab.yaml from a directory, falling back to defaults when absent
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, AuthError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write config as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AuthError> {
        self.validate()?;
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }

    /// Validate config structure
    ///
    /// Ensures:
    /// - apiVersion is "portacabin/v1" and kind is "AuthConfig"
    /// - login and landing routes are absolute and distinct
    /// - demo email is well formed
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.api_version != API_VERSION {
            return Err(AuthError::ValidationError(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                API_VERSION, self.api_version
            )));
        }

        if self.kind != KIND {
            return Err(AuthError::ValidationError(format!(
                "Invalid kind: expected '{}', got '{}'",
                KIND, self.kind
            )));
        }

        for (name, route) in [
            ("loginRoute", &self.spec.login_route),
            ("landingRoute", &self.spec.landing_route),
        ] {
            if !route.starts_with('/') {
                return Err(AuthError::ValidationError(format!(
                    "{} must start with '/', got '{}'",
                    name, route
                )));
            }
        }

        if self.spec.login_route == self.spec.landing_route {
            return Err(AuthError::ValidationError(
                "loginRoute and landingRoute must differ".to_string(),
            ));
        }

        if self.spec.storage_path.as_os_str().is_empty() {
            return Err(AuthError::ValidationError("storagePath cannot be empty".to_string()));
        }

        if !is_valid_email(&self.spec.demo.email) {
            return Err(AuthError::ValidationError(format!(
                "demo.email is not a valid email: '{}'",
                self.spec.demo.email
            )));
        }

        Ok(())
    }

    /// Storage path resolved against `base` when relative
    pub fn storage_path_in(&self, base: &Path) -> PathBuf {
        if self.spec.storage_path.is_absolute() {
            self.spec.storage_path.clone()
        } else {
            base.join(&self.spec.storage_path)
        }
    }
}
