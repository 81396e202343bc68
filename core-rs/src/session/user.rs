//! User identity record and per-module permission entries
//!
//! Serialized form (the `userData` storage entry):
//! ```json
//! {
//!   "id": "1",
//!   "firstName": "Admin",
//!   "lastName": "User",
//!   "email": "admin@portacabin.com",
//!   "role": "admin",
//!   "permissions": [{ "module": "quotations", "actions": ["create", "read"] }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AuthError;

/// Business modules of the suite, in navigation order
pub const MODULES: &[&str] = &[
    "quotations",
    "sales-orders",
    "projects",
    "work-orders",
    "invoices",
    "inventory",
    "payroll",
    "contractors",
    "assets",
    "reports",
    "settings",
];

/// Operation a permission entry can grant on a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(AuthError::ParseError(format!("Unknown action: {}", other))),
        }
    }
}

/// Fixed role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    CustomerService,
    Employee,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::CustomerService => "customer_service",
            Role::Employee => "employee",
            Role::Viewer => "viewer",
        }
    }

    /// Starting permission set handed to a freshly provisioned user of this role
    ///
    /// Roles carry no authority of their own: only the resulting entries are
    /// consulted by the evaluator.
    pub fn default_permissions(&self) -> Vec<ModulePermission> {
        match self {
            Role::Admin => MODULES
                .iter()
                .map(|m| ModulePermission::new(*m, Action::ALL))
                .collect(),
            Role::Manager => MODULES
                .iter()
                .map(|m| match *m {
                    "payroll" | "settings" => ModulePermission::new(*m, [Action::Read]),
                    _ => ModulePermission::new(*m, Action::ALL),
                })
                .collect(),
            Role::CustomerService => {
                let mut perms: Vec<ModulePermission> = ["quotations", "sales-orders"]
                    .iter()
                    .map(|m| ModulePermission::new(*m, [Action::Create, Action::Read, Action::Update]))
                    .collect();
                perms.extend(
                    ["projects", "invoices"]
                        .iter()
                        .map(|m| ModulePermission::new(*m, [Action::Read])),
                );
                perms
            }
            Role::Employee => ["projects", "work-orders", "inventory"]
                .iter()
                .map(|m| ModulePermission::new(*m, [Action::Read]))
                .collect(),
            Role::Viewer => MODULES
                .iter()
                .filter(|m| !matches!(**m, "payroll" | "settings"))
                .map(|m| ModulePermission::new(*m, [Action::Read]))
                .collect(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "customer_service" => Ok(Role::CustomerService),
            "employee" => Ok(Role::Employee),
            "viewer" => Ok(Role::Viewer),
            other => Err(AuthError::ParseError(format!("Unknown role: {}", other))),
        }
    }
}

/// Actions granted on one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePermission {
    pub module: String,
    pub actions: Vec<Action>,
}

impl ModulePermission {
    pub fn new(module: impl Into<String>, actions: impl IntoIterator<Item = Action>) -> Self {
        let mut actions: Vec<Action> = actions.into_iter().collect();
        actions.sort();
        actions.dedup();
        ModulePermission {
            module: module.into(),
            actions,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

/// Identity record owned by the session
///
/// Replaced wholesale on login and profile update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<ModulePermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Build a user with the role's default permission set
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        User {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            role,
            permissions: role.default_permissions(),
            avatar: None,
            department: None,
            phone: None,
            is_active: true,
            created_at: None,
            last_login: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Same user with a different permission list
    pub fn with_permissions(self, permissions: Vec<ModulePermission>) -> Self {
        User { permissions, ..self }
    }
}
