//! # PCAB Core - Porta-Cabin session and permission runtime
//!
//! The Porta-Cabin business suite (quotations, sales orders, projects, work
//! orders, invoices, inventory, payroll, contractors, assets, reports,
//! settings) gates every view on one client-held session. This crate is
//! that session core.
//!
//! ## Components
//!
//! - `session` - user model, pure reducer, store that serializes dispatches
//! - `rbac` - `(module, action)` permission checks and filtered navigation
//! - `auth` - login/logout/update facade, swappable credential verifier
//! - `guard` - route table and the guard deciding render/redirect
//! - `storage` - durable `authToken` / `userData` entries
//!
//! ## Flow
//!
//! ```text
//!  start ──▶ AppContext::mount ──▶ AuthService::restore_session
//!                                         │
//!        navigation ──▶ RouteGuard::check ┴──▶ SessionStore ──▶ rbac
//! ```

pub mod auth;
pub mod config;
pub mod errors;
pub mod forms;
pub mod guard;
pub mod rbac;
pub mod session;
pub mod storage;

pub use auth::{AppContext, AuthService, CredentialVerifier, DemoTokenMinter, DemoVerifier, HttpVerifier, TokenMinter};
pub use config::AuthConfig;
pub use errors::AuthError;
pub use forms::{FormValidation, LoginForm};
pub use guard::{GuardDecision, GuardState, RouteGuard, RouteRequirement, RouteTable};
pub use rbac::{navigation_for, NavItem, PermissionEvaluator};
pub use session::{Action, ModulePermission, Role, Session, SessionAction, SessionStore, User};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};

/// Crate version
pub const VERSION: &str = "0.4.2";

/// Default login route
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
