//! RBAC (Role-Based Access Control) module
//!
//! Permission checks over the signed-in user's per-module grants, and the
//! sidebar navigation filtered by those grants.

pub mod evaluator;
pub mod navigation;

pub use evaluator::{can_access_module, has_permission, PermissionEvaluator};
pub use navigation::{navigation_for, NavItem};
