//! Route guarding
//!
//! The route table of the suite and the guard that gates each navigation
//! on session and permission state.

pub mod route_guard;
pub mod routes;

pub use route_guard::{GuardDecision, GuardState, RouteGuard};
pub use routes::{Access, Route, RouteMatch, RouteRequirement, RouteTable};
