//! Session module
//!
//! User identity model, the pure session reducer and the store that owns
//! the live session.

pub mod state;
pub mod store;
pub mod user;

pub use state::{reduce, Session, SessionAction};
pub use store::{SessionHandle, SessionStore};
pub use user::{Action, ModulePermission, Role, User, MODULES};
