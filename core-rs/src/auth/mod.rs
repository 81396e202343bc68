//! Authentication module
//!
//! Login/logout/profile-update facade over the session store, the
//! swappable credential check and token minting behind it, and the
//! context through which views reach it.

pub mod context;
pub mod facade;
pub mod token;
pub mod verifier;

pub use context::AppContext;
pub use facade::AuthService;
pub use token::{DemoTokenMinter, TokenMinter};
pub use verifier::{CredentialVerifier, DemoVerifier, HttpVerifier, LoginResponse, VerifiedIdentity};
