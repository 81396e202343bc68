//! Durable session storage
//!
//! Two independent string entries hold a persisted session:
//! - `authToken` - opaque token
//! - `userData`  - JSON-serialized [`User`](crate::session::User)
//!
//! Backends implement [`SessionStorage`]. [`MemoryStorage`] lives for the
//! process, [`FileStorage`] survives restarts the way browser local storage
//! survives reloads.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::errors::Result;

/// Storage key for the session token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Storage key for the serialized user record
pub const USER_DATA_KEY: &str = "userData";

/// String-keyed durable storage
pub trait SessionStorage: Send + Sync {
    /// Read an entry; `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write an entry, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove an entry; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
