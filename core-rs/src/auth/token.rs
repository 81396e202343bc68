//! Session token minting
//!
//! Demo tokens only identify a login for the lifetime of the persisted
//! session. They are not signed and carry no claims.

use chrono::Utc;
use uuid::Uuid;

use crate::session::User;

pub trait TokenMinter: Send + Sync {
    fn mint(&self, user: &User) -> String;
}

/// `demo-token-<unix millis>-<uuid>`; non-cryptographic
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoTokenMinter;

impl TokenMinter for DemoTokenMinter {
    fn mint(&self, _user: &User) -> String {
        format!(
            "demo-token-{}-{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        )
    }
}
