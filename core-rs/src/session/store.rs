//! Session store - owns the live session and serializes dispatches

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::state::{reduce, Session, SessionAction};

/// Owner of the live [`Session`]
///
/// Every dispatch runs the reducer under the write lock, so transitions are
/// applied one at a time even when two logins race. After [`unmount`]
/// dispatches are dropped.
///
/// [`unmount`]: SessionStore::unmount
#[derive(Debug)]
pub struct SessionStore {
    state: RwLock<Session>,
    mounted: AtomicBool,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            state: RwLock::new(Session::initial()),
            mounted: AtomicBool::new(true),
        }
    }

    /// Apply an action; returns false if the store was already torn down
    pub fn dispatch(&self, action: SessionAction) -> bool {
        if !self.is_mounted() {
            debug!(action = action.name(), "session store unmounted, dropping action");
            return false;
        }

        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        let current = std::mem::take(&mut *guard);
        let name = action.name();
        *guard = reduce(current, action);
        debug!(
            action = name,
            authenticated = guard.is_authenticated(),
            loading = guard.is_loading(),
            "session transition"
        );
        true
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Read the current session without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Tear the store down; later dispatches become no-ops
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared read/dispatch capability handed to consumers
pub type SessionHandle = Arc<SessionStore>;
