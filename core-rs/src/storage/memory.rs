//! In-process storage backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::SessionStorage;
use crate::errors::{AuthError, Result};

/// Map-backed storage
///
/// `set_writable(false)` makes every write fail, which is how a disabled or
/// full browser store behaves.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_writable(&self, writable: bool) {
        self.read_only.store(!writable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(AuthError::Storage(format!("storage is read-only, cannot write {}", key)));
        }
        Ok(())
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| AuthError::Storage(format!("storage lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AuthError::Storage(format!("storage lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AuthError::Storage(format!("storage lock poisoned: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}
