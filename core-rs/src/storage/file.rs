/**
 * file.rs
 * JSON-file storage backend
 *
 * Format (one flat object, string values only):
 * ```json
 * {
 *   "authToken": "demo-token-1718000000000-3f2a...",
 *   "userData": "{\"id\":\"1\",\"firstName\":\"Admin\",...}"
 * }
 * ```
 *
 * The file is re-read on every access so two processes sharing it see each
 * other's writes. There is no locking: the last writer wins.
 */

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::SessionStorage;
use crate::errors::{AuthError, Result};

/// Storage backed by a single JSON file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a FileStorage at `path`
    ///
    /// The file is not touched until the first write.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStorage {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all entries; empty map if the file doesn't exist
    fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            AuthError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AuthError::Storage(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(AuthError::Storage(format!(
                "Invalid storage JSON in {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AuthError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        // Write beside the target, then rename over it
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| {
            AuthError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            AuthError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }

    /// Entries to build a write on; an unparseable file starts over empty
    fn load_for_write(&self) -> Result<Map<String, Value>> {
        match self.load() {
            Ok(entries) => Ok(entries),
            Err(AuthError::Storage(msg)) if self.path.is_file() => {
                warn!(path = %self.path.display(), error = %msg, "discarding unreadable storage file");
                Ok(Map::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.load()?;
        match entries.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            // Non-string values are stored by hand; hand back their JSON text
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load_for_write()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let corrupt = self.path.is_file() && self.load().is_err();
        let mut entries = self.load_for_write()?;
        if entries.remove(key).is_some() || corrupt {
            self.save(&entries)?;
        }
        Ok(())
    }
}
