//! # Storage Backends
//!
//! The record store port and its two built-in implementations.
//!
//! ## The Port
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StorageBackend: read/write ONE string payload per collection key      │
//! │                                                                         │
//! │      ┌──────────────────┐        ┌──────────────────┐                  │
//! │      │ JsonFileBackend  │        │  MemoryBackend   │                  │
//! │      │ <dir>/<key>.json │        │  Mutex<HashMap>  │                  │
//! │      │ (durable)        │        │  (tests, demos)  │                  │
//! │      └──────────────────┘        └──────────────────┘                  │
//! │                                                                         │
//! │  A hosted backend (one table per collection) is a third impl of the    │
//! │  same trait; repository code never changes.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payload granularity is deliberately the whole collection: every
//! mutation is read list → change in memory → write list back, which is
//! exactly the consistency model the rest of the system assumes.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Port
// =============================================================================

/// Keyed persistence for collection payloads.
///
/// Implementations must be durable per `write` call (or deliberately not,
/// as with [`MemoryBackend`]); the store layer offers no flush.
pub trait StorageBackend {
    /// Reads the payload stored under `key`, or `None` if the key was
    /// never written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the payload stored under `key`.
    fn write(&self, key: &str, payload: &str) -> StoreResult<()>;
}

// =============================================================================
// JSON File Backend
// =============================================================================

/// Durable backend storing one `<key>.json` file per collection in a
/// data directory.
#[derive(Debug)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Opens a backend rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(dir.display().to_string(), e))?;
        Ok(JsonFileBackend { dir })
    }

    /// Returns the data directory.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for JsonFileBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn write(&self, key: &str, payload: &str) -> StoreResult<()> {
        // Write-then-rename so a crash mid-write never truncates the
        // previous payload.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, payload).map_err(|e| StoreError::io(key, e))?;
        fs::rename(&tmp, self.path_for(key)).map_err(|e| StoreError::io(key, e))?;
        Ok(())
    }
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// Volatile backend for tests and previews. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock only means a panicking test; the map itself is
        // still usable.
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> StoreResult<()> {
        self.lock().insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("medicines").unwrap(), None);

        backend.write("medicines", "[]").unwrap();
        assert_eq!(backend.read("medicines").unwrap().as_deref(), Some("[]"));

        backend.write("medicines", "[1]").unwrap();
        assert_eq!(backend.read("medicines").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_file_backend_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path()).unwrap();
        assert_eq!(backend.read("sales").unwrap(), None);
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path()).unwrap();

        backend.write("sales", "[{\"id\":\"s1\"}]").unwrap();
        assert_eq!(
            backend.read("sales").unwrap().as_deref(),
            Some("[{\"id\":\"s1\"}]")
        );

        // File lands where a second backend instance can see it
        let reopened = JsonFileBackend::new(dir.path()).unwrap();
        assert!(reopened.read("sales").unwrap().is_some());
    }
}
