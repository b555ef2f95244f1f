use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use daylog_core::StoreError;
use tracing::{debug, warn};

/// Flat string-keyed persistence boundary for engagement state.
///
/// Mirrors the narrow surface of the browser-local storage the feed state
/// originally lived in: string keys, string values, no schema. The
/// engagement store flushes after every mutation, so `flush` must be cheap
/// enough to call synchronously.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// File-backed backend: one JSON object holding the whole key space.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the state file, treating a missing or corrupt file as an empty
    /// store. Corruption must not fail the session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => {
                    debug!(path = %path.display(), keys = entries.len(), "loaded state file");
                    entries
                }
                Err(e) => {
                    warn!(path = %path.display(), "state file is not valid JSON, starting empty: {}", e);
                    BTreeMap::new()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "no state file yet, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Flush {
            path: self.path.display().to_string(),
            source,
        })
    }
}
