//! In-memory cache backend
//!
//! Suitable for tests, short-lived processes, or hosts that persist the whole
//! store themselves via [`InMemory::save_to_file`] / [`InMemory::load_from_file`].

use std::{
    collections::HashMap,
    path::Path,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde_json::Value;

use super::{BackendError, CacheBackend, persistence};
use crate::Result;

/// A simple in-memory backend using a `HashMap` for storage.
#[derive(Debug, Default)]
pub struct InMemory {
    entries: RwLock<HashMap<String, Value>>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Returns the keys currently stored.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read("keys")?.keys().cloned().collect())
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read("len")?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read("is_empty")?.is_empty())
    }

    /// Clones every stored entry.
    pub fn snapshot(&self) -> Result<HashMap<String, Value>> {
        Ok(self.read("snapshot")?.clone())
    }

    /// Saves all entries to `path` as JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let entries = self.read("save_to_file")?;
        persistence::save_entries(path.as_ref(), &entries)
    }

    /// Loads entries from a JSON file written by [`InMemory::save_to_file`].
    ///
    /// If the file does not exist, a new, empty backend is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let entries = persistence::load_entries(path.as_ref())?;
        tracing::debug!(
            path = %path.as_ref().display(),
            entries = entries.len(),
            "Loaded in-memory cache from file"
        );
        Ok(Self::with_entries(entries))
    }

    fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, HashMap<String, Value>>> {
        self.entries
            .read()
            .map_err(|_| BackendError::LockPoisoned { operation }.into())
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, Value>>> {
        self.entries
            .write()
            .map_err(|_| BackendError::LockPoisoned { operation }.into())
    }
}

impl CacheBackend for InMemory {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read("get")?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.write("set")?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.write("remove")?.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.read("contains")?.contains_key(key))
    }
}
