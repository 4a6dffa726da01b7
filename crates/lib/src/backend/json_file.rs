//! Write-through JSON file backend
//!
//! Every `set` and `remove` rewrites the whole file, so the file always mirrors
//! the in-memory entries once a call returns. Reads are served from memory.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use serde_json::Value;

use super::{BackendError, CacheBackend, persistence};
use crate::Result;

/// A cache backend persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl JsonFile {
    /// Opens the store at `path`, loading existing entries.
    ///
    /// A missing file is treated as an empty store and is created on the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = persistence::load_entries(&path)?;
        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "Opened JSON file cache"
        );
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// The file this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, HashMap<String, Value>>> {
        self.entries
            .lock()
            .map_err(|_| BackendError::LockPoisoned { operation }.into())
    }
}

impl CacheBackend for JsonFile {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock("get")?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let mut entries = self.lock("set")?;
        let previous = entries.insert(key.to_string(), value.clone());
        if let Err(e) = persistence::save_entries(&self.path, &entries) {
            // Keep memory and file in agreement when the write fails.
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock("remove")?;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = persistence::save_entries(&self.path, &entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}
