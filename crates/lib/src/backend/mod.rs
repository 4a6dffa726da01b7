//! Cache backends for Persona sessions
//!
//! A [`Session`](crate::Session) keeps its actor document in memory and mirrors
//! it into a [`CacheBackend`] under a single key. The backend contract is an
//! opaque key-value store: whatever value is `set` must come back unchanged
//! from `get`. Nothing else about the storage format is assumed.
//!
//! Two implementations ship with the crate:
//!
//! - [`InMemory`]: a `HashMap` behind a lock, with optional JSON snapshots.
//! - [`JsonFile`]: write-through persistence into a single JSON file.

mod errors;
mod in_memory;
mod json_file;
mod persistence;

pub use errors::BackendError;
pub use in_memory::InMemory;
pub use json_file::JsonFile;

use serde_json::Value;

use crate::Result;

/// Key-value storage a session persists its document into.
///
/// All methods take `&self`; implementations provide their own interior
/// synchronization and must be `Send` and `Sync` so sessions can move across
/// threads.
///
/// Errors are returned as [`crate::Error::Backend`] and are propagated to the
/// caller of the session operation that triggered them.
pub trait CacheBackend: Send + Sync {
    /// Retrieves the value stored under `key`.
    ///
    /// # Returns
    /// `Ok(None)` if nothing is stored under `key`. A missing key is not an error.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Removes the entry for `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Retrieves the value under `key`, or `default` if nothing is stored.
    fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Checks whether an entry exists for `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<B: CacheBackend + ?Sized> CacheBackend for std::sync::Arc<B> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
