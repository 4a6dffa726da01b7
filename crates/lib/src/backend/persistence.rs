//! JSON file format shared by the file-backed stores.

use std::{collections::HashMap, fs, io, path::Path};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::BackendError;
use crate::{Result, constants::PERSISTENCE_VERSION};

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

#[derive(Serialize)]
struct StoredEntriesRef<'a> {
    #[serde(rename = "_v", skip_serializing_if = "is_v0")]
    version: u8,
    entries: &'a HashMap<String, Value>,
}

#[derive(Deserialize)]
struct StoredEntries {
    #[serde(
        rename = "_v",
        default,
        deserialize_with = "validate_persistence_version"
    )]
    #[allow(dead_code)]
    version: u8,
    #[serde(default)]
    entries: HashMap<String, Value>,
}

/// Writes `entries` to `path`, replacing the file through a temporary sibling.
pub(crate) fn save_entries(path: &Path, entries: &HashMap<String, Value>) -> Result<()> {
    let stored = StoredEntriesRef {
        version: PERSISTENCE_VERSION,
        entries,
    };
    let encoded = serde_json::to_vec_pretty(&stored)
        .map_err(|source| BackendError::SerializationFailed { source })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, encoded).map_err(|source| BackendError::FileIo {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| BackendError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Reads entries from `path`. A missing file yields no entries.
pub(crate) fn load_entries(path: &Path) -> Result<HashMap<String, Value>> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(source) => {
            return Err(BackendError::FileIo {
                path: path.to_path_buf(),
                source,
            }
            .into());
        }
    };

    let stored: StoredEntries =
        serde_json::from_slice(&raw).map_err(|source| BackendError::DeserializationFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(stored.entries)
}
