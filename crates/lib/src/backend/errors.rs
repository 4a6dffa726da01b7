//! Error types for cache backends.
//!
//! Sessions propagate these unchanged: no retries, no wrapping beyond
//! [`crate::Error::Backend`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during cache backend operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading or writing the backing file failed.
    #[error("File I/O error on {}", path.display())]
    FileIo {
        /// The file being accessed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Encoding stored entries failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Decoding a persisted file failed.
    #[error("Deserialization of {} failed", path.display())]
    DeserializationFailed {
        /// The file being decoded
        path: PathBuf,
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// A lock guarding the entries was poisoned by a panicking writer.
    #[error("Backend lock poisoned during {operation}")]
    LockPoisoned {
        /// The operation that observed the poisoned lock
        operation: &'static str,
    },

    /// The backend cannot serve requests right now.
    #[error("Backend unavailable: {reason}")]
    Unavailable {
        /// Description of the failure
        reason: String,
    },
}

impl BackendError {
    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(self, BackendError::FileIo { .. })
    }

    /// Check if this error is related to encoding or decoding entries.
    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            BackendError::SerializationFailed { .. } | BackendError::DeserializationFailed { .. }
        )
    }

    /// Check if retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. } | BackendError::Unavailable { .. }
        )
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
