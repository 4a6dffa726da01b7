//! Error types for the session system
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session requires a cache backend")]
    MissingCacheBackend,

    #[error("Invalid session configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Cache entry '{key}' holds a {found}, expected an object")]
    InvalidStoredDocument { key: String, found: &'static str },

    #[error("No current session is registered")]
    NoCurrentSession,
}

impl SessionError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::NoCurrentSession)
    }

    /// Check if this error comes from building a session with bad options.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SessionError::MissingCacheBackend | SessionError::InvalidConfig { .. }
        )
    }

    /// Check if this error was caused by malformed stored data.
    pub fn is_data_error(&self) -> bool {
        matches!(self, SessionError::InvalidStoredDocument { .. })
    }
}

impl From<SessionError> for crate::Error {
    fn from(err: SessionError) -> Self {
        crate::Error::Session(err)
    }
}
