//! Session configuration and builder.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Session, SessionError};
use crate::{
    Result,
    backend::CacheBackend,
    constants::{DEFAULT_ACCESS_TOKEN_KEY, DEFAULT_CACHE_KEY},
    doc::PathBuf,
    events::EventBus,
};

/// Options a session is built with.
///
/// Every field has a default, so partial JSON is accepted:
///
/// ```
/// # use persona::SessionConfig;
/// let config = SessionConfig::from_json_str(r#"{"cacheKey": "admin", "enableEvents": true}"#)?;
/// assert_eq!(config.cache_key, "admin");
/// assert_eq!(config.access_token_key, "accessToken");
/// assert_eq!(config.events_name(), "admin");
/// # Ok::<(), persona::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Backend key the document is stored under.
    pub cache_key: String,
    /// Document path holding the access token.
    pub access_token_key: String,
    /// Dispatch lifecycle events on the session's bus.
    pub enable_events: bool,
    /// Namespace for event topics; the cache key when unset.
    pub events_base_name: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            access_token_key: DEFAULT_ACCESS_TOKEN_KEY.to_string(),
            enable_events: false,
            events_base_name: None,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Namespace used for event topics.
    pub fn events_name(&self) -> &str {
        self.events_base_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.cache_key)
    }

    /// Checks that keys are usable.
    pub fn validate(&self) -> Result<()> {
        if self.cache_key.is_empty() {
            return Err(SessionError::InvalidConfig {
                reason: "cache key must not be empty".to_string(),
            }
            .into());
        }
        if PathBuf::from(self.access_token_key.as_str()).is_empty() {
            return Err(SessionError::InvalidConfig {
                reason: format!(
                    "access token key '{}' is not a usable path",
                    self.access_token_key
                ),
            }
            .into());
        }
        Ok(())
    }
}

/// Builder for [`Session`].
///
/// ```
/// use persona::{Session, backend::InMemory};
///
/// let session = Session::builder()
///     .cache_backend(InMemory::new())
///     .cache_key("admin")
///     .access_token_key("auth.token")
///     .build()?;
/// assert_eq!(session.cache_key(), "admin");
/// # Ok::<(), persona::Error>(())
/// ```
#[derive(Default)]
pub struct SessionBuilder {
    backend: Option<Arc<dyn CacheBackend>>,
    config: SessionConfig,
    bus: Option<EventBus>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend the session persists into. Required.
    pub fn cache_backend(mut self, backend: impl CacheBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Sets a backend shared with other owners.
    pub fn shared_cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replaces every option at once.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.config.cache_key = cache_key.into();
        self
    }

    pub fn access_token_key(mut self, access_token_key: impl Into<String>) -> Self {
        self.config.access_token_key = access_token_key.into();
        self
    }

    pub fn enable_events(mut self, enable_events: bool) -> Self {
        self.config.enable_events = enable_events;
        self
    }

    pub fn events_base_name(mut self, events_base_name: impl Into<String>) -> Self {
        self.config.events_base_name = Some(events_base_name.into());
        self
    }

    /// Dispatches events on `bus` instead of a private one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds and boots the session.
    ///
    /// # Errors
    /// - [`SessionError::MissingCacheBackend`] if no backend was set.
    /// - [`SessionError::InvalidConfig`] for empty keys.
    /// - Any backend or data error raised while booting.
    pub fn build(self) -> Result<Session> {
        let backend = self.backend.ok_or(SessionError::MissingCacheBackend)?;
        self.config.validate()?;
        Session::boot_new(backend, self.config, self.bus.unwrap_or_default())
    }
}
