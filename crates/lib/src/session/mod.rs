//! The session state entity.
//!
//! A [`Session`] holds the document describing the currently authenticated
//! actor, mirrors it into a [`CacheBackend`] under its cache key, and notifies
//! observers through its [`SessionEvents`].
//!
//! Every mutating call runs in the same order: update memory, write the
//! backend, then fire events. If the backend write fails the error is returned
//! and no event fires, but the in-memory document has already changed; callers
//! that need all-or-nothing behaviour must re-`boot` to resynchronize.

mod config;
mod errors;


pub use config::{SessionBuilder, SessionConfig};
pub use errors::SessionError;

use std::{fmt, sync::Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    Result,
    backend::CacheBackend,
    doc::{self, Doc},
    events::{EventBus, SessionEvents},
};

/// State of the currently authenticated actor.
pub struct Session {
    /// Backend the document is persisted into
    backend: Arc<dyn CacheBackend>,

    config: SessionConfig,

    /// Bus the notifier dispatches on when events are enabled
    bus: EventBus,

    /// Rebuilt on every boot; silent when events are disabled
    events: SessionEvents,

    /// The actor document, mirrored into the backend
    data: Doc,

    /// Granted capabilities; never persisted
    permissions: Doc,
}

impl Session {
    /// Creates a builder. A cache backend must be set before `build`.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Creates and boots a session with the default configuration.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Result<Self> {
        Self::with_config(backend, SessionConfig::default())
    }

    /// Creates and boots a session with `config` on a private event bus.
    pub fn with_config(backend: Arc<dyn CacheBackend>, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Self::boot_new(backend, config, EventBus::new())
    }

    pub(crate) fn boot_new(
        backend: Arc<dyn CacheBackend>,
        config: SessionConfig,
        bus: EventBus,
    ) -> Result<Self> {
        let events = SessionEvents::silent(config.events_name());
        let mut session = Self {
            backend,
            config,
            bus,
            events,
            data: Doc::new(),
            permissions: Doc::new(),
        };
        session.boot()?;
        Ok(session)
    }

    /// Hydrates the document from the backend and fires `boot`.
    ///
    /// Called on construction; call again to refresh from the backend. An
    /// absent or `null` entry boots an empty document.
    ///
    /// # Errors
    /// - Backend errors from reading the cache key.
    /// - [`SessionError::InvalidStoredDocument`] if the entry is not an object.
    pub fn boot(&mut self) -> Result<&mut Self> {
        self.events = if self.config.enable_events {
            SessionEvents::new(self.config.events_name(), self.bus.clone())
        } else {
            SessionEvents::silent(self.config.events_name())
        };

        let stored = self
            .backend
            .get_or(&self.config.cache_key, Value::Object(Default::default()))?;
        self.data = match stored {
            Value::Object(fields) => Doc::from(fields),
            Value::Null => Doc::new(),
            other => {
                return Err(SessionError::InvalidStoredDocument {
                    key: self.config.cache_key.clone(),
                    found: doc::kind(&other),
                }
                .into());
            }
        };
        info!(
            cache_key = %self.config.cache_key,
            fields = self.data.len(),
            events = self.events.is_enabled(),
            "Session booted"
        );

        let session: &Session = self;
        session.events.trigger_boot(&session.data, session);
        Ok(self)
    }

    // === Configuration ===

    /// Backend key the document is stored under.
    pub fn cache_key(&self) -> &str {
        &self.config.cache_key
    }

    /// Document path holding the access token.
    pub fn access_token_key(&self) -> &str {
        &self.config.access_token_key
    }

    /// Changes the path the access token is read from and written to.
    ///
    /// The document is not touched; a token stored under the old key stays there.
    pub fn set_access_token_key(&mut self, access_token_key: impl Into<String>) -> &mut Self {
        self.config.access_token_key = access_token_key.into();
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The notifier observers subscribe on.
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    // === Authentication state ===

    /// Returns `true` if the access token is a non-empty string.
    pub fn is_logged_in(&self) -> bool {
        !self.access_token().is_empty()
    }

    pub fn is_not_logged_in(&self) -> bool {
        !self.is_logged_in()
    }

    /// Logs in with `user_data`.
    ///
    /// Fires `login` with the raw payload first, then applies it through
    /// [`Session::update`]. No network call is made.
    pub fn login(&mut self, user_data: Doc) -> Result<&mut Self> {
        info!(cache_key = %self.config.cache_key, "Logging in");
        let session: &Session = self;
        session.events.trigger_login(&user_data, session);

        self.update(user_data)?;
        Ok(self)
    }

    /// Clears the document and removes the cache entry, then fires `logout`.
    ///
    /// Permissions are kept. Logging out twice fires `logout` twice.
    pub fn logout(&mut self) -> Result<()> {
        self.data.clear();
        if let Err(e) = self.backend.remove(&self.config.cache_key) {
            warn!(cache_key = %self.config.cache_key, error = %e, "Failed to remove session entry");
            return Err(e);
        }
        info!(cache_key = %self.config.cache_key, "Logged out");

        let session: &Session = self;
        session.events.trigger_logout(session);
        Ok(())
    }

    // === Document access ===

    /// Returns the value at `key` (a dot-separated path).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns a clone of the value at `key`, or `default` when absent.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.data.get_or(key, default)
    }

    /// Writes `value` at `key` if it differs from the current value.
    ///
    /// The current value of an absent key is `null`, and values are compared
    /// structurally. Equal values are a no-op: nothing is written and no event
    /// fires. Otherwise the whole document is persisted, then `keyChange` fires
    /// with `(key, value, old value)`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let old_value = self.get_or(key, Value::Null);
        if value == old_value {
            debug!(key, "Value unchanged; skipping write");
            return Ok(());
        }

        self.data.set(key, value.clone())?;
        self.persist()?;

        let session: &Session = self;
        session
            .events
            .trigger_key_change(key, &value, &old_value, session);
        Ok(())
    }

    /// Replaces the whole document with `user_data`.
    ///
    /// If `user_data` has no truthy value at the access token key, the current
    /// token is copied into it first. Fields of `user_data` are never
    /// overwritten to make room for the token: if a value in the middle of the
    /// token path is not an object, the update fails with
    /// [`DocError::PathBlocked`](crate::doc::DocError::PathBlocked) and nothing
    /// changes. After persisting, `keyChange` fires for
    /// every top-level key of the new document, whether or not its value
    /// changed, followed by one `change` with the new and old documents.
    pub fn update(&mut self, mut user_data: Doc) -> Result<()> {
        if !user_data.is_truthy(&self.config.access_token_key) {
            let token = self.access_token().to_string();
            user_data.set_preserving(&self.config.access_token_key, token)?;
        }

        let old_data = std::mem::replace(&mut self.data, user_data);
        self.persist()?;

        let session: &Session = self;
        for (key, new_value) in &session.data {
            let old_value = old_data.field(key).unwrap_or(&Value::Null);
            session
                .events
                .trigger_key_change(key, new_value, old_value, session);
        }
        session
            .events
            .trigger_change(&session.data, &old_data, session);
        Ok(())
    }

    /// Borrowed view of the whole document.
    ///
    /// Changes go through [`Session::set`] or [`Session::update`] so they are
    /// persisted and observed.
    pub fn all(&self) -> &Doc {
        &self.data
    }

    // === Access token ===

    /// The access token, or `""` when absent or not a string.
    pub fn access_token(&self) -> &str {
        self.data
            .get_str(&self.config.access_token_key)
            .unwrap_or("")
    }

    /// Stores a new access token. Fires `keyChange`, not `login`; a no-op when unchanged.
    pub fn set_access_token(&mut self, token: impl Into<String>) -> Result<()> {
        let key = self.config.access_token_key.clone();
        self.set(&key, Value::String(token.into()))
    }

    /// Alias of [`Session::set_access_token`].
    pub fn refresh_token(&mut self, token: impl Into<String>) -> Result<()> {
        self.set_access_token(token)
    }

    // === Permissions ===

    /// Replaces the permission set. Not persisted; fires no events.
    pub fn set_permissions(&mut self, permissions: Doc) {
        self.permissions = permissions;
    }

    pub fn permissions(&self) -> &Doc {
        &self.permissions
    }

    /// Returns `true` if the value at `permission` is truthy.
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.is_truthy(permission)
    }

    fn persist(&self) -> Result<()> {
        self.backend
            .set(&self.config.cache_key, &self.data.to_value())
            .inspect_err(|e| {
                warn!(
                    cache_key = %self.config.cache_key,
                    error = %e,
                    "Failed to persist session document"
                );
            })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("events", &self.events)
            .field("data", &self.data)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}
