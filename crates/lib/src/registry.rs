//! Process-wide "current session" slot.
//!
//! Hosts that want a single session reachable from anywhere register it here
//! once at startup and fetch it where needed. Nothing in the crate requires a
//! registered session; every operation works on a `Session` value directly.
//!
//! ```
//! use persona::{Session, backend::InMemory, registry::SessionRegistry};
//!
//! let registry = SessionRegistry::new();
//! assert!(registry.current().is_none());
//!
//! let session = Session::builder().cache_backend(InMemory::new()).build()?;
//! let shared = registry.init(session);
//! shared.lock().unwrap().set("name", "Alice")?;
//!
//! let current = registry.require()?;
//! assert_eq!(current.lock().unwrap().get_or("name", serde_json::Value::Null), "Alice");
//!
//! registry.reset();
//! assert!(registry.require().is_err());
//! # Ok::<(), persona::Error>(())
//! ```

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, info};

use crate::{Result, Session, session::SessionError};

/// A session shared between threads.
pub type SharedSession = Arc<Mutex<Session>>;

/// Holds at most one current session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    current: RwLock<Option<SharedSession>>,
}

impl SessionRegistry {
    pub const fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Registers `session` as current, replacing any previous one.
    pub fn init(&self, session: Session) -> SharedSession {
        let shared = Arc::new(Mutex::new(session));
        self.set_shared(Arc::clone(&shared));
        shared
    }

    /// Registers an already shared session as current.
    pub fn set_shared(&self, shared: SharedSession) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(shared);
        if previous.is_some() {
            info!("Replaced current session");
        } else {
            info!("Registered current session");
        }
    }

    /// The current session, if one is registered.
    pub fn current(&self) -> Option<SharedSession> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current session.
    ///
    /// # Errors
    /// [`SessionError::NoCurrentSession`] if none is registered.
    pub fn require(&self) -> Result<SharedSession> {
        self.current()
            .ok_or_else(|| SessionError::NoCurrentSession.into())
    }

    /// Unregisters the current session and returns it.
    ///
    /// Other holders of the returned handle keep a working session.
    pub fn reset(&self) -> Option<SharedSession> {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!(had_session = previous.is_some(), "Registry reset");
        previous
    }

    pub fn is_initialized(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

static GLOBAL: SessionRegistry = SessionRegistry::new();

/// The process-wide registry.
pub fn global() -> &'static SessionRegistry {
    &GLOBAL
}
