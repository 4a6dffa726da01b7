//!
//! Persona: session state for the currently authenticated actor.
//! This library keeps the logged-in actor's data in memory, mirrors it into a pluggable
//! cache backend, and notifies observers about the session's lifecycle.
//!
//! ## Core Concepts
//!
//! * **Sessions (`session::Session`)**: The state entity. Owns the actor document, the
//!   access-token field name, the cache key and the permission set, and exposes
//!   login/logout/get/set/update/can.
//! * **Documents (`doc::Doc`)**: Untyped JSON documents addressed by dot-separated paths
//!   such as `profile.address.city`.
//! * **Backends (`backend::CacheBackend`)**: A pluggable key-value store the session persists
//!   its document into. `InMemory` and `JsonFile` ship with the crate.
//! * **Events (`events::SessionEvents`)**: Typed boot/login/change/keyChange/logout
//!   notifications dispatched synchronously over an `events::EventBus`.
//! * **Registry (`registry::SessionRegistry`)**: An explicit slot for the process-wide
//!   "current" session with init/reset lifecycle.
//!
//! ## Example
//!
//! ```
//! use persona::{Session, backend::InMemory, doc::Doc};
//! use serde_json::json;
//!
//! let mut session = Session::builder()
//!     .cache_backend(InMemory::new())
//!     .enable_events(true)
//!     .build()?;
//!
//! let _subscription = session.events().on_login(|data, _session| {
//!     println!("logging in {:?}", data.get("name"));
//!     Ok(())
//! });
//!
//! session.login(Doc::try_from(json!({"accessToken": "T", "name": "Alice"}))?)?;
//! assert!(session.is_logged_in());
//! assert_eq!(session.get("name"), Some(&json!("Alice")));
//! # Ok::<(), persona::Error>(())
//! ```

pub mod backend;
pub mod constants;
pub mod doc;
pub mod events;
pub mod registry;
pub mod session;

/// Re-export the `Session` struct for easier access.
pub use session::{Session, SessionBuilder, SessionConfig};

/// Result type used throughout the Persona library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Persona library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured document errors from the doc module
    #[error(transparent)]
    Doc(doc::DocError),

    /// Structured cache backend errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured observer errors from the events module
    #[error(transparent)]
    Events(events::EventError),

    /// Structured session errors from the session module
    #[error(transparent)]
    Session(session::SessionError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Doc(_) => "doc",
            Error::Backend(_) => "backend",
            Error::Events(_) => "events",
            Error::Session(_) => "session",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Session(session_err) => session_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error comes from a misconfigured session.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Error::Session(session_err) => session_err.is_configuration_error(),
            _ => false,
        }
    }

    /// Check if this error was raised by the cache backend.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if this error indicates malformed document data.
    pub fn is_data_error(&self) -> bool {
        match self {
            Error::Doc(_) | Error::Serialize(_) => true,
            Error::Backend(backend_err) => backend_err.is_serialization_error(),
            Error::Session(session_err) => session_err.is_data_error(),
            _ => false,
        }
    }

    /// Check if this error was reported by an observer.
    pub fn is_observer_error(&self) -> bool {
        matches!(self, Error::Events(_))
    }
}
