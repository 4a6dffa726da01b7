//! Error types for event dispatch.
//!
//! Observer failures never abort a dispatch or the session operation that
//! triggered it. They are collected into a
//! [`DispatchReport`](super::DispatchReport) and logged.

use thiserror::Error;

/// Boxed error an observer may return.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Return type of every observer callback.
pub type ObserverResult = std::result::Result<(), ObserverError>;

/// Failures recorded while dispatching an event.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// An observer returned an error.
    #[error("Observer {subscription} on {topic} failed: {reason}")]
    ObserverFailed {
        topic: String,
        subscription: u64,
        reason: String,
    },

    /// An observer panicked; the panic was contained.
    #[error("Observer {subscription} on {topic} panicked: {message}")]
    ObserverPanicked {
        topic: String,
        subscription: u64,
        message: String,
    },
}

impl EventError {
    /// The topic the failing observer was registered on.
    pub fn topic(&self) -> &str {
        match self {
            EventError::ObserverFailed { topic, .. } | EventError::ObserverPanicked { topic, .. } => {
                topic
            }
        }
    }

    /// The id of the failing subscription.
    pub fn subscription(&self) -> u64 {
        match self {
            EventError::ObserverFailed { subscription, .. }
            | EventError::ObserverPanicked { subscription, .. } => *subscription,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, EventError::ObserverPanicked { .. })
    }
}

impl From<EventError> for crate::Error {
    fn from(err: EventError) -> Self {
        crate::Error::Events(err)
    }
}
