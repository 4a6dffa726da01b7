//! Event tags, topics and payloads.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{constants::TOPIC_SEPARATOR, doc::Doc};

/// The five session lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTag {
    /// The session hydrated its document from the backend.
    Boot,
    /// `login` was called, before the payload is applied.
    Login,
    /// `update` replaced the document.
    Change,
    /// A single key changed, via `set` or for each top-level key in `update`.
    KeyChange,
    /// The session was cleared.
    Logout,
}

impl EventTag {
    /// Every tag, in lifecycle order.
    pub const ALL: [EventTag; 5] = [
        EventTag::Boot,
        EventTag::Login,
        EventTag::Change,
        EventTag::KeyChange,
        EventTag::Logout,
    ];

    /// Name used as the last component of a topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTag::Boot => "boot",
            EventTag::Login => "login",
            EventTag::Change => "change",
            EventTag::KeyChange => "keyChange",
            EventTag::Logout => "logout",
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown tag name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event tag: {0}")]
pub struct UnknownEventTag(pub String);

impl FromStr for EventTag {
    type Err = UnknownEventTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownEventTag(s.to_string()))
    }
}

/// One (namespace, tag) pair on an [`EventBus`](super::EventBus).
///
/// Renders as `<namespace>.<tag>`, e.g. `user.keyChange`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    namespace: Arc<str>,
    tag: EventTag,
}

impl Topic {
    pub fn new(namespace: impl Into<Arc<str>>, tag: EventTag) -> Self {
        Self {
            namespace: namespace.into(),
            tag,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn tag(&self) -> EventTag {
        self.tag
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{TOPIC_SEPARATOR}{}", self.namespace, self.tag)
    }
}

/// Payload delivered to observers, borrowed from the triggering session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent<'a> {
    Boot {
        data: &'a Doc,
    },
    Login {
        /// The raw payload passed to `login`.
        data: &'a Doc,
    },
    Change {
        new_data: &'a Doc,
        old_data: &'a Doc,
    },
    KeyChange {
        key: &'a str,
        new_value: &'a Value,
        /// `null` when the key was absent.
        old_value: &'a Value,
    },
    Logout,
}

impl SessionEvent<'_> {
    pub fn tag(&self) -> EventTag {
        match self {
            SessionEvent::Boot { .. } => EventTag::Boot,
            SessionEvent::Login { .. } => EventTag::Login,
            SessionEvent::Change { .. } => EventTag::Change,
            SessionEvent::KeyChange { .. } => EventTag::KeyChange,
            SessionEvent::Logout => EventTag::Logout,
        }
    }
}
