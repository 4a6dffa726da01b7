//! Session lifecycle notifications.
//!
//! A [`SessionEvents`] notifier scopes the five lifecycle events of one session
//! under a namespace (the session's cache key unless configured otherwise) on
//! an [`EventBus`]:
//!
//! | Event       | Fired by                                   | Observer receives                  |
//! |-------------|--------------------------------------------|------------------------------------|
//! | `boot`      | construction and every `boot()`            | document, session                  |
//! | `login`     | `login()`, before the payload is applied   | raw payload, session               |
//! | `change`    | `update()` (and therefore `login()`)       | new document, old document, session|
//! | `keyChange` | `set()` on change, `update()` for each key | key, new value, old value, session |
//! | `logout`    | `logout()`                                 | session                            |
//!
//! Observers return an [`ObserverResult`]; failures are isolated per observer
//! and reported, never propagated into the session operation.
//!
//! When a session is built with events disabled it still owns a notifier, a
//! silent one: triggers do nothing and subscriptions are inert.

mod bus;
mod errors;
mod subscription;
mod types;

pub use bus::{DispatchReport, EventBus, Listener};
pub use errors::{EventError, ObserverError, ObserverResult};
pub use subscription::Subscription;
pub use types::{EventTag, SessionEvent, Topic, UnknownEventTag};

use serde_json::Value;
use tracing::debug;

use crate::{
    Session,
    doc::{Doc, PathBuf},
};

#[derive(Debug, Clone)]
enum Dispatch {
    Bus(EventBus),
    Silent,
}

/// Per-session notifier: typed subscribe and trigger operations for the five
/// lifecycle events, scoped under one namespace.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    name: String,
    dispatch: Dispatch,
}

impl SessionEvents {
    /// Creates a notifier for namespace `name` on `bus`.
    ///
    /// Observers can subscribe here before the session they watch is built, as
    /// long as the session is given the same bus and namespace.
    pub fn new(name: impl Into<String>, bus: EventBus) -> Self {
        Self {
            name: name.into(),
            dispatch: Dispatch::Bus(bus),
        }
    }

    /// Creates a notifier that drops every event.
    pub fn silent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dispatch: Dispatch::Silent,
        }
    }

    /// The namespace topics are scoped under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `false` for silent notifiers.
    pub fn is_enabled(&self) -> bool {
        matches!(self.dispatch, Dispatch::Bus(_))
    }

    /// The bus this notifier dispatches on, if any.
    pub fn bus(&self) -> Option<&EventBus> {
        match &self.dispatch {
            Dispatch::Bus(bus) => Some(bus),
            Dispatch::Silent => None,
        }
    }

    /// The topic for `tag` in this notifier's namespace.
    pub fn topic(&self, tag: EventTag) -> Topic {
        Topic::new(self.name.as_str(), tag)
    }

    fn subscribe<F>(&self, tag: EventTag, listener: F) -> Subscription
    where
        F: Fn(&SessionEvent<'_>, &Session) -> ObserverResult + Send + Sync + 'static,
    {
        let topic = self.topic(tag);
        match &self.dispatch {
            Dispatch::Bus(bus) => bus.subscribe(topic, listener),
            Dispatch::Silent => {
                debug!(topic = %topic, "Events disabled; subscription is inert");
                Subscription::inert(topic)
            }
        }
    }

    fn trigger(&self, event: SessionEvent<'_>, session: &Session) -> DispatchReport {
        let topic = self.topic(event.tag());
        match &self.dispatch {
            Dispatch::Bus(bus) => bus.trigger(&topic, &event, session),
            Dispatch::Silent => DispatchReport::new(topic),
        }
    }

    // === Subscribe ===

    /// Observes boot: `(document, session)`.
    pub fn on_boot<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Doc, &Session) -> ObserverResult + Send + Sync + 'static,
    {
        self.subscribe(EventTag::Boot, move |event, session| match event {
            SessionEvent::Boot { data } => callback(data, session),
            _ => Ok(()),
        })
    }

    /// Observes login: `(raw payload, session)`.
    pub fn on_login<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Doc, &Session) -> ObserverResult + Send + Sync + 'static,
    {
        self.subscribe(EventTag::Login, move |event, session| match event {
            SessionEvent::Login { data } => callback(data, session),
            _ => Ok(()),
        })
    }

    /// Observes logout: `(session)`.
    pub fn on_logout<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Session) -> ObserverResult + Send + Sync + 'static,
    {
        self.subscribe(EventTag::Logout, move |event, session| match event {
            SessionEvent::Logout => callback(session),
            _ => Ok(()),
        })
    }

    /// Observes document replacement: `(new document, old document, session)`.
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Doc, &Doc, &Session) -> ObserverResult + Send + Sync + 'static,
    {
        self.subscribe(EventTag::Change, move |event, session| match event {
            SessionEvent::Change { new_data, old_data } => callback(new_data, old_data, session),
            _ => Ok(()),
        })
    }

    /// Observes key changes: `(key, new value, old value, session)`.
    pub fn on_key_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&str, &Value, &Value, &Session) -> ObserverResult + Send + Sync + 'static,
    {
        self.subscribe(EventTag::KeyChange, move |event, session| match event {
            SessionEvent::KeyChange {
                key,
                new_value,
                old_value,
            } => callback(key, new_value, old_value, session),
            _ => Ok(()),
        })
    }

    /// Observes changes of one key only: `(new value, old value, session)`.
    ///
    /// Keys are compared as normalized paths, so `".profile.name"` and
    /// `"profile.name"` name the same key. During `update` the compared key is
    /// the top-level key.
    pub fn on_key_change_of<F>(&self, key: impl AsRef<str>, callback: F) -> Subscription
    where
        F: Fn(&Value, &Value, &Session) -> ObserverResult + Send + Sync + 'static,
    {
        let watched = PathBuf::from(key.as_ref());
        self.on_key_change(move |key, new_value, old_value, session| {
            if PathBuf::from(key) == watched {
                callback(new_value, old_value, session)
            } else {
                Ok(())
            }
        })
    }

    // === Trigger ===

    pub fn trigger_boot(&self, data: &Doc, session: &Session) -> DispatchReport {
        self.trigger(SessionEvent::Boot { data }, session)
    }

    pub fn trigger_login(&self, data: &Doc, session: &Session) -> DispatchReport {
        self.trigger(SessionEvent::Login { data }, session)
    }

    pub fn trigger_logout(&self, session: &Session) -> DispatchReport {
        self.trigger(SessionEvent::Logout, session)
    }

    pub fn trigger_change(
        &self,
        new_data: &Doc,
        old_data: &Doc,
        session: &Session,
    ) -> DispatchReport {
        self.trigger(SessionEvent::Change { new_data, old_data }, session)
    }

    pub fn trigger_key_change(
        &self,
        key: &str,
        new_value: &Value,
        old_value: &Value,
        session: &Session,
    ) -> DispatchReport {
        self.trigger(
            SessionEvent::KeyChange {
                key,
                new_value,
                old_value,
            },
            session,
        )
    }
}
