//! Synchronous in-process event bus.
//!
//! [`EventBus`] is a typed observer table keyed by [`Topic`]. Triggering a topic
//! calls every observer registered on it, in registration order, on the calling
//! thread, before `trigger` returns.
//!
//! The bus is cheap to clone; clones share the same table. Sessions that share a
//! bus and a namespace see each other's events.

use std::{
    collections::HashMap,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::{debug, trace, warn};

use super::{EventError, ObserverResult, SessionEvent, Subscription, Topic};
use crate::Session;

/// An observer as stored on the bus.
pub type Listener = Arc<dyn Fn(&SessionEvent<'_>, &Session) -> ObserverResult + Send + Sync>;

struct Registered {
    id: u64,
    listener: Listener,
}

#[derive(Default)]
pub(crate) struct BusInner {
    topics: RwLock<HashMap<Topic, Vec<Registered>>>,
    next_id: AtomicU64,
    dispatched: AtomicU64,
}

impl BusInner {
    // Observers run outside the lock, so a poisoned table is still consistent.
    fn topics(&self) -> RwLockReadGuard<'_, HashMap<Topic, Vec<Registered>>> {
        self.topics.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn topics_mut(&self) -> RwLockWriteGuard<'_, HashMap<Topic, Vec<Registered>>> {
        self.topics.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn contains(&self, topic: &Topic, id: u64) -> bool {
        self.topics()
            .get(topic)
            .is_some_and(|registered| registered.iter().any(|r| r.id == id))
    }

    /// Returns `true` if the observer was registered.
    pub(crate) fn remove(&self, topic: &Topic, id: u64) -> bool {
        let mut topics = self.topics_mut();
        let Some(registered) = topics.get_mut(topic) else {
            return false;
        };
        let before = registered.len();
        registered.retain(|r| r.id != id);
        let removed = registered.len() != before;
        if registered.is_empty() {
            topics.remove(topic);
        }
        removed
    }
}

/// Shared observer table for session events.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Creates a new bus with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` on `topic`.
    ///
    /// The returned [`Subscription`] cancels the registration. Dropping it
    /// leaves the observer registered.
    pub fn subscribe<F>(&self, topic: Topic, listener: F) -> Subscription
    where
        F: Fn(&SessionEvent<'_>, &Session) -> ObserverResult + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner
            .topics_mut()
            .entry(topic.clone())
            .or_default()
            .push(Registered {
                id,
                listener: Arc::new(listener),
            });
        debug!(topic = %topic, subscription = id, "Observer subscribed");
        Subscription::new(id, topic, Arc::downgrade(&self.inner))
    }

    /// Calls every observer registered on `topic` with `event`.
    ///
    /// The observer list is captured when dispatch starts. An observer
    /// cancelled while this dispatch is running, even before its turn, still
    /// receives this event; it receives no events from later triggers.
    /// Observers added during the dispatch are first called by the next
    /// trigger. A failing or panicking observer is recorded in the report and
    /// the remaining observers still run.
    pub fn trigger(
        &self,
        topic: &Topic,
        event: &SessionEvent<'_>,
        session: &Session,
    ) -> DispatchReport {
        let listeners: Vec<(u64, Listener)> = self
            .inner
            .topics()
            .get(topic)
            .map(|registered| {
                registered
                    .iter()
                    .map(|r| (r.id, Arc::clone(&r.listener)))
                    .collect()
            })
            .unwrap_or_default();
        self.inner.dispatched.fetch_add(1, Ordering::Relaxed);

        let mut report = DispatchReport::new(topic.clone());
        for (id, listener) in listeners {
            report.invoked += 1;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(event, session)));
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => EventError::ObserverFailed {
                    topic: topic.to_string(),
                    subscription: id,
                    reason: e.to_string(),
                },
                Err(payload) => EventError::ObserverPanicked {
                    topic: topic.to_string(),
                    subscription: id,
                    message: panic_message(payload.as_ref()),
                },
            };
            warn!(error = %failure, "Observer failed; continuing dispatch");
            report.failures.push(failure);
        }
        trace!(topic = %topic, invoked = report.invoked, "Event dispatched");
        report
    }

    /// Number of observers currently registered on `topic`.
    pub fn listener_count(&self, topic: &Topic) -> usize {
        self.inner.topics().get(topic).map_or(0, Vec::len)
    }

    /// Total number of `trigger` calls on this bus and its clones.
    pub fn dispatched(&self) -> u64 {
        self.inner.dispatched.load(Ordering::Relaxed)
    }

    /// Returns `true` if both handles share the same observer table.
    pub fn same_bus(&self, other: &EventBus) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.inner.topics().len())
            .field("dispatched", &self.dispatched())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Outcome of one [`EventBus::trigger`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    topic: Topic,
    invoked: usize,
    failures: Vec<EventError>,
}

impl DispatchReport {
    pub(crate) fn new(topic: Topic) -> Self {
        Self {
            topic,
            invoked: 0,
            failures: Vec::new(),
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Number of observers called.
    pub fn invoked(&self) -> usize {
        self.invoked
    }

    /// Number of observers that returned `Ok`.
    pub fn delivered(&self) -> usize {
        self.invoked - self.failures.len()
    }

    pub fn failures(&self) -> &[EventError] {
        &self.failures
    }

    /// Returns `true` if no observer failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts the first failure into an error, for callers that want to fail loudly.
    pub fn into_result(self) -> crate::Result<usize> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.into()),
            None => Ok(self.invoked),
        }
    }
}
