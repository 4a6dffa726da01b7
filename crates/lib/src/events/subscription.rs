//! Cancellable observer handles.

use std::sync::Weak;

use tracing::debug;

use super::{Topic, bus::BusInner};

/// Handle for one observer on one topic.
///
/// Dropping the handle does not cancel the observer; call [`Subscription::cancel`].
/// A cancelled observer is not called by any dispatch that starts afterwards.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    topic: Topic,
    bus: Weak<BusInner>,
}

impl Subscription {
    pub(crate) fn new(id: u64, topic: Topic, bus: Weak<BusInner>) -> Self {
        Self { id, topic, bus }
    }

    /// A handle that is not attached to any bus, returned when events are disabled.
    pub(crate) fn inert(topic: Topic) -> Self {
        Self {
            id: 0,
            topic,
            bus: Weak::new(),
        }
    }

    /// Bus-unique id of this observer; `0` for inert handles.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Returns `true` while the observer is registered on a live bus.
    pub fn is_active(&self) -> bool {
        self.bus
            .upgrade()
            .is_some_and(|bus| bus.contains(&self.topic, self.id))
    }

    /// Removes the observer from its bus.
    ///
    /// The observer receives no events from triggers that start after this
    /// call. A dispatch already in progress still delivers its event.
    ///
    /// Returns `true` if this call removed it; `false` if it was already
    /// cancelled, the bus is gone, or the handle is inert.
    pub fn cancel(&self) -> bool {
        let removed = self
            .bus
            .upgrade()
            .is_some_and(|bus| bus.remove(&self.topic, self.id));
        if removed {
            debug!(topic = %self.topic, subscription = self.id, "Observer cancelled");
        }
        removed
    }
}
