//! Per-connection subscription manager.
//!
//! Tracks which event IDs a WebSocket client is subscribed to and
//! provides server-side change filtering.

use std::collections::HashSet;

use crate::domain::EventId;

/// Manages the set of event subscriptions for a single WebSocket
/// connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed event IDs. If `subscribe_all` is true, this set is ignored.
    event_ids: HashSet<EventId>,
    /// Whether the client subscribes to all events (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds event IDs to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, ids: &[EventId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for id in ids {
            self.event_ids.insert(*id);
        }
    }

    /// Removes event IDs from the subscription set.
    pub fn unsubscribe(&mut self, ids: &[EventId]) {
        for id in ids {
            self.event_ids.remove(id);
        }
    }

    /// Returns `true` if the given event ID matches the subscription filter.
    #[must_use]
    pub fn matches(&self, event_id: EventId) -> bool {
        self.subscribe_all || self.event_ids.contains(&event_id)
    }

    /// Returns the number of explicitly subscribed event IDs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.event_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(EventId::new()));
    }

    #[test]
    fn subscribe_specific_event() {
        let mut mgr = SubscriptionManager::new();
        let id = EventId::new();
        mgr.subscribe(&[id], false);
        assert!(mgr.matches(id));
        assert!(!mgr.matches(EventId::new()));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches(EventId::new()));
        assert!(mgr.matches(EventId::new()));
    }

    #[test]
    fn unsubscribe_removes_event() {
        let mut mgr = SubscriptionManager::new();
        let id = EventId::new();
        mgr.subscribe(&[id], false);
        assert!(mgr.matches(id));
        mgr.unsubscribe(&[id]);
        assert!(!mgr.matches(id));
    }

    #[test]
    fn count_tracks_explicit() {
        let mut mgr = SubscriptionManager::new();
        assert_eq!(mgr.count(), 0);
        mgr.subscribe(&[EventId::new(), EventId::new()], false);
        assert_eq!(mgr.count(), 2);
    }
}
