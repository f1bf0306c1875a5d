//! Broadcast channel for change events.
//!
//! [`ChangeFeed`] wraps a [`tokio::sync::broadcast`] channel. Every
//! successful mutation publishes a [`ChangeEvent`] through the feed, and
//! all WebSocket connections subscribe to receive filtered events.

use tokio::sync::broadcast;

use super::ChangeEvent;

/// Broadcast bus for [`ChangeEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity
/// (default 10 000). When the ring buffer is full, the oldest events are
/// dropped for lagging receivers.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    /// Creates a new `ChangeFeed` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a change to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, change: ChangeEvent) -> usize {
        self.sender.send(change).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future changes.
    ///
    /// Each WebSocket connection should call this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ids::EventId;
    use chrono::Utc;

    fn make_change(event_id: EventId) -> ChangeEvent {
        ChangeEvent::EventDeleted {
            event_id,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let feed = ChangeFeed::new(100);
        let count = feed.publish(make_change(EventId::new()));
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_change() {
        let feed = ChangeFeed::new(100);
        let mut rx = feed.subscribe();

        let id = EventId::new();
        feed.publish(make_change(id));

        let change = rx.recv().await;
        let Ok(change) = change else {
            panic!("expected to receive change");
        };
        assert_eq!(change.event_id(), id);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_change() {
        let feed = ChangeFeed::new(100);
        let mut rx1 = feed.subscribe();
        let mut rx2 = feed.subscribe();

        let id = EventId::new();
        let count = feed.publish(make_change(id));
        assert_eq!(count, 2);

        let c1 = rx1.recv().await;
        let c2 = rx2.recv().await;
        let Ok(c1) = c1 else {
            panic!("rx1 failed");
        };
        let Ok(c2) = c2 else {
            panic!("rx2 failed");
        };
        assert_eq!(c1.event_id(), c2.event_id());
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let feed = ChangeFeed::new(100);
        assert_eq!(feed.receiver_count(), 0);

        let _rx1 = feed.subscribe();
        assert_eq!(feed.receiver_count(), 1);

        let _rx2 = feed.subscribe();
        assert_eq!(feed.receiver_count(), 2);

        drop(_rx1);
        assert_eq!(feed.receiver_count(), 1);
    }
}
