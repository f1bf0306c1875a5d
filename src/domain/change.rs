//! Change events reflecting store mutations.
//!
//! Every successful coordinator mutation publishes a [`ChangeEvent`]
//! through the [`super::ChangeFeed`]. Events are broadcast to WebSocket
//! subscribers, standing in for the hosted database's realtime push.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::ids::{EventId, MessageId, PaymentId};

/// Change event emitted after every successful mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "change_type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A new event was created along with its message and payment set.
    EventCreated {
        /// Event identifier.
        event_id: EventId,
        /// Calendar date of the event.
        date: NaiveDate,
        /// Event name.
        title: String,
        /// Publication timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An event was edited; its message was regenerated and its payment
    /// set replaced. Subscribers may transiently observe zero payments
    /// for the event between the replace's delete and insert.
    EventUpdated {
        /// Event identifier.
        event_id: EventId,
        /// Calendar date of the event.
        date: NaiveDate,
        /// Event name after the edit.
        title: String,
        /// Publication timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An event and all its dependents were deleted.
    EventDeleted {
        /// Event identifier.
        event_id: EventId,
        /// Publication timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A payment record's paid flag was toggled.
    PaymentMarked {
        /// Payment record identifier.
        payment_id: PaymentId,
        /// Owning event.
        event_id: EventId,
        /// New paid flag.
        paid: bool,
        /// Publication timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A message's sent flag was toggled.
    MessageMarked {
        /// Message identifier.
        message_id: MessageId,
        /// Owning event.
        event_id: EventId,
        /// New sent flag.
        sent: bool,
        /// Publication timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ChangeEvent {
    /// Returns the event ID this change concerns, which is what
    /// WebSocket subscriptions filter on.
    #[must_use]
    pub fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::EventUpdated { event_id, .. }
            | Self::EventDeleted { event_id, .. }
            | Self::PaymentMarked { event_id, .. }
            | Self::MessageMarked { event_id, .. } => *event_id,
        }
    }

    /// Returns the change type as a static string slice.
    #[must_use]
    pub const fn change_type_str(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "event_created",
            Self::EventUpdated { .. } => "event_updated",
            Self::EventDeleted { .. } => "event_deleted",
            Self::PaymentMarked { .. } => "payment_marked",
            Self::MessageMarked { .. } => "message_marked",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn event_created_change_type() {
        let change = ChangeEvent::EventCreated {
            event_id: EventId::new(),
            date: NaiveDate::from_ymd_opt(2024, 8, 17).unwrap_or_default(),
            title: "Springboks vs Argentina".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(change.change_type_str(), "event_created");
    }

    #[test]
    fn payment_marked_serializes() {
        let change = ChangeEvent::PaymentMarked {
            payment_id: PaymentId::new(),
            event_id: EventId::new(),
            paid: true,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&change);
        assert!(json.is_ok());
        let json_str = json.unwrap_or_default();
        assert!(json_str.contains("payment_marked"));
        assert!(json_str.contains("\"paid\":true"));
    }

    #[test]
    fn event_id_accessor() {
        let id = EventId::new();
        let change = ChangeEvent::EventDeleted {
            event_id: id,
            timestamp: Utc::now(),
        };
        assert_eq!(change.event_id(), id);
    }
}
