//! In-process store backed by `RwLock`-protected maps.
//!
//! [`MemoryStore`] is the default backend: three `HashMap`s, one per
//! collection, each behind its own [`tokio::sync::RwLock`] so reads on
//! one collection never block writes on another. It is also what the
//! unit tests run the coordinator against.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use super::WorkStore;
use crate::domain::{
    Event, EventId, EventPatch, Message, MessageId, MessagePatch, NewEvent, NewMessage,
    NewPayment, PaymentId, PaymentPatch, PaymentRecord,
};
use crate::error::GatewayError;

/// In-process implementation of [`WorkStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<HashMap<EventId, Event>>,
    messages: RwLock<HashMap<MessageId, Message>>,
    payments: RwLock<HashMap<PaymentId, PaymentRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkStore for MemoryStore {
    async fn insert_event(&self, draft: NewEvent) -> Result<Event, GatewayError> {
        let now = Utc::now();
        let event = Event {
            id: EventId::new(),
            date: draft.date,
            promoters: draft.promoters,
            venue: draft.venue,
            location: draft.location,
            title: draft.title,
            arrival_time: draft.arrival_time,
            duration: draft.duration,
            rate: draft.rate,
            brands: draft.brands,
            mechanic: draft.mechanic,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        };
        let mut map = self.events.write().await;
        map.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: EventId, patch: EventPatch) -> Result<Event, GatewayError> {
        let mut map = self.events.write().await;
        let Some(event) = map.get_mut(&id) else {
            return Err(GatewayError::EventNotFound(*id.as_uuid()));
        };
        event.promoters = patch.promoters;
        event.venue = patch.venue;
        event.location = patch.location;
        event.title = patch.title;
        event.arrival_time = patch.arrival_time;
        event.duration = patch.duration;
        event.rate = patch.rate;
        event.brands = patch.brands;
        event.mechanic = patch.mechanic;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn delete_event(&self, id: EventId) -> Result<(), GatewayError> {
        let mut map = self.events.write().await;
        map.remove(&id)
            .map(|_| ())
            .ok_or(GatewayError::EventNotFound(*id.as_uuid()))
    }

    async fn get_event(&self, id: EventId) -> Result<Event, GatewayError> {
        let map = self.events.read().await;
        map.get(&id)
            .cloned()
            .ok_or(GatewayError::EventNotFound(*id.as_uuid()))
    }

    async fn list_events(&self) -> Result<Vec<Event>, GatewayError> {
        let map = self.events.read().await;
        let mut events: Vec<Event> = map.values().cloned().collect();
        events.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
        Ok(events)
    }

    async fn list_events_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, GatewayError> {
        let map = self.events.read().await;
        let mut events: Vec<Event> = map.values().filter(|e| e.date == date).cloned().collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn insert_message(&self, draft: NewMessage) -> Result<Message, GatewayError> {
        let mut map = self.messages.write().await;
        if map.values().any(|m| m.event_id == draft.event_id) {
            return Err(GatewayError::Storage(format!(
                "message for event {} already exists",
                draft.event_id
            )));
        }
        let now = Utc::now();
        let message = Message {
            id: MessageId::new(),
            event_id: draft.event_id,
            body: draft.body,
            date: draft.date,
            sent: draft.sent,
            created_at: now,
            updated_at: now,
        };
        map.insert(message.id, message.clone());
        Ok(message)
    }

    async fn update_message(
        &self,
        id: MessageId,
        patch: MessagePatch,
    ) -> Result<Message, GatewayError> {
        let mut map = self.messages.write().await;
        let Some(message) = map.get_mut(&id) else {
            return Err(GatewayError::MessageNotFound(*id.as_uuid()));
        };
        apply_message_patch(message, patch);
        Ok(message.clone())
    }

    async fn update_message_by_event(
        &self,
        event_id: EventId,
        patch: MessagePatch,
    ) -> Result<Message, GatewayError> {
        let mut map = self.messages.write().await;
        let Some(message) = map.values_mut().find(|m| m.event_id == event_id) else {
            return Err(GatewayError::MessageNotFound(*event_id.as_uuid()));
        };
        apply_message_patch(message, patch);
        Ok(message.clone())
    }

    async fn delete_messages_by_event(&self, event_id: EventId) -> Result<u64, GatewayError> {
        let mut map = self.messages.write().await;
        let before = map.len();
        map.retain(|_, m| m.event_id != event_id);
        Ok((before - map.len()) as u64)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, GatewayError> {
        let map = self.messages.read().await;
        let mut messages: Vec<Message> = map.values().cloned().collect();
        messages.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
        Ok(messages)
    }

    async fn insert_payments(
        &self,
        drafts: Vec<NewPayment>,
    ) -> Result<Vec<PaymentRecord>, GatewayError> {
        let now = Utc::now();
        let mut map = self.payments.write().await;
        let mut records = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let record = PaymentRecord {
                id: PaymentId::new(),
                event_id: draft.event_id,
                promoter_name: draft.promoter_name,
                event_title: draft.event_title,
                date: draft.date,
                hours: draft.hours,
                hourly_rate: draft.hourly_rate,
                total_amount: draft.total_amount,
                paid: draft.paid,
                created_at: now,
                updated_at: now,
            };
            map.insert(record.id, record.clone());
            records.push(record);
        }
        Ok(records)
    }

    async fn delete_payments_by_event(&self, event_id: EventId) -> Result<u64, GatewayError> {
        let mut map = self.payments.write().await;
        let before = map.len();
        map.retain(|_, p| p.event_id != event_id);
        Ok((before - map.len()) as u64)
    }

    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, GatewayError> {
        let map = self.payments.read().await;
        let mut payments: Vec<PaymentRecord> = map.values().cloned().collect();
        payments.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
        Ok(payments)
    }

    async fn update_payment(
        &self,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> Result<PaymentRecord, GatewayError> {
        let mut map = self.payments.write().await;
        let Some(payment) = map.get_mut(&id) else {
            return Err(GatewayError::PaymentNotFound(*id.as_uuid()));
        };
        if let Some(paid) = patch.paid {
            payment.paid = paid;
        }
        payment.updated_at = Utc::now();
        Ok(payment.clone())
    }
}

/// Applies the optional fields of a patch, bumping `updated_at`.
fn apply_message_patch(message: &mut Message, patch: MessagePatch) {
    if let Some(body) = patch.body {
        message.body = body;
    }
    if let Some(date) = patch.date {
        message.date = date;
    }
    if let Some(sent) = patch.sent {
        message.sent = sent;
    }
    message.updated_at = Utc::now();
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::sample_draft;
    use crate::domain::{compose_message, derive_payments};

    #[tokio::test]
    async fn insert_and_get_event() {
        let store = MemoryStore::new();
        let event = store.insert_event(sample_draft()).await.ok();
        let Some(event) = event else {
            panic!("insert failed");
        };

        let fetched = store.get_event(event.id).await;
        assert!(fetched.is_ok());
    }

    #[tokio::test]
    async fn get_nonexistent_event_returns_not_found() {
        let store = MemoryStore::new();
        let result = store.get_event(EventId::new()).await;
        assert!(matches!(result, Err(GatewayError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn update_event_replaces_descriptive_fields_only() {
        let store = MemoryStore::new();
        let event = store.insert_event(sample_draft()).await.ok();
        let Some(event) = event else {
            panic!("insert failed");
        };

        let patch = EventPatch {
            promoters: "Zanele".to_string(),
            venue: "Moses Mabhida".to_string(),
            location: event.location.clone(),
            title: event.title.clone(),
            arrival_time: event.arrival_time.clone(),
            duration: "(4 hours)".to_string(),
            rate: event.rate.clone(),
            brands: event.brands.clone(),
            mechanic: event.mechanic.clone(),
        };
        let updated = store.update_event(event.id, patch).await.ok();
        let Some(updated) = updated else {
            panic!("update failed");
        };

        assert_eq!(updated.id, event.id);
        assert_eq!(updated.date, event.date);
        assert_eq!(updated.created_by, event.created_by);
        assert_eq!(updated.promoters, "Zanele");
        assert_eq!(updated.venue, "Moses Mabhida");
        assert_eq!(updated.duration, "(4 hours)");
    }

    #[tokio::test]
    async fn list_events_by_date_filters() {
        let store = MemoryStore::new();
        let mut other_day = sample_draft();
        other_day.date = NaiveDate::from_ymd_opt(2024, 8, 18).unwrap_or_default();

        let first = store.insert_event(sample_draft()).await.ok();
        let _second = store.insert_event(other_day).await.ok();
        let Some(first) = first else {
            panic!("insert failed");
        };

        let on_day = store.list_events_by_date(first.date).await.ok();
        let Some(on_day) = on_day else {
            panic!("list failed");
        };
        assert_eq!(on_day.len(), 1);

        let all = store.list_events().await.ok();
        assert_eq!(all.map(|v| v.len()), Some(2));
    }

    #[tokio::test]
    async fn second_message_for_event_is_rejected() {
        let store = MemoryStore::new();
        let event = store.insert_event(sample_draft()).await.ok();
        let Some(event) = event else {
            panic!("insert failed");
        };

        let draft = NewMessage {
            event_id: event.id,
            body: compose_message(&event),
            date: event.date,
            sent: false,
        };
        assert!(store.insert_message(draft.clone()).await.is_ok());

        let result = store.insert_message(draft).await;
        assert!(matches!(result, Err(GatewayError::Storage(_))));
    }

    #[tokio::test]
    async fn update_message_by_event_keeps_identity_and_sent() {
        let store = MemoryStore::new();
        let event = store.insert_event(sample_draft()).await.ok();
        let Some(event) = event else {
            panic!("insert failed");
        };

        let inserted = store
            .insert_message(NewMessage {
                event_id: event.id,
                body: "original".to_string(),
                date: event.date,
                sent: false,
            })
            .await
            .ok();
        let Some(inserted) = inserted else {
            panic!("insert message failed");
        };

        let marked = store
            .update_message(
                inserted.id,
                MessagePatch {
                    sent: Some(true),
                    ..MessagePatch::default()
                },
            )
            .await
            .ok();
        assert_eq!(marked.map(|m| m.sent), Some(true));

        let regenerated = store
            .update_message_by_event(
                event.id,
                MessagePatch {
                    body: Some("regenerated".to_string()),
                    date: Some(event.date),
                    sent: None,
                },
            )
            .await
            .ok();
        let Some(regenerated) = regenerated else {
            panic!("regenerate failed");
        };

        assert_eq!(regenerated.id, inserted.id);
        assert_eq!(regenerated.body, "regenerated");
        assert!(regenerated.sent, "regeneration must not clear sent");
    }

    #[tokio::test]
    async fn payment_batch_round_trip_and_cascade() {
        let store = MemoryStore::new();
        let event = store.insert_event(sample_draft()).await.ok();
        let Some(event) = event else {
            panic!("insert failed");
        };

        let inserted = store.insert_payments(derive_payments(&event)).await.ok();
        assert_eq!(inserted.map(|v| v.len()), Some(2));

        let removed = store.delete_payments_by_event(event.id).await.ok();
        assert_eq!(removed, Some(2));

        let remaining = store.list_payments().await.ok();
        assert_eq!(remaining.map(|v| v.len()), Some(0));
    }

    #[tokio::test]
    async fn update_payment_toggles_paid() {
        let store = MemoryStore::new();
        let event = store.insert_event(sample_draft()).await.ok();
        let Some(event) = event else {
            panic!("insert failed");
        };

        let inserted = store.insert_payments(derive_payments(&event)).await.ok();
        let Some(first) = inserted.and_then(|v| v.into_iter().next()) else {
            panic!("no payments inserted");
        };

        let updated = store
            .update_payment(first.id, PaymentPatch { paid: Some(true) })
            .await
            .ok();
        assert_eq!(updated.map(|p| p.paid), Some(true));
    }

    #[tokio::test]
    async fn update_unknown_payment_returns_not_found() {
        let store = MemoryStore::new();
        let result = store
            .update_payment(PaymentId::new(), PaymentPatch { paid: Some(true) })
            .await;
        assert!(matches!(result, Err(GatewayError::PaymentNotFound(_))));
    }
}
