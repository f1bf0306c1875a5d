//! Event lifecycle coordinator: the event → message → payment pipeline.
//!
//! Every event write flows through here. The coordinator validates the
//! draft, persists the event, derives and persists the dependent message
//! and payment rows, and publishes a change event — keeping the three
//! collections consistent whichever store backend is configured.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{
    ChangeEvent, ChangeFeed, Event, EventId, EventPatch, Message, MessageId, MessagePatch,
    NewEvent, NewMessage, PaymentId, PaymentPatch, PaymentRecord, Session, compose_message,
    derive_payments,
};
use crate::error::GatewayError;
use crate::store::WorkStore;

/// Orchestration layer for the event lifecycle.
///
/// Stateless coordinator: owns a handle to the [`WorkStore`] for
/// persistence and the [`ChangeFeed`] for push notification. Every
/// mutation follows the pattern: role check → validate → persist event →
/// derive and persist dependents → publish change → return result.
///
/// # Consistency
///
/// - An event insert completes (and yields its ID) before any dependent
///   insert starts; message and payment inserts then run concurrently.
/// - An event update patches the message in place (identity and `sent`
///   preserved) and replaces the payment set wholesale (delete then
///   insert; `paid` flags reset — observed legacy behavior, kept).
/// - A delete removes dependents before the event row, so a shared
///   backend never shows an event whose dependents are already gone
///   while claiming the reverse.
/// - With concurrent writers, payment replacement is last-writer-wins;
///   subscribers may transiently see zero payments for an event mid
///   replacement.
#[derive(Debug, Clone)]
pub struct EventCoordinator {
    store: Arc<dyn WorkStore>,
    feed: ChangeFeed,
}

impl EventCoordinator {
    /// Creates a new coordinator over the given store and feed.
    #[must_use]
    pub fn new(store: Arc<dyn WorkStore>, feed: ChangeFeed) -> Self {
        Self { store, feed }
    }

    /// Returns a reference to the inner [`ChangeFeed`].
    #[must_use]
    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Creates an event together with its confirmation message and
    /// payment set.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Forbidden`] for non-managers and
    /// [`GatewayError::Validation`] for incomplete drafts, both before
    /// anything is persisted. [`GatewayError::Storage`] if the event
    /// insert itself fails. [`GatewayError::PartialFailure`] if the
    /// event was persisted but a dependent insert failed; the recovery
    /// path is [`Self::regenerate_dependents`].
    pub async fn create_event(
        &self,
        session: &Session,
        draft: NewEvent,
    ) -> Result<Event, GatewayError> {
        require_manager(session, "create event")?;
        draft.validate()?;

        let event = self.store.insert_event(draft).await?;

        let message = NewMessage {
            event_id: event.id,
            body: compose_message(&event),
            date: event.date,
            sent: false,
        };
        let payments = derive_payments(&event);

        // The two dependents do not depend on each other.
        tokio::try_join!(
            self.store.insert_message(message),
            self.store.insert_payments(payments),
        )
        .map_err(|e| partial_failure(event.id, &e))?;

        tracing::info!(event_id = %event.id, date = %event.date, "event created");
        let _ = self.feed.publish(ChangeEvent::EventCreated {
            event_id: event.id,
            date: event.date,
            title: event.title.clone(),
            timestamp: Utc::now(),
        });

        Ok(event)
    }

    /// Replaces an event's descriptive fields and regenerates both
    /// dependents from the new content.
    ///
    /// Idempotent: applying the same patch twice leaves the message text
    /// identical and the payment set content-identical (ids are fresh).
    ///
    /// # Errors
    ///
    /// [`GatewayError::Forbidden`] / [`GatewayError::Validation`] before
    /// anything is persisted, [`GatewayError::EventNotFound`] for an
    /// unknown ID, and [`GatewayError::PartialFailure`] if the event row
    /// was updated but regeneration failed.
    pub async fn update_event(
        &self,
        session: &Session,
        id: EventId,
        patch: EventPatch,
    ) -> Result<Event, GatewayError> {
        require_manager(session, "update event")?;
        patch.validate()?;

        let event = self.store.update_event(id, patch).await?;

        let regenerate = async {
            // Patch the message in place: same row, same sent flag.
            self.store
                .update_message_by_event(
                    event.id,
                    MessagePatch {
                        body: Some(compose_message(&event)),
                        date: Some(event.date),
                        sent: None,
                    },
                )
                .await?;

            // Replace the payment set wholesale. Resets paid flags.
            self.store.delete_payments_by_event(event.id).await?;
            self.store
                .insert_payments(derive_payments(&event))
                .await?;
            Ok::<(), GatewayError>(())
        };
        regenerate
            .await
            .map_err(|e| partial_failure(event.id, &e))?;

        tracing::info!(event_id = %event.id, "event updated, dependents regenerated");
        let _ = self.feed.publish(ChangeEvent::EventUpdated {
            event_id: event.id,
            date: event.date,
            title: event.title.clone(),
            timestamp: Utc::now(),
        });

        Ok(event)
    }

    /// Deletes an event and everything derived from it.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Forbidden`] for non-managers,
    /// [`GatewayError::EventNotFound`] for an unknown ID,
    /// [`GatewayError::Storage`] on backend failure.
    pub async fn delete_event(&self, session: &Session, id: EventId) -> Result<(), GatewayError> {
        require_manager(session, "delete event")?;

        // Dependents first: a reader must never find dependents whose
        // event is already gone.
        self.store.delete_messages_by_event(id).await?;
        self.store.delete_payments_by_event(id).await?;
        self.store.delete_event(id).await?;

        tracing::info!(event_id = %id, "event deleted with dependents");
        let _ = self.feed.publish(ChangeEvent::EventDeleted {
            event_id: id,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Rebuilds an event's message and payment set from its current
    /// content. The designated recovery action after a partial failure;
    /// safe to repeat.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Forbidden`] for non-managers,
    /// [`GatewayError::EventNotFound`] for an unknown ID,
    /// [`GatewayError::PartialFailure`] if rebuilding failed midway.
    pub async fn regenerate_dependents(
        &self,
        session: &Session,
        id: EventId,
    ) -> Result<Event, GatewayError> {
        require_manager(session, "regenerate dependents")?;

        let event = self.store.get_event(id).await?;

        let rebuild = async {
            self.store.delete_messages_by_event(event.id).await?;
            self.store.delete_payments_by_event(event.id).await?;

            let message = NewMessage {
                event_id: event.id,
                body: compose_message(&event),
                date: event.date,
                sent: false,
            };
            tokio::try_join!(
                self.store.insert_message(message),
                self.store.insert_payments(derive_payments(&event)),
            )?;
            Ok::<(), GatewayError>(())
        };
        rebuild.await.map_err(|e| partial_failure(event.id, &e))?;

        tracing::info!(event_id = %event.id, "dependents regenerated");
        let _ = self.feed.publish(ChangeEvent::EventUpdated {
            event_id: event.id,
            date: event.date,
            title: event.title.clone(),
            timestamp: Utc::now(),
        });

        Ok(event)
    }

    /// Toggles a payment record's paid flag. Independent of the event
    /// lifecycle.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Forbidden`] for non-managers,
    /// [`GatewayError::PaymentNotFound`] for an unknown ID.
    pub async fn mark_payment_paid(
        &self,
        session: &Session,
        id: PaymentId,
        paid: bool,
    ) -> Result<PaymentRecord, GatewayError> {
        require_manager(session, "mark payment paid")?;

        let record = self
            .store
            .update_payment(id, PaymentPatch { paid: Some(paid) })
            .await?;

        tracing::info!(payment_id = %record.id, paid, "payment marked");
        let _ = self.feed.publish(ChangeEvent::PaymentMarked {
            payment_id: record.id,
            event_id: record.event_id,
            paid,
            timestamp: Utc::now(),
        });

        Ok(record)
    }

    /// Toggles a message's sent flag. Independent of the event
    /// lifecycle; callers that treat share/copy as sending call this
    /// themselves.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Forbidden`] for non-managers,
    /// [`GatewayError::MessageNotFound`] for an unknown ID.
    pub async fn mark_message_sent(
        &self,
        session: &Session,
        id: MessageId,
        sent: bool,
    ) -> Result<Message, GatewayError> {
        require_manager(session, "mark message sent")?;

        let message = self
            .store
            .update_message(
                id,
                MessagePatch {
                    sent: Some(sent),
                    ..MessagePatch::default()
                },
            )
            .await?;

        tracing::info!(message_id = %message.id, sent, "message marked");
        let _ = self.feed.publish(ChangeEvent::MessageMarked {
            message_id: message.id,
            event_id: message.event_id,
            sent,
            timestamp: Utc::now(),
        });

        Ok(message)
    }

    /// Fetches one event.
    ///
    /// # Errors
    ///
    /// [`GatewayError::EventNotFound`] for an unknown ID.
    pub async fn get_event(&self, id: EventId) -> Result<Event, GatewayError> {
        self.store.get_event(id).await
    }

    /// Lists all events.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Storage`] on backend failure.
    pub async fn list_events(&self) -> Result<Vec<Event>, GatewayError> {
        self.store.list_events().await
    }

    /// Lists the events on one calendar day.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Storage`] on backend failure.
    pub async fn list_events_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, GatewayError> {
        self.store.list_events_by_date(date).await
    }

    /// Lists all messages.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Storage`] on backend failure.
    pub async fn list_messages(&self) -> Result<Vec<Message>, GatewayError> {
        self.store.list_messages().await
    }

    /// Lists all payment records.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Storage`] on backend failure.
    pub async fn list_payments(&self) -> Result<Vec<PaymentRecord>, GatewayError> {
        self.store.list_payments().await
    }
}

/// Rejects non-manager sessions before anything touches the store.
fn require_manager(session: &Session, action: &str) -> Result<(), GatewayError> {
    if session.role.is_manager() {
        Ok(())
    } else {
        Err(GatewayError::Forbidden(action.to_string()))
    }
}

/// Wraps a dependent-write error so callers can tell "event saved,
/// dependents missing" apart from a plain storage failure.
fn partial_failure(event_id: EventId, error: &GatewayError) -> GatewayError {
    GatewayError::PartialFailure {
        event_id: *event_id.as_uuid(),
        detail: error.to_string(),
    }
}
