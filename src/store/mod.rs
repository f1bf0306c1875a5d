//! Storage layer: the repository contract and its two adapters.
//!
//! The coordinator is written once against the [`WorkStore`] trait and
//! never duplicated per backend. Two adapters exist: [`MemoryStore`], an
//! in-process store used as the default backend and by the unit tests,
//! and [`PgStore`], the hosted PostgreSQL variant.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Event, EventId, EventPatch, Message, MessageId, MessagePatch, NewEvent, NewMessage,
    NewPayment, PaymentId, PaymentPatch, PaymentRecord,
};
use crate::error::GatewayError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// CRUD access to the three persisted collections.
///
/// All operations are async and fallible: adapters surface missing rows
/// as the typed not-found errors and backend failures as
/// [`GatewayError::Storage`]. Nothing here retries; that is a caller
/// decision.
#[async_trait]
pub trait WorkStore: Send + Sync + std::fmt::Debug {
    /// Persists a new event, assigning its ID and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure.
    async fn insert_event(&self, draft: NewEvent) -> Result<Event, GatewayError>;

    /// Replaces an event's descriptive fields, leaving `id`, `date`, and
    /// `created_by` untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown ID, or
    /// [`GatewayError::Storage`] on backend failure.
    async fn update_event(&self, id: EventId, patch: EventPatch) -> Result<Event, GatewayError>;

    /// Removes an event row. Dependent rows are not touched; cascade
    /// ordering is the coordinator's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown ID, or
    /// [`GatewayError::Storage`] on backend failure.
    async fn delete_event(&self, id: EventId) -> Result<(), GatewayError>;

    /// Fetches one event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown ID, or
    /// [`GatewayError::Storage`] on backend failure.
    async fn get_event(&self, id: EventId) -> Result<Event, GatewayError>;

    /// Lists all events, ordered by date then creation time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure.
    async fn list_events(&self) -> Result<Vec<Event>, GatewayError>;

    /// Lists the events on one calendar day.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure.
    async fn list_events_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, GatewayError>;

    /// Persists a new message, assigning its ID and timestamps. At most
    /// one message may exist per event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure or when a
    /// message for the event already exists.
    async fn insert_message(&self, draft: NewMessage) -> Result<Message, GatewayError>;

    /// Applies a partial update to a message by its own ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MessageNotFound`] for an unknown ID, or
    /// [`GatewayError::Storage`] on backend failure.
    async fn update_message(
        &self,
        id: MessageId,
        patch: MessagePatch,
    ) -> Result<Message, GatewayError>;

    /// Applies a partial update to the message owned by an event,
    /// preserving the row's identity. This is how regeneration replaces
    /// the text without clearing `sent`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MessageNotFound`] when the event has no
    /// message, or [`GatewayError::Storage`] on backend failure.
    async fn update_message_by_event(
        &self,
        event_id: EventId,
        patch: MessagePatch,
    ) -> Result<Message, GatewayError>;

    /// Deletes every message owned by an event, returning the count.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure.
    async fn delete_messages_by_event(&self, event_id: EventId) -> Result<u64, GatewayError>;

    /// Lists all messages, ordered by date then creation time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure.
    async fn list_messages(&self) -> Result<Vec<Message>, GatewayError>;

    /// Persists a batch of payment records, assigning IDs and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure.
    async fn insert_payments(
        &self,
        drafts: Vec<NewPayment>,
    ) -> Result<Vec<PaymentRecord>, GatewayError>;

    /// Deletes every payment record owned by an event, returning the
    /// count.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure.
    async fn delete_payments_by_event(&self, event_id: EventId) -> Result<u64, GatewayError>;

    /// Lists all payment records, ordered by date then creation time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on backend failure.
    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, GatewayError>;

    /// Applies a partial update to a payment record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PaymentNotFound`] for an unknown ID, or
    /// [`GatewayError::Storage`] on backend failure.
    async fn update_payment(
        &self,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> Result<PaymentRecord, GatewayError>;
}
