//! Domain layer: entities, derivation pipeline, and change system.
//!
//! This module contains the server-side domain model: entity identity,
//! the event/message/payment records, the pure derivation functions
//! (parsers, composer, payment deriver), the caller session, and the
//! change feed that broadcasts state mutations.

pub mod change;
pub mod change_feed;
pub mod event;
pub mod ids;
pub mod message;
pub mod parse;
pub mod payment;
pub mod session;

pub use change::ChangeEvent;
pub use change_feed::ChangeFeed;
pub use event::{Event, EventPatch, NewEvent};
pub use ids::{EventId, MessageId, PaymentId};
pub use message::{Message, MessagePatch, NewMessage, compose_message};
pub use payment::{NewPayment, PaymentPatch, PaymentRecord, derive_payments};
pub use session::{Role, Session};
