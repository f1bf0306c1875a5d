//! Message-related DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Message;

/// Confirmation message representation returned by message endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Unique message identifier.
    pub id: Uuid,
    /// Owning event.
    pub event_id: Uuid,
    /// Full formatted confirmation text.
    pub message: String,
    /// Display date copied from the event.
    pub date: NaiveDate,
    /// Whether the text has been sent out.
    pub sent: bool,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: *message.id.as_uuid(),
            event_id: *message.event_id.as_uuid(),
            message: message.body,
            date: message.date,
            sent: message.sent,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

/// Request body for `PATCH /messages/{id}/sent`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarkSentRequest {
    /// New sent flag.
    pub sent: bool,
}
