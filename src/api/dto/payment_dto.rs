//! Payment-related DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::PaymentRecord;

/// Payment record representation returned by payment endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentResponse {
    /// Unique payment identifier.
    pub id: Uuid,
    /// Owning event.
    pub event_id: Uuid,
    /// Promoter this amount is owed to.
    pub promoter_name: String,
    /// Event name, copied for display.
    pub event_title: String,
    /// Event date, copied for display.
    pub date: NaiveDate,
    /// Parsed shift length in hours.
    pub hours: u32,
    /// Parsed hourly rate in rand.
    pub hourly_rate: u32,
    /// `hours × hourly_rate`.
    pub total_amount: u64,
    /// Whether the amount has been paid out.
    pub paid: bool,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            event_id: *record.event_id.as_uuid(),
            promoter_name: record.promoter_name,
            event_title: record.event_title,
            date: record.date,
            hours: record.hours,
            hourly_rate: record.hourly_rate,
            total_amount: record.total_amount,
            paid: record.paid,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Request body for `PATCH /payments/{id}/paid`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarkPaidRequest {
    /// New paid flag.
    pub paid: bool,
}
