//! PostgreSQL implementation of the store, using `sqlx::PgPool`.
//!
//! This is the hosted-backend variant: several app installations share
//! one database, so concurrent writers are possible and the
//! delete-then-insert payment replacement is last-writer-wins (see the
//! coordinator). Schema lives in `migrations/` and is applied on
//! connect.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::WorkStore;
use crate::config::GatewayConfig;
use crate::domain::{
    Event, EventId, EventPatch, Message, MessageId, MessagePatch, NewEvent, NewMessage,
    NewPayment, PaymentId, PaymentPatch, PaymentRecord,
};
use crate::error::GatewayError;

const EVENT_COLUMNS: &str = "id, date, promoters, venue, location, event, arrival_time, \
                             duration, rate, brands, mechanic, created_by, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, event_id, message, date, sent, created_at, updated_at";
const PAYMENT_COLUMNS: &str = "id, event_id, promoter_name, event_title, date, hours, \
                               hourly_rate, total_amount, paid, created_at, updated_at";

/// PostgreSQL-backed implementation of [`WorkStore`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to PostgreSQL with the configured pool sizing and runs
    /// the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] if the connection or a
    /// migration fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wraps an existing connection pool (migrations are the caller's
    /// concern).
    #[must_use]
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a sqlx error, turning `RowNotFound` into the given typed error.
fn map_sqlx(error: sqlx::Error, not_found: GatewayError) -> GatewayError {
    if matches!(error, sqlx::Error::RowNotFound) {
        not_found
    } else {
        GatewayError::Storage(error.to_string())
    }
}

/// Maps a sqlx error where no row lookup is involved.
fn storage(error: sqlx::Error) -> GatewayError {
    GatewayError::Storage(error.to_string())
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    date: NaiveDate,
    promoters: String,
    venue: String,
    location: String,
    event: String,
    arrival_time: String,
    duration: String,
    rate: String,
    brands: String,
    mechanic: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from_uuid(row.id),
            date: row.date,
            promoters: row.promoters,
            venue: row.venue,
            location: row.location,
            title: row.event,
            arrival_time: row.arrival_time,
            duration: row.duration,
            rate: row.rate,
            brands: row.brands,
            mechanic: row.mechanic,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    event_id: Uuid,
    message: String,
    date: NaiveDate,
    sent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: MessageId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            body: row.message,
            date: row.date,
            sent: row.sent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    event_id: Uuid,
    promoter_name: String,
    event_title: String,
    date: NaiveDate,
    hours: i64,
    hourly_rate: i64,
    total_amount: i64,
    paid: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = GatewayError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let out_of_range = |column: &str, id: Uuid| {
            GatewayError::Storage(format!("payments.{column} out of range for row {id}"))
        };
        let hours = u32::try_from(row.hours).map_err(|_| out_of_range("hours", row.id))?;
        let hourly_rate =
            u32::try_from(row.hourly_rate).map_err(|_| out_of_range("hourly_rate", row.id))?;
        let total_amount =
            u64::try_from(row.total_amount).map_err(|_| out_of_range("total_amount", row.id))?;
        Ok(Self {
            id: PaymentId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            promoter_name: row.promoter_name,
            event_title: row.event_title,
            date: row.date,
            hours,
            hourly_rate,
            total_amount,
            paid: row.paid,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl WorkStore for PgStore {
    async fn insert_event(&self, draft: NewEvent) -> Result<Event, GatewayError> {
        let sql = format!(
            "INSERT INTO events (id, date, promoters, venue, location, event, arrival_time, \
             duration, rate, brands, mechanic, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.date)
            .bind(&draft.promoters)
            .bind(&draft.venue)
            .bind(&draft.location)
            .bind(&draft.title)
            .bind(&draft.arrival_time)
            .bind(&draft.duration)
            .bind(&draft.rate)
            .bind(&draft.brands)
            .bind(&draft.mechanic)
            .bind(&draft.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.into())
    }

    async fn update_event(&self, id: EventId, patch: EventPatch) -> Result<Event, GatewayError> {
        let sql = format!(
            "UPDATE events SET promoters = $2, venue = $3, location = $4, event = $5, \
             arrival_time = $6, duration = $7, rate = $8, brands = $9, mechanic = $10, \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(*id.as_uuid())
            .bind(&patch.promoters)
            .bind(&patch.venue)
            .bind(&patch.location)
            .bind(&patch.title)
            .bind(&patch.arrival_time)
            .bind(&patch.duration)
            .bind(&patch.rate)
            .bind(&patch.brands)
            .bind(&patch.mechanic)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx(e, GatewayError::EventNotFound(*id.as_uuid())))?;
        Ok(row.into())
    }

    async fn delete_event(&self, id: EventId) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        if result.rows_affected() == 0 {
            return Err(GatewayError::EventNotFound(*id.as_uuid()));
        }
        Ok(())
    }

    async fn get_event(&self, id: EventId) -> Result<Event, GatewayError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx(e, GatewayError::EventNotFound(*id.as_uuid())))?;
        Ok(row.into())
    }

    async fn list_events(&self) -> Result<Vec<Event>, GatewayError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date, created_at");
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_events_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, GatewayError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE date = $1 ORDER BY created_at");
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn insert_message(&self, draft: NewMessage) -> Result<Message, GatewayError> {
        let sql = format!(
            "INSERT INTO messages (id, event_id, message, date, sent) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {MESSAGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(*draft.event_id.as_uuid())
            .bind(&draft.body)
            .bind(draft.date)
            .bind(draft.sent)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.into())
    }

    async fn update_message(
        &self,
        id: MessageId,
        patch: MessagePatch,
    ) -> Result<Message, GatewayError> {
        let sql = format!(
            "UPDATE messages SET message = COALESCE($2, message), date = COALESCE($3, date), \
             sent = COALESCE($4, sent), updated_at = now() \
             WHERE id = $1 \
             RETURNING {MESSAGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(*id.as_uuid())
            .bind(patch.body)
            .bind(patch.date)
            .bind(patch.sent)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx(e, GatewayError::MessageNotFound(*id.as_uuid())))?;
        Ok(row.into())
    }

    async fn update_message_by_event(
        &self,
        event_id: EventId,
        patch: MessagePatch,
    ) -> Result<Message, GatewayError> {
        let sql = format!(
            "UPDATE messages SET message = COALESCE($2, message), date = COALESCE($3, date), \
             sent = COALESCE($4, sent), updated_at = now() \
             WHERE event_id = $1 \
             RETURNING {MESSAGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(*event_id.as_uuid())
            .bind(patch.body)
            .bind(patch.date)
            .bind(patch.sent)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx(e, GatewayError::MessageNotFound(*event_id.as_uuid())))?;
        Ok(row.into())
    }

    async fn delete_messages_by_event(&self, event_id: EventId) -> Result<u64, GatewayError> {
        let result = sqlx::query("DELETE FROM messages WHERE event_id = $1")
            .bind(*event_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected())
    }

    async fn list_messages(&self) -> Result<Vec<Message>, GatewayError> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY date, created_at");
        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn insert_payments(
        &self,
        drafts: Vec<NewPayment>,
    ) -> Result<Vec<PaymentRecord>, GatewayError> {
        let sql = format!(
            "INSERT INTO payments (id, event_id, promoter_name, event_title, date, hours, \
             hourly_rate, total_amount, paid) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PAYMENT_COLUMNS}"
        );

        // One transaction per batch so a replacement set lands whole.
        let mut tx = self.pool.begin().await.map_err(storage)?;
        let mut records = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let row = sqlx::query_as::<_, PaymentRow>(&sql)
                .bind(Uuid::new_v4())
                .bind(*draft.event_id.as_uuid())
                .bind(&draft.promoter_name)
                .bind(&draft.event_title)
                .bind(draft.date)
                .bind(i64::from(draft.hours))
                .bind(i64::from(draft.hourly_rate))
                .bind(i64::try_from(draft.total_amount).unwrap_or(i64::MAX))
                .bind(draft.paid)
                .fetch_one(&mut *tx)
                .await
                .map_err(storage)?;
            records.push(PaymentRecord::try_from(row)?);
        }
        tx.commit().await.map_err(storage)?;
        Ok(records)
    }

    async fn delete_payments_by_event(&self, event_id: EventId) -> Result<u64, GatewayError> {
        let result = sqlx::query("DELETE FROM payments WHERE event_id = $1")
            .bind(*event_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected())
    }

    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, GatewayError> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY date, created_at");
        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.into_iter().map(PaymentRecord::try_from).collect()
    }

    async fn update_payment(
        &self,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> Result<PaymentRecord, GatewayError> {
        let sql = format!(
            "UPDATE payments SET paid = COALESCE($2, paid), updated_at = now() \
             WHERE id = $1 \
             RETURNING {PAYMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(*id.as_uuid())
            .bind(patch.paid)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx(e, GatewayError::PaymentNotFound(*id.as_uuid())))?;
        row.try_into()
    }
}
