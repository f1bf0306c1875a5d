//! Event-related DTOs for create, update, get, and list operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Event, EventPatch, NewEvent};

/// Request body for `POST /events`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Calendar date of the gig (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Worker names joined by `"&"`. Required.
    pub promoters: String,
    /// Venue name. Required.
    pub venue: String,
    /// Street address or area description.
    #[serde(default)]
    pub location: String,
    /// Event name. Required.
    pub event: String,
    /// Free-text arrival time.
    #[serde(default)]
    pub arrival_time: String,
    /// Free-text shift description.
    #[serde(default)]
    pub duration: String,
    /// Free-text pay description.
    #[serde(default)]
    pub rate: String,
    /// Brands promoted at the event.
    #[serde(default)]
    pub brands: String,
    /// How the promotion runs on the ground.
    #[serde(default)]
    pub mechanic: String,
}

impl CreateEventRequest {
    /// Converts the request into a store draft authored by `created_by`.
    #[must_use]
    pub fn into_draft(self, created_by: String) -> NewEvent {
        NewEvent {
            date: self.date,
            promoters: self.promoters,
            venue: self.venue,
            location: self.location,
            title: self.event,
            arrival_time: self.arrival_time,
            duration: self.duration,
            rate: self.rate,
            brands: self.brands,
            mechanic: self.mechanic,
            created_by,
        }
    }
}

/// Request body for `PUT /events/{id}`: a full replacement of the
/// descriptive fields. The date stays fixed on edit.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// Worker names joined by `"&"`. Required.
    pub promoters: String,
    /// Venue name. Required.
    pub venue: String,
    /// Street address or area description.
    #[serde(default)]
    pub location: String,
    /// Event name. Required.
    pub event: String,
    /// Free-text arrival time.
    #[serde(default)]
    pub arrival_time: String,
    /// Free-text shift description.
    #[serde(default)]
    pub duration: String,
    /// Free-text pay description.
    #[serde(default)]
    pub rate: String,
    /// Brands promoted at the event.
    #[serde(default)]
    pub brands: String,
    /// How the promotion runs on the ground.
    #[serde(default)]
    pub mechanic: String,
}

impl UpdateEventRequest {
    /// Converts the request into a store patch.
    #[must_use]
    pub fn into_patch(self) -> EventPatch {
        EventPatch {
            promoters: self.promoters,
            venue: self.venue,
            location: self.location,
            title: self.event,
            arrival_time: self.arrival_time,
            duration: self.duration,
            rate: self.rate,
            brands: self.brands,
            mechanic: self.mechanic,
        }
    }
}

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    /// Restrict the listing to one calendar day (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Event representation returned by every event endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventResponse {
    /// Unique event identifier.
    pub id: Uuid,
    /// Calendar date of the gig.
    pub date: NaiveDate,
    /// Worker names joined by `"&"`.
    pub promoters: String,
    /// Venue name.
    pub venue: String,
    /// Street address or area description.
    pub location: String,
    /// Event name.
    pub event: String,
    /// Free-text arrival time.
    pub arrival_time: String,
    /// Free-text shift description.
    pub duration: String,
    /// Free-text pay description.
    pub rate: String,
    /// Brands promoted at the event.
    pub brands: String,
    /// How the promotion runs on the ground.
    pub mechanic: String,
    /// Identifier of the authoring manager.
    pub created_by: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: *event.id.as_uuid(),
            date: event.date,
            promoters: event.promoters,
            venue: event.venue,
            location: event.location,
            event: event.title,
            arrival_time: event.arrival_time,
            duration: event.duration,
            rate: event.rate,
            brands: event.brands,
            mechanic: event.mechanic,
            created_by: event.created_by,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}
