//! The calendar event entity and its write shapes.
//!
//! An [`Event`] is one promotional work assignment. Its descriptive
//! fields are copied verbatim into the derived confirmation message, and
//! its `promoters`/`duration`/`rate` fields feed payment derivation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::EventId;
use crate::error::GatewayError;

/// One promotional work assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier, assigned at creation and immutable.
    pub id: EventId,
    /// Calendar date of the gig; the partition key for "events on a day".
    /// Immutable after creation.
    pub date: NaiveDate,
    /// Assigned worker names joined by `"&"`, e.g. `"Jackie & Noluthando"`.
    /// The single source of truth for who works the event.
    pub promoters: String,
    /// Venue name, e.g. `"King's Park Stadium"`.
    pub venue: String,
    /// Street address or area description.
    pub location: String,
    /// Event name, e.g. `"Springboks vs Argentina"`.
    pub title: String,
    /// Free-text arrival time, e.g. `"14:00"`.
    pub arrival_time: String,
    /// Free-text shift description, may embed an hour count,
    /// e.g. `"15:00-21:00 (6 hours)"`.
    pub duration: String,
    /// Free-text pay description, may embed an hourly amount,
    /// e.g. `"R100 per hour"`.
    pub rate: String,
    /// Brands promoted at the event.
    pub brands: String,
    /// How the promotion runs on the ground.
    pub mechanic: String,
    /// Identifier of the authoring manager. Immutable.
    pub created_by: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

/// Draft for event creation. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Calendar date of the gig.
    pub date: NaiveDate,
    /// Assigned worker names joined by `"&"`. Required.
    pub promoters: String,
    /// Venue name. Required.
    pub venue: String,
    /// Street address or area description.
    pub location: String,
    /// Event name. Required.
    pub title: String,
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
}

impl NewEvent {
    /// Checks that the required fields are present before anything is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] naming every blank required
    /// field (`promoters`, `venue`, `title`).
    pub fn validate(&self) -> Result<(), GatewayError> {
        required_fields(&self.promoters, &self.venue, &self.title)
    }
}

/// Full replacement of an event's descriptive fields.
///
/// `id`, `date`, and `created_by` are never part of a patch; an edit
/// keeps the event pinned to its day and author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPatch {
    /// Assigned worker names joined by `"&"`. Required.
    pub promoters: String,
    /// Venue name. Required.
    pub venue: String,
    /// Street address or area description.
    pub location: String,
    /// Event name. Required.
    pub title: String,
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
}

impl EventPatch {
    /// Checks that the required fields are present before anything is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] naming every blank required
    /// field (`promoters`, `venue`, `title`).
    pub fn validate(&self) -> Result<(), GatewayError> {
        required_fields(&self.promoters, &self.venue, &self.title)
    }
}

/// Shared required-field check for drafts and patches.
fn required_fields(promoters: &str, venue: &str, title: &str) -> Result<(), GatewayError> {
    let mut missing = Vec::new();
    if promoters.trim().is_empty() {
        missing.push("promoters");
    }
    if venue.trim().is_empty() {
        missing.push("venue");
    }
    if title.trim().is_empty() {
        missing.push("event");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}
