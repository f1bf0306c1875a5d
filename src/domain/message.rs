//! The confirmation message entity and its composer.
//!
//! Every event owns exactly one [`Message`]: the formatted confirmation
//! text sent to the promoters working the gig. The composer is a pure
//! function of the event, so regenerating after an edit always produces
//! the same text for the same content.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::ids::{EventId, MessageId};

/// One generated confirmation text, one-to-one with its event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// Owning event.
    pub event_id: EventId,
    /// Full formatted confirmation text.
    pub body: String,
    /// Copied from the event; used for sort and display.
    pub date: NaiveDate,
    /// Whether the text has been sent out. Set only by the explicit
    /// mark-sent action; regeneration preserves it.
    pub sent: bool,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

/// Draft for message insertion. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Owning event.
    pub event_id: EventId,
    /// Full formatted confirmation text.
    pub body: String,
    /// Copied from the event.
    pub date: NaiveDate,
    /// Initial sent flag; `false` for freshly generated messages.
    pub sent: bool,
}

/// Partial update of a message row. `None` fields are left untouched,
/// which is how regeneration replaces the text without clearing `sent`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    /// Replacement text.
    pub body: Option<String>,
    /// Replacement display date.
    pub date: Option<NaiveDate>,
    /// Replacement sent flag.
    pub sent: Option<bool>,
}

/// Fixed boilerplate appended after the per-event fields.
const CALL_TIME_AND_CONDUCT: &str = "\
1 hour prior arrival is the call time and failure to arrive for call time will result to penalties.

Dress code: plain white top, blue denim jeans and white sneakers.

Grooming: Please ensure that you have light makeup no heavy eyeshadows please ensure that your hair neat straightened or tied neatly.

NB: Taking pictures of consumers with the products is essential

• A minimum of 15 pictures is needed.

• Please always ensure that your phone is fully charged and also bring a power bank or a charger.

How the promotion will work:

Ensure that your work station at all times is clean and presentable. There is a display showing stock and / or giveaways. Engage with each and every consumer in a professional and brand appropriate fashion. Convince consumers that our products are the ultimate brand of choice.";

/// Renders the confirmation text for an event.
///
/// Deterministic: the same event content always produces byte-identical
/// output, which is what makes regeneration on edit idempotent.
#[must_use]
pub fn compose_message(event: &Event) -> String {
    format!(
        "Good afternoon Miss ☀ Confirmation of work for Olive Mind Marketing\n\
         \n\
         Promoters: {promoters}\n\
         Venue: {venue}\n\
         Location: {location}\n\
         Event: {title}\n\
         Date: {date}\n\
         Arrival Time: {arrival_time}\n\
         Duration: {duration}\n\
         Rate: {rate}\n\
         Brands: {brands}\n\
         \n\
         Mechanic: {mechanic}\n\
         \n\
         {boilerplate}",
        promoters = event.promoters,
        venue = event.venue,
        location = event.location,
        title = event.title,
        date = format_long_date(event.date),
        arrival_time = event.arrival_time,
        duration = event.duration,
        rate = event.rate,
        brands = event.brands,
        mechanic = event.mechanic,
        boilerplate = CALL_TIME_AND_CONDUCT,
    )
}

/// Formats a date the way the confirmation text shows it: long form,
/// en-ZA field order, e.g. `"Saturday, 17 August 2024"`.
#[must_use]
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::{event_from_draft, sample_draft};

    #[test]
    fn long_date_is_weekday_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 17).unwrap_or_default();
        assert_eq!(format_long_date(date), "Saturday, 17 August 2024");
    }

    #[test]
    fn long_date_has_no_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap_or_default();
        assert_eq!(format_long_date(date), "Monday, 3 March 2025");
    }

    #[test]
    fn composed_message_carries_every_field() {
        let event = event_from_draft(sample_draft());
        let body = compose_message(&event);

        assert!(body.starts_with(
            "Good afternoon Miss ☀ Confirmation of work for Olive Mind Marketing"
        ));
        assert!(body.contains("Promoters: Jackie & Noluthando"));
        assert!(body.contains("Venue: King's Park Stadium"));
        assert!(body.contains("Location: Jacko Jackson Dr, Stamford Hill, Durban, 4025"));
        assert!(body.contains("Event: Springboks vs Argentina"));
        assert!(body.contains("Date: Saturday, 17 August 2024"));
        assert!(body.contains("Arrival Time: 14:00"));
        assert!(body.contains("Duration: 15:00-21:00 (6 hours)"));
        assert!(body.contains("Rate: R100 per hour"));
        assert!(body.contains("Brands: Klipdrift"));
        assert!(body.contains("Mechanic: Hosting guests in the Heineken and Klipdrift Suite."));
        assert!(body.contains("Dress code: plain white top"));
        assert!(body.contains("A minimum of 15 pictures is needed."));
        assert!(body.ends_with("the ultimate brand of choice."));
    }

    #[test]
    fn composition_is_deterministic() {
        let event = event_from_draft(sample_draft());
        assert_eq!(compose_message(&event), compose_message(&event));
    }

    #[test]
    fn different_content_changes_the_text() {
        let event = event_from_draft(sample_draft());
        let mut edited = event.clone();
        edited.duration = "(4 hours)".to_string();
        assert_ne!(compose_message(&event), compose_message(&edited));
    }
}
