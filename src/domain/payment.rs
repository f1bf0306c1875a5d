//! The payment record entity and its deriver.
//!
//! Each event fans out into one [`PaymentRecord`] per assigned promoter,
//! computed from the parsed shift hours and hourly rate. The full set for
//! an event is replaced wholesale whenever the event is written.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::ids::{EventId, PaymentId};
use super::parse::{parse_hours, parse_rate};

/// One owed/paid amount for one promoter on one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique identifier. Freshly generated on every derivation; record
    /// identity does not survive event edits.
    pub id: PaymentId,
    /// Owning event.
    pub event_id: EventId,
    /// Promoter this amount is owed to.
    pub promoter_name: String,
    /// Copy of the event name, kept for display independent of the
    /// event's lifetime.
    pub event_title: String,
    /// Copy of the event date.
    pub date: NaiveDate,
    /// Parsed shift length in hours.
    pub hours: u32,
    /// Parsed hourly rate in rand.
    pub hourly_rate: u32,
    /// `hours × hourly_rate`. Never independently editable.
    pub total_amount: u64,
    /// Whether the amount has been paid out. Toggled only by the explicit
    /// mark-paid action; regeneration resets it to `false`.
    pub paid: bool,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

/// Draft for payment insertion. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// Owning event.
    pub event_id: EventId,
    /// Promoter this amount is owed to.
    pub promoter_name: String,
    /// Copy of the event name.
    pub event_title: String,
    /// Copy of the event date.
    pub date: NaiveDate,
    /// Parsed shift length in hours.
    pub hours: u32,
    /// Parsed hourly rate in rand.
    pub hourly_rate: u32,
    /// `hours × hourly_rate`.
    pub total_amount: u64,
    /// Initial paid flag; `false` for freshly derived records.
    pub paid: bool,
}

/// Partial update of a payment row. Only the paid flag is editable;
/// amounts are derived, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentPatch {
    /// Replacement paid flag.
    pub paid: Option<bool>,
}

/// Derives the full payment set for an event.
///
/// Splits `promoters` on `'&'`, trims each name, and drops empties; one
/// record per remaining name, all sharing the hours/rate parsed from the
/// event's free-text fields. An empty or all-whitespace `promoters`
/// string yields an empty set — a valid degenerate outcome; validation of
/// the event itself happens at the coordinator boundary, not here.
#[must_use]
pub fn derive_payments(event: &Event) -> Vec<NewPayment> {
    let hours = parse_hours(&event.duration);
    let hourly_rate = parse_rate(&event.rate);
    let total_amount = u64::from(hours) * u64::from(hourly_rate);

    event
        .promoters
        .split('&')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| NewPayment {
            event_id: event.id,
            promoter_name: name.to_string(),
            event_title: event.title.clone(),
            date: event.date,
            hours,
            hourly_rate,
            total_amount,
            paid: false,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::{event_from_draft, sample_draft};

    #[test]
    fn one_record_per_promoter() {
        let event = event_from_draft(sample_draft());
        let payments = derive_payments(&event);

        assert_eq!(payments.len(), 2);
        let names: Vec<&str> = payments.iter().map(|p| p.promoter_name.as_str()).collect();
        assert_eq!(names, vec!["Jackie", "Noluthando"]);
    }

    #[test]
    fn amounts_come_from_parsed_fields() {
        let event = event_from_draft(sample_draft());
        for payment in derive_payments(&event) {
            assert_eq!(payment.hours, 6);
            assert_eq!(payment.hourly_rate, 100);
            assert_eq!(payment.total_amount, 600);
            assert!(!payment.paid);
            assert_eq!(payment.event_id, event.id);
            assert_eq!(payment.event_title, event.title);
            assert_eq!(payment.date, event.date);
        }
    }

    #[test]
    fn single_promoter_yields_one_record() {
        let mut draft = sample_draft();
        draft.promoters = "SoloWorker".to_string();
        let event = event_from_draft(draft);

        let payments = derive_payments(&event);
        assert_eq!(payments.len(), 1);
        assert_eq!(
            payments.first().map(|p| p.promoter_name.as_str()),
            Some("SoloWorker")
        );
    }

    #[test]
    fn blank_promoters_yield_nothing() {
        let mut draft = sample_draft();
        draft.promoters = "   ".to_string();
        let event = event_from_draft(draft);
        assert!(derive_payments(&event).is_empty());
    }

    #[test]
    fn empty_segments_are_dropped() {
        let mut draft = sample_draft();
        draft.promoters = "Jackie & & Noluthando &".to_string();
        let event = event_from_draft(draft);

        let names: Vec<String> = derive_payments(&event)
            .into_iter()
            .map(|p| p.promoter_name)
            .collect();
        assert_eq!(names, vec!["Jackie", "Noluthando"]);
    }

    #[test]
    fn garbled_fields_degrade_to_zero_amounts() {
        let mut draft = sample_draft();
        draft.duration = "all day".to_string();
        draft.rate = "negotiable".to_string();
        let event = event_from_draft(draft);

        let payments = derive_payments(&event);
        assert_eq!(payments.len(), 2);
        for payment in payments {
            assert_eq!(payment.hours, 0);
            assert_eq!(payment.hourly_rate, 0);
            assert_eq!(payment.total_amount, 0);
        }
    }
}
