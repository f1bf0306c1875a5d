//! Numeric extraction from human-authored duration and rate fields.
//!
//! Event drafts carry free-text `duration` ("15:00-21:00 (6 hours)") and
//! `rate` ("R100 per hour") fields. Payment derivation needs the numbers
//! inside them. Both extractors are total: any input that does not match
//! degrades to `0` so a garbled field yields a zero-value payment instead
//! of blocking event creation.

/// Extracts the shift length from a free-text duration field.
///
/// Matches the first integer followed by optional whitespace and the word
/// `hour`/`hours`, case-insensitive: `"15:00-21:00 (6 hours)"` → 6,
/// `"6 Hour shift"` → 6. Returns 0 when nothing matches. Digit runs that
/// would overflow saturate at `u32::MAX`.
#[must_use]
pub fn parse_hours(duration: &str) -> u32 {
    let lower = duration.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    for (pos, _) in lower.match_indices("hour") {
        let mut i = pos;
        while i > 0 && bytes.get(i - 1).is_some_and(u8::is_ascii_whitespace) {
            i -= 1;
        }
        let digits_end = i;
        while i > 0 && bytes.get(i - 1).is_some_and(u8::is_ascii_digit) {
            i -= 1;
        }
        if i < digits_end {
            if let Some(digits) = lower.get(i..digits_end) {
                return fold_digits(digits);
            }
        }
    }

    0
}

/// Extracts the hourly rate from a free-text rate field.
///
/// Matches the first run of ASCII digits, optionally preceded by the
/// currency letter `R`: `"R100 per hour"` → 100, `"100"` → 100. Returns 0
/// when the field contains no digits. Overflowing runs saturate.
#[must_use]
pub fn parse_rate(rate: &str) -> u32 {
    let digits: String = rate
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() { 0 } else { fold_digits(&digits) }
}

/// Parses a non-empty ASCII digit run, saturating instead of overflowing.
fn fold_digits(digits: &str) -> u32 {
    digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10)
            .saturating_add(u32::from(b.wrapping_sub(b'0')))
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn hours_from_parenthesized_range() {
        assert_eq!(parse_hours("15:00-21:00 (6 hours)"), 6);
    }

    #[test]
    fn hours_from_bare_phrase() {
        assert_eq!(parse_hours("6 hours"), 6);
        assert_eq!(parse_hours("(6 hours)"), 6);
        assert_eq!(parse_hours("6 hour shift"), 6);
    }

    #[test]
    fn hours_case_insensitive_and_tight() {
        assert_eq!(parse_hours("8 HOURS"), 8);
        assert_eq!(parse_hours("12hours"), 12);
    }

    #[test]
    fn hours_missing_defaults_to_zero() {
        assert_eq!(parse_hours(""), 0);
        assert_eq!(parse_hours("15:00-21:00"), 0);
        assert_eq!(parse_hours("all day"), 0);
        assert_eq!(parse_hours("hour"), 0);
    }

    #[test]
    fn hours_first_match_wins() {
        assert_eq!(parse_hours("4 hours, maybe 6 hours"), 4);
    }

    #[test]
    fn rate_with_currency_prefix() {
        assert_eq!(parse_rate("R100 per hour"), 100);
        assert_eq!(parse_rate("R85"), 85);
    }

    #[test]
    fn rate_bare_number() {
        assert_eq!(parse_rate("100"), 100);
    }

    #[test]
    fn rate_missing_defaults_to_zero() {
        assert_eq!(parse_rate(""), 0);
        assert_eq!(parse_rate("negotiable"), 0);
    }

    #[test]
    fn rate_first_run_only() {
        assert_eq!(parse_rate("R150-R200"), 150);
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(parse_rate("R99999999999999999999"), u32::MAX);
        assert_eq!(parse_hours("99999999999999999999 hours"), u32::MAX);
    }
}
