//! Stay dates and the half-open overlap rule.
//!
//! A stay `[start, end)` occupies every night from `start` up to but not
//! including `end`: a guest checking out on the 15th does not collide with a
//! guest checking in on the 15th.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::Date;

/// Wire format for dates in forms, query strings, and JSON (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date submitted by a guest or admin.
pub fn parse_date(value: &str) -> Result<Date, CoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| CoreError::Validation(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

/// Format a date in the wire format.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Half-open interval intersection: `a.start < b.end AND a.end > b.start`.
pub fn overlaps(a_start: Date, a_end: Date, b_start: Date, b_end: Date) -> bool {
    a_start < b_end && a_end > b_start
}

/// A validated stay: `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    start: Date,
    end: Date,
}

impl StayDates {
    /// Build a stay, rejecting empty (`start == end`) and inverted ranges.
    pub fn new(start: Date, end: Date) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::Validation(
                "Departure must be at least one day after arrival".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse both dates from their wire form and validate the range.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Number of nights in the stay.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether this stay collides with an existing `[start, end)` restriction.
    pub fn overlaps(&self, start: Date, end: Date) -> bool {
        overlaps(self.start, self.end, start, end)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn d(s: &str) -> Date {
        parse_date(s).unwrap()
    }

    #[test]
    fn parses_wire_dates() {
        assert_eq!(d("2025-01-10"), NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(format_date(d("2025-01-02")), "2025-01-02");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_matches!(parse_date("01/10/2025"), Err(CoreError::Validation(_)));
        assert_matches!(parse_date(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_and_inverted_stays_are_rejected() {
        assert_matches!(
            StayDates::new(d("2025-01-10"), d("2025-01-10")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            StayDates::parse("2025-01-11", "2025-01-10"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn overlap_is_half_open() {
        let (s, e) = (d("2025-01-10"), d("2025-01-15"));

        let inside = StayDates::parse("2025-01-12", "2025-01-13").unwrap();
        assert!(inside.overlaps(s, e));

        let checkout_day = StayDates::parse("2025-01-15", "2025-01-16").unwrap();
        assert!(!checkout_day.overlaps(s, e));

        let ends_on_checkin = StayDates::parse("2025-01-08", "2025-01-10").unwrap();
        assert!(!ends_on_checkin.overlaps(s, e));

        let spanning = StayDates::parse("2025-01-01", "2025-02-01").unwrap();
        assert!(spanning.overlaps(s, e));
    }

    #[test]
    fn counts_nights() {
        let stay = StayDates::parse("2025-02-01", "2025-02-03").unwrap();
        assert_eq!(stay.nights(), 2);
    }
}
