//! Month arithmetic and per-day occupancy maps for the admin calendar.
//!
//! Maps are keyed by `YYYY-MM-D` (day without zero padding) and hold either
//! a reservation id, a restriction row id, or `0` for a free day.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::CoreError;
use crate::types::{Date, DbId};

/// Key format for calendar day maps, e.g. `2025-03-5`.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%-d";

/// Day -> id (0 when the day is free).
pub type DayMap = BTreeMap<String, DbId>;

/// Render a date as a calendar day key.
pub fn day_key(date: Date) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a calendar day key back into a date.
///
/// Accepts both padded (`2025-03-05`) and unpadded (`2025-03-5`) days.
pub fn parse_day_key(key: &str) -> Result<Date, CoreError> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid calendar day '{key}'")))
}

// ---------------------------------------------------------------------------
// MonthView
// ---------------------------------------------------------------------------

/// The closed interval `[first_of_month, last_of_month]` for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: Date,
    last: Date,
}

impl MonthView {
    /// Month for an explicit year and 1-based month number.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month}")))?;
        Ok(Self::starting(first))
    }

    /// Month containing `date`.
    pub fn containing(date: Date) -> Self {
        // Day 1 always exists.
        Self::starting(date.with_day(1).unwrap_or(date))
    }

    fn starting(first: Date) -> Self {
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .unwrap_or(first);
        Self { first, last }
    }

    pub fn first(&self) -> Date {
        self.first
    }

    pub fn last(&self) -> Date {
        self.last
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn days_in_month(&self) -> u32 {
        self.last.day()
    }

    /// Previous month, computed from the first of this month.
    pub fn previous(&self) -> Self {
        match self.first.checked_sub_months(Months::new(1)) {
            Some(first) => Self::starting(first),
            None => *self,
        }
    }

    /// Next month, computed from the first of this month so that short
    /// months are never skipped.
    pub fn next(&self) -> Self {
        match self.first.checked_add_months(Months::new(1)) {
            Some(first) => Self::starting(first),
            None => *self,
        }
    }

    /// Every day from the first through the last of the month.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let last = self.last;
        self.first.iter_days().take_while(move |d| *d <= last)
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.first && date <= self.last
    }
}

// ---------------------------------------------------------------------------
// Restriction maps
// ---------------------------------------------------------------------------

/// The parts of a restriction row the calendar needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarRestriction {
    /// Restriction row id.
    pub id: DbId,
    /// Set for booking-originated restrictions, `None` for owner blocks.
    pub reservation_id: Option<DbId>,
    pub start_date: Date,
    pub end_date: Date,
}

/// Per-day reservation and block maps for one room and one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomMonthMaps {
    pub reservation_map: DayMap,
    pub block_map: DayMap,
}

impl RoomMonthMaps {
    /// Build both maps for `month` from the restrictions overlapping it.
    ///
    /// Every day of the month starts at 0. A reservation marks each night of
    /// its `[start, end)` span that falls inside the month; a block marks only
    /// its start day with the restriction row id.
    pub fn build<I>(month: &MonthView, restrictions: I) -> Self
    where
        I: IntoIterator<Item = CalendarRestriction>,
    {
        let mut maps = Self::default();
        for day in month.days() {
            maps.reservation_map.insert(day_key(day), 0);
            maps.block_map.insert(day_key(day), 0);
        }

        for r in restrictions {
            match r.reservation_id {
                Some(reservation_id) if reservation_id > 0 => {
                    let mut day = r.start_date.max(month.first());
                    while day < r.end_date && day <= month.last() {
                        maps.reservation_map.insert(day_key(day), reservation_id);
                        match day.succ_opt() {
                            Some(next) => day = next,
                            None => break,
                        }
                    }
                }
                _ => {
                    if month.contains(r.start_date) {
                        maps.block_map.insert(day_key(r.start_date), r.id);
                    }
                }
            }
        }

        maps
    }

    /// Restriction ids of every blocked day, keyed by day.
    pub fn blocked_days(&self) -> impl Iterator<Item = (&String, DbId)> {
        self.block_map
            .iter()
            .filter(|(_, id)| **id > 0)
            .map(|(day, id)| (day, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn day_keys_are_unpadded() {
        assert_eq!(day_key(d(2025, 3, 5)), "2025-03-5");
        assert_eq!(day_key(d(2025, 3, 15)), "2025-03-15");
        assert_eq!(parse_day_key("2025-03-5").unwrap(), d(2025, 3, 5));
        assert_eq!(parse_day_key("2025-03-05").unwrap(), d(2025, 3, 5));
        assert!(parse_day_key("yesterday").is_err());
    }

    #[test]
    fn month_bounds() {
        let feb = MonthView::new(2024, 2).unwrap();
        assert_eq!(feb.first(), d(2024, 2, 1));
        assert_eq!(feb.last(), d(2024, 2, 29));
        assert_eq!(feb.days_in_month(), 29);
        assert_eq!(feb.days().count(), 29);
        assert!(MonthView::new(2024, 13).is_err());
    }

    #[test]
    fn navigation_never_skips_short_months() {
        let jan = MonthView::containing(d(2025, 1, 30));
        assert_eq!(jan.next().first(), d(2025, 2, 1));
        assert_eq!(jan.previous().first(), d(2024, 12, 1));
        assert_eq!(jan.next().next().month(), 3);
    }

    #[test]
    fn every_day_starts_free() {
        let month = MonthView::new(2025, 3).unwrap();
        let maps = RoomMonthMaps::build(&month, Vec::new());
        assert_eq!(maps.reservation_map.len(), 31);
        assert_eq!(maps.block_map.len(), 31);
        assert!(maps.reservation_map.values().all(|v| *v == 0));
        assert_eq!(maps.blocked_days().count(), 0);
    }

    #[test]
    fn reservations_fill_their_nights_and_blocks_mark_start_day() {
        let month = MonthView::new(2025, 3).unwrap();
        let restrictions = vec![
            CalendarRestriction {
                id: 10,
                reservation_id: Some(7),
                start_date: d(2025, 3, 10),
                end_date: d(2025, 3, 13),
            },
            CalendarRestriction {
                id: 11,
                reservation_id: None,
                start_date: d(2025, 3, 5),
                end_date: d(2025, 3, 6),
            },
        ];
        let maps = RoomMonthMaps::build(&month, restrictions);

        assert_eq!(maps.reservation_map["2025-03-10"], 7);
        assert_eq!(maps.reservation_map["2025-03-11"], 7);
        assert_eq!(maps.reservation_map["2025-03-12"], 7);
        // Checkout day stays free.
        assert_eq!(maps.reservation_map["2025-03-13"], 0);

        assert_eq!(maps.block_map["2025-03-5"], 11);
        assert_eq!(maps.block_map["2025-03-6"], 0);
        assert_eq!(maps.blocked_days().collect::<Vec<_>>(), vec![(&"2025-03-5".to_string(), 11)]);
    }

    #[test]
    fn spans_crossing_month_edges_are_clamped() {
        let month = MonthView::new(2025, 3).unwrap();
        let restrictions = vec![CalendarRestriction {
            id: 1,
            reservation_id: Some(3),
            start_date: d(2025, 2, 27),
            end_date: d(2025, 3, 2),
        }];
        let maps = RoomMonthMaps::build(&month, restrictions);
        assert_eq!(maps.reservation_map.len(), 31);
        assert_eq!(maps.reservation_map["2025-03-1"], 3);
        assert_eq!(maps.reservation_map["2025-03-2"], 0);
        assert!(!maps.reservation_map.contains_key("2025-02-27"));
    }
}
