//! Integer-comparable calendar day encoding.
//!
//! Scraped sailing calendars are date-only: comparing rows as strings or as
//! full datetimes invites month/year boundary bugs. A [`DayKey`] packs
//! (year, month, day) into one integer so that numeric order is exactly
//! chronological order.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar date encoded as `year * 10000 + month * 100 + day`.
///
/// The inner i32 is private; construction goes through [`DayKey::new`] or
/// [`DayKey::from_date`]. For any two dates A and B, `key(A) < key(B)` iff
/// A chronologically precedes B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayKey(i32);

impl DayKey {
    /// Encode a (year, month, day) triple.
    ///
    /// The fields are not range-checked here; use [`DayKey::to_date`] to
    /// validate that the key names a real calendar day.
    #[must_use]
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self(year * 10_000 + month as i32 * 100 + day as i32)
    }

    /// Encode a `chrono` date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }

    /// Decode back to a `chrono` date.
    ///
    /// Returns `None` if the key does not name a real calendar day
    /// (e.g. a "31 Feb" that survived parsing).
    #[must_use]
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year(), self.month(), self.day())
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.0 / 10_000
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        (self.0 / 100 % 100) as u32
    }

    #[must_use]
    pub const fn day(self) -> u32 {
        (self.0 % 100) as u32
    }

    /// The raw packed value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// `YYYY-MM-DD`, the form the route layer surfaces.
    #[must_use]
    pub fn to_iso(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }

    /// Whole days from `earlier` to `self`, negative if `self` is earlier.
    ///
    /// Returns `None` when either key fails date validation.
    #[must_use]
    pub fn days_since(self, earlier: DayKey) -> Option<i64> {
        let a = self.to_date()?;
        let b = earlier.to_date()?;
        Some(a.signed_duration_since(b).num_days())
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_chronology_across_boundaries() {
        let dec_31 = DayKey::new(2024, 12, 31);
        let jan_1 = DayKey::new(2025, 1, 1);
        let jan_2 = DayKey::new(2025, 1, 2);

        assert!(dec_31 < jan_1);
        assert!(jan_1 < jan_2);
    }

    #[test]
    fn round_trips_through_chrono() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let key = DayKey::from_date(date);

        assert_eq!(key.value(), 20250315);
        assert_eq!(key.to_date(), Some(date));
    }

    #[test]
    fn accessors_decode_fields() {
        let key = DayKey::new(2025, 3, 15);
        assert_eq!(key.year(), 2025);
        assert_eq!(key.month(), 3);
        assert_eq!(key.day(), 15);
    }

    #[test]
    fn invalid_day_fails_date_conversion() {
        let key = DayKey::new(2025, 2, 31);
        assert!(key.to_date().is_none());
    }

    #[test]
    fn iso_formatting_pads_fields() {
        let key = DayKey::new(2025, 1, 5);
        assert_eq!(key.to_iso(), "2025-01-05");
        assert_eq!(key.to_string(), "2025-01-05");
    }

    #[test]
    fn days_since_spans_month_boundary() {
        let start = DayKey::new(2025, 1, 30);
        let today = DayKey::new(2025, 2, 2);
        assert_eq!(today.days_since(start), Some(3));
        assert_eq!(start.days_since(today), Some(-3));
    }
}
