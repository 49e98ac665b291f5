//! Calendar month references and the schedule-source seam.
//!
//! The scraped schedule is paginated by calendar month, so a voyage active
//! "today" may be listed under the previous or next page. [`MonthRef`]
//! models one page; [`CalendarSource`] is the boundary behind which the
//! scraping transport lives (out of scope here - tests script it, the
//! deployment wires in the real thing).

mod parse;

pub use parse::parse_range_label;

use async_trait::async_trait;

use crate::domain::DayKey;
use crate::error::Result;

/// One month page of the schedule calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthRef {
    year: i32,
    month: u32,
}

impl MonthRef {
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The page that lists a given calendar day.
    #[must_use]
    pub const fn containing(day: DayKey) -> Self {
        Self::new(day.year(), day.month())
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// The fixed probe order for resolving "now": current page first, then
    /// previous, then next. The order is part of the observable contract -
    /// an earlier page that yields a decision short-circuits the rest.
    #[must_use]
    pub fn probe_order(now: DayKey) -> [Self; 3] {
        let current = Self::containing(now);
        [current, current.prev(), current.next()]
    }
}

impl std::fmt::Display for MonthRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One raw schedule row as handed over by the transport layer: the sailing
/// id cell and the date-range label cell, both already text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRow {
    pub id: String,
    pub date_label: String,
}

impl CalendarRow {
    pub fn new(id: impl Into<String>, date_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date_label: date_label.into(),
        }
    }

    /// A usable identifier is a non-empty run of digits; anything else is
    /// a header or decoration row.
    #[must_use]
    pub fn usable_id(&self) -> Option<&str> {
        let id = self.id.trim();
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            Some(id)
        } else {
            None
        }
    }
}

/// The schedule source: one month page of candidate rows per call.
///
/// Implementations own their transport entirely, including credentials for
/// the scraped upstream. Fetch failures surface as errors; the resolver
/// treats a failed page as "no candidates this month" and moves on.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn month_rows(&self, month: MonthRef) -> Result<Vec<CalendarRow>>;
}

#[async_trait]
impl<T: CalendarSource + ?Sized> CalendarSource for std::sync::Arc<T> {
    async fn month_rows(&self, month: MonthRef) -> Result<Vec<CalendarRow>> {
        (**self).month_rows(month).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prev_and_next_wrap_year_boundaries() {
        assert_eq!(MonthRef::new(2025, 1).prev(), MonthRef::new(2024, 12));
        assert_eq!(MonthRef::new(2025, 12).next(), MonthRef::new(2026, 1));
        assert_eq!(MonthRef::new(2025, 6).prev(), MonthRef::new(2025, 5));
        assert_eq!(MonthRef::new(2025, 6).next(), MonthRef::new(2025, 7));
    }

    #[test]
    fn probe_order_is_current_prev_next() {
        let order = MonthRef::probe_order(DayKey::new(2025, 1, 2));
        assert_eq!(
            order,
            [
                MonthRef::new(2025, 1),
                MonthRef::new(2024, 12),
                MonthRef::new(2025, 2),
            ]
        );
    }

    #[test]
    fn usable_id_requires_digits() {
        assert_eq!(CalendarRow::new("40612", "x").usable_id(), Some("40612"));
        assert_eq!(CalendarRow::new(" 7 ", "x").usable_id(), Some("7"));
        assert!(CalendarRow::new("", "x").usable_id().is_none());
        assert!(CalendarRow::new("Sailing ID", "x").usable_id().is_none());
        assert!(CalendarRow::new("40-612", "x").usable_id().is_none());
    }

    #[test]
    fn month_ref_display() {
        assert_eq!(MonthRef::new(2025, 3).to_string(), "2025-03");
    }
}
