//! Scripted schedule source for tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::calendar::{CalendarRow, CalendarSource, MonthRef};
use crate::error::{Error, Result};

/// A [`CalendarSource`] that serves pre-scripted month pages.
///
/// Unscripted months serve an empty page; months registered via
/// [`failing_month`](Self::failing_month) fail their fetch. Every probe is
/// recorded so tests can assert the probe order.
#[derive(Default)]
pub struct ScriptedCalendar {
    months: HashMap<MonthRef, Vec<CalendarRow>>,
    failing: HashSet<MonthRef>,
    probed: Mutex<Vec<MonthRef>>,
}

impl ScriptedCalendar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the rows served for one month page.
    #[must_use]
    pub fn with_month(mut self, year: i32, month: u32, rows: Vec<CalendarRow>) -> Self {
        self.months.insert(MonthRef::new(year, month), rows);
        self
    }

    /// Make a month page fail its fetch.
    #[must_use]
    pub fn failing_month(mut self, year: i32, month: u32) -> Self {
        self.failing.insert(MonthRef::new(year, month));
        self
    }

    /// Month pages fetched so far, in order.
    #[must_use]
    pub fn probed(&self) -> Vec<MonthRef> {
        self.probed.lock().clone()
    }
}

#[async_trait]
impl CalendarSource for ScriptedCalendar {
    async fn month_rows(&self, month: MonthRef) -> Result<Vec<CalendarRow>> {
        self.probed.lock().push(month);

        if self.failing.contains(&month) {
            return Err(Error::UpstreamStatus {
                provider: "calendar",
                status: 503,
            });
        }
        Ok(self.months.get(&month).cloned().unwrap_or_default())
    }
}
