//! "Now" as the resolver sees it.
//!
//! Physical turnover of a vessel happens at a known local clock time. On a
//! turnaround day the date-only calendar shows two voyages spanning "today";
//! which one is operative depends on whether the cutoff has passed. The
//! [`ResolutionContext`] captures both facts - the local calendar day and
//! the cutoff side - in the vessel's designated time zone.

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use super::day_key::DayKey;

/// The daily turnaround cutoff, a fixed local clock time.
///
/// One configured value is shared by sailing resolution and history-window
/// derivation so that "which sailing is active" and "when did it start"
/// agree with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffTime {
    hour: u32,
    minute: u32,
}

impl CutoffTime {
    /// Create a cutoff. `hour` is 0-23, `minute` 0-59; out-of-range values
    /// are rejected by config validation before reaching this type.
    #[must_use]
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    #[must_use]
    pub const fn hour(&self) -> u32 {
        self.hour
    }

    #[must_use]
    pub const fn minute(&self) -> u32 {
        self.minute
    }

    /// Whether a local wall-clock time falls strictly before the cutoff.
    #[must_use]
    pub const fn is_before(&self, hour: u32, minute: u32) -> bool {
        if hour < self.hour {
            return true;
        }
        if hour > self.hour {
            return false;
        }
        minute < self.minute
    }

    /// The cutoff as a time-of-day, for anchoring a date to an instant.
    #[must_use]
    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl Default for CutoffTime {
    fn default() -> Self {
        Self::new(11, 30)
    }
}

/// "Now" decomposed for sailing resolution: the local calendar day plus
/// which side of the daily cutoff the clock is on.
///
/// Recomputed on every resolution call and never cached - it must always
/// reflect true current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionContext {
    now_key: DayKey,
    before_cutoff: bool,
}

impl ResolutionContext {
    /// Decompose an explicit instant in the vessel's time zone.
    #[must_use]
    pub fn from_instant(now: DateTime<Utc>, tz: Tz, cutoff: CutoffTime) -> Self {
        let local = now.with_timezone(&tz);
        Self {
            now_key: DayKey::new(local.year(), local.month(), local.day()),
            before_cutoff: cutoff.is_before(local.hour(), local.minute()),
        }
    }

    /// Decompose the current system time in the vessel's time zone.
    #[must_use]
    pub fn capture(tz: Tz, cutoff: CutoffTime) -> Self {
        Self::from_instant(Utc::now(), tz, cutoff)
    }

    /// Build a context directly from its parts.
    #[must_use]
    pub const fn at(now_key: DayKey, before_cutoff: bool) -> Self {
        Self {
            now_key,
            before_cutoff,
        }
    }

    /// The local calendar day of "now".
    #[must_use]
    pub const fn now_key(&self) -> DayKey {
        self.now_key
    }

    /// Whether local time-of-day is before the turnaround cutoff.
    #[must_use]
    pub const fn before_cutoff(&self) -> bool {
        self.before_cutoff
    }
}

/// The sailing-start instant: the decision's start day anchored at the
/// cutoff time-of-day in the vessel's time zone.
///
/// Returns `None` when the day key is not a real date or the local time is
/// skipped by a DST gap.
#[must_use]
pub fn day_start_instant(day: DayKey, cutoff: CutoffTime, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = day.to_date()?.and_time(cutoff.to_naive_time());
    let local = tz.from_local_datetime(&naive).earliest()?;
    Some(local.with_timezone(&Utc))
}
