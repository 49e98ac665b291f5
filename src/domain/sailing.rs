//! Sailing (voyage) domain types.
//!
//! - [`SailingId`] - Opaque identifier assigned by the schedule source
//! - [`DayRange`] - Inclusive embarkation-through-disembarkation window
//! - [`SailingRange`] - One candidate voyage from a scraped calendar row
//! - [`SailingDecision`] - The resolver's pick of the currently active voyage

use std::fmt;

use serde::{Deserialize, Serialize};

use super::day_key::DayKey;

/// Sailing identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SailingId(String);

impl SailingId {
    /// Create a new `SailingId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the sailing ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SailingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SailingId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SailingId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An inclusive calendar-day window.
///
/// Both endpoints are active days: a voyage occupies its embarkation day
/// and its disembarkation day. A single-day range has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    start: DayKey,
    end: DayKey,
}

impl DayRange {
    /// Create a range, normalizing nothing: callers are expected to hand in
    /// `start <= end` (the range parser guarantees it).
    #[must_use]
    pub const fn new(start: DayKey, end: DayKey) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn start(&self) -> DayKey {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DayKey {
        self.end
    }

    /// Whether `day` falls inside the window, endpoints included.
    #[must_use]
    pub fn contains(&self, day: DayKey) -> bool {
        self.start <= day && day <= self.end
    }

    /// A voyage that embarks and disembarks on the same day.
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

/// One candidate voyage parsed from a scraped calendar row.
///
/// Immutable once built; lives only for the duration of one resolution
/// call and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SailingRange {
    id: SailingId,
    range: DayRange,
}

impl SailingRange {
    #[must_use]
    pub const fn new(id: SailingId, range: DayRange) -> Self {
        Self { id, range }
    }

    #[must_use]
    pub const fn id(&self) -> &SailingId {
        &self.id
    }

    #[must_use]
    pub const fn range(&self) -> &DayRange {
        &self.range
    }

    #[must_use]
    pub const fn start(&self) -> DayKey {
        self.range.start()
    }

    #[must_use]
    pub const fn end(&self) -> DayKey {
        self.range.end()
    }
}

/// The resolver's output: the uniquely identified active sailing.
///
/// Consumed immediately by window derivation and itinerary lookups;
/// absence (`Option::None` at the call site) means "no active sailing",
/// which is a valid terminal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SailingDecision {
    sailing_id: SailingId,
    start: DayKey,
    end: DayKey,
}

impl SailingDecision {
    #[must_use]
    pub const fn new(sailing_id: SailingId, start: DayKey, end: DayKey) -> Self {
        Self {
            sailing_id,
            start,
            end,
        }
    }

    #[must_use]
    pub const fn sailing_id(&self) -> &SailingId {
        &self.sailing_id
    }

    #[must_use]
    pub const fn start(&self) -> DayKey {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DayKey {
        self.end
    }
}

impl From<SailingRange> for SailingDecision {
    fn from(candidate: SailingRange) -> Self {
        let start = candidate.start();
        let end = candidate.end();
        Self::new(candidate.id, start, end)
    }
}
