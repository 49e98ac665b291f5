//! History-window derivation.
//!
//! The trail query against the tracking provider is bounded by "hours since
//! the active sailing started". The window is clamped so a downstream query
//! never asks for a degenerate (zero/negative) range nor an unbounded one,
//! and every failure path degrades to a fixed conservative fallback - this
//! gates a best-effort enrichment query, never a primary one.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::{day_start_instant, CutoffTime, SailingDecision};

/// Clamp bounds and fallback for the derived lookback window, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryBounds {
    pub min_hours: i64,
    pub max_hours: i64,
    pub fallback_hours: i64,
}

impl Default for HistoryBounds {
    fn default() -> Self {
        Self {
            min_hours: 1,
            max_hours: 24 * 14,
            fallback_hours: 24,
        }
    }
}

/// Hours of position history to request, derived from the resolved
/// sailing's start.
///
/// The start instant is the decision's start day anchored at the same
/// daily cutoff used for resolution, so "which sailing is active" and
/// "when did it start" cannot disagree. Elapsed time is rounded up to
/// whole hours and clamped to `[min_hours, max_hours]`; an unresolved
/// sailing or an unrepresentable start yields `fallback_hours`.
#[must_use]
pub fn derive_history_hours(
    decision: Option<&SailingDecision>,
    cutoff: CutoffTime,
    tz: Tz,
    now: DateTime<Utc>,
    bounds: &HistoryBounds,
) -> i64 {
    elapsed_hours(decision, cutoff, tz, now)
        .map(|hours| hours.clamp(bounds.min_hours, bounds.max_hours))
        .unwrap_or(bounds.fallback_hours)
}

fn elapsed_hours(
    decision: Option<&SailingDecision>,
    cutoff: CutoffTime,
    tz: Tz,
    now: DateTime<Utc>,
) -> Option<i64> {
    let start = day_start_instant(decision?.start(), cutoff, tz)?;
    let seconds = now.signed_duration_since(start).num_seconds();
    // Ceiling division; negative elapsed still rounds toward the anchor.
    Some((seconds + 3599).div_euclid(3600))
}
