//! Route-layer facade.
//!
//! The reference deployment split resolution and window derivation across
//! an internal HTTP hop; here they are wired in-process behind one service
//! so the route handlers stay thin. Outputs are the JSON shapes the
//! dashboard consumes.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::calendar::CalendarSource;
use crate::domain::{CutoffTime, DayKey, ResolutionContext, SailingDecision};
use crate::resolver::SailingResolver;
use crate::window::{derive_history_hours, HistoryBounds};

/// The "which sailing is active" payload surfaced to the dashboard.
///
/// All fields are `null` together when no sailing resolves - the dashboard
/// treats that as "no active sailing", not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SailingSummary {
    pub sailing_id: Option<String>,
    #[serde(rename = "sailingStartDateISO")]
    pub sailing_start_date_iso: Option<String>,
    pub current_day_index: Option<usize>,
}

impl SailingSummary {
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            sailing_id: None,
            sailing_start_date_iso: None,
            current_day_index: None,
        }
    }

    /// Build the payload for a resolved sailing with `row_count` day-by-day
    /// itinerary rows.
    #[must_use]
    pub fn resolved(decision: &SailingDecision, row_count: usize, today: DayKey) -> Self {
        Self {
            sailing_id: Some(decision.sailing_id().as_str().to_string()),
            sailing_start_date_iso: Some(decision.start().to_iso()),
            current_day_index: current_day_index(decision.start(), today, row_count),
        }
    }
}

/// Position of `today` within a sailing's day-by-day itinerary rows,
/// clamped to `[0, row_count - 1]`. `None` when there are no rows or the
/// start key is not a real date.
#[must_use]
pub fn current_day_index(start: DayKey, today: DayKey, row_count: usize) -> Option<usize> {
    if row_count == 0 {
        return None;
    }
    let raw = today.days_since(start)?;
    let clamped = raw.clamp(0, row_count as i64 - 1);
    Some(clamped as usize)
}

/// One vessel's resolution pipeline: active sailing, history window, and
/// dashboard summary, all sharing a single cutoff and time zone.
pub struct VesselService<S> {
    resolver: SailingResolver<S>,
    tz: Tz,
    cutoff: CutoffTime,
    bounds: HistoryBounds,
}

impl<S: CalendarSource> VesselService<S> {
    pub fn new(resolver: SailingResolver<S>, tz: Tz, cutoff: CutoffTime, bounds: HistoryBounds) -> Self {
        Self {
            resolver,
            tz,
            cutoff,
            bounds,
        }
    }

    /// Resolve the currently active sailing.
    pub async fn active_sailing(&self) -> Option<SailingDecision> {
        self.active_sailing_at(Utc::now()).await
    }

    /// Resolve the active sailing as of an explicit instant.
    pub async fn active_sailing_at(&self, now: DateTime<Utc>) -> Option<SailingDecision> {
        let ctx = ResolutionContext::from_instant(now, self.tz, self.cutoff);
        self.resolver.resolve(&ctx).await
    }

    /// Hours of position history the trail query should request.
    pub async fn history_hours(&self) -> i64 {
        self.history_hours_at(Utc::now()).await
    }

    /// History window as of an explicit instant.
    pub async fn history_hours_at(&self, now: DateTime<Utc>) -> i64 {
        let decision = self.active_sailing_at(now).await;
        derive_history_hours(decision.as_ref(), self.cutoff, self.tz, now, &self.bounds)
    }

    /// Dashboard summary for a sailing whose itinerary has `row_count` rows.
    pub async fn summary_at(&self, now: DateTime<Utc>, row_count: usize) -> SailingSummary {
        match self.active_sailing_at(now).await {
            Some(decision) => {
                let local = now.with_timezone(&self.tz);
                let today = DayKey::new(local.year(), local.month(), local.day());
                SailingSummary::resolved(&decision, row_count, today)
            }
            None => SailingSummary::unresolved(),
        }
    }
}
