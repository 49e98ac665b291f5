//! Sailing window resolution.
//!
//! The scraped schedule calendar is paginated by month, and the voyage
//! active "today" may be listed under an adjacent page (a voyage starting
//! in the last week of a month shows up on that month's page, not the
//! next). The resolver probes pages in a fixed priority order - current,
//! previous, next - and stops at the first page whose candidates yield a
//! decision.
//!
//! On a turnaround day one voyage ends and the next begins, so both contain
//! "today" in the date-only calendar. Before the turnaround cutoff the
//! outgoing voyage is still the operative one for passengers aboard; after
//! it, the incoming voyage is.

use tracing::{debug, warn};

use crate::calendar::{parse_range_label, CalendarRow, CalendarSource, MonthRef};
use crate::domain::{DayKey, ResolutionContext, SailingDecision, SailingId, SailingRange};

/// Tie-break policy for an overlap day whose candidates do not split into
/// clean starts-today / ends-today sets.
///
/// The default mirrors the long-standing behavior of the schedule source's
/// dashboard; it is overridable because "most recently started wins" is a
/// heuristic, not a documented rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapFallback {
    /// Most recently started voyage wins.
    #[default]
    LatestStart,
    /// Longest-aboard voyage wins.
    EarliestStart,
}

/// Resolves which sailing is currently active for a vessel.
pub struct SailingResolver<S> {
    source: S,
    fallback: OverlapFallback,
}

impl<S: CalendarSource> SailingResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            fallback: OverlapFallback::default(),
        }
    }

    /// Override the unclean-overlap tie-break policy.
    #[must_use]
    pub fn with_overlap_fallback(mut self, fallback: OverlapFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Resolve against the standard probe order for `ctx`'s calendar day.
    pub async fn resolve(&self, ctx: &ResolutionContext) -> Option<SailingDecision> {
        self.resolve_in(ctx, &MonthRef::probe_order(ctx.now_key()))
            .await
    }

    /// Resolve against an explicit list of month pages, probed sequentially
    /// in the given order. A page whose fetch fails counts as empty; a page
    /// with at least one candidate containing "now" decides and ends the
    /// probe.
    pub async fn resolve_in(
        &self,
        ctx: &ResolutionContext,
        months: &[MonthRef],
    ) -> Option<SailingDecision> {
        for &month in months {
            let rows = match self.source.month_rows(month).await {
                Ok(rows) => rows,
                Err(error) => {
                    warn!(%month, %error, "schedule page fetch failed, trying next page");
                    continue;
                }
            };

            let matches = candidates_containing(&rows, month, ctx.now_key());
            if matches.is_empty() {
                debug!(%month, "no candidate contains today");
                continue;
            }

            let decision = self.pick(ctx, matches);
            debug!(sailing_id = %decision.sailing_id(), %month, "resolved active sailing");
            return Some(decision);
        }

        None
    }

    /// Choose among candidates that all contain "now".
    fn pick(&self, ctx: &ResolutionContext, mut matches: Vec<SailingRange>) -> SailingDecision {
        if matches.len() == 1 {
            return matches.remove(0).into();
        }

        let now = ctx.now_key();
        let starts_today: Vec<&SailingRange> =
            matches.iter().filter(|m| m.start() == now).collect();
        // Multi-day voyages ending today; a single-day voyage is a start,
        // not an end, for turnaround purposes.
        let ends_today: Vec<&SailingRange> = matches
            .iter()
            .filter(|m| m.end() == now && m.start() < now)
            .collect();

        if !starts_today.is_empty() && !ends_today.is_empty() {
            // Genuine turnaround: attribute "now" by cutoff side.
            let chosen = if ctx.before_cutoff() {
                ends_today
                    .iter()
                    .max_by_key(|m| m.start())
                    .expect("ends_today is non-empty")
            } else {
                starts_today
                    .iter()
                    .min_by_key(|m| m.end())
                    .expect("starts_today is non-empty")
            };
            return (*chosen).clone().into();
        }

        let chosen = match self.fallback {
            OverlapFallback::LatestStart => matches.iter().max_by_key(|m| m.start()),
            OverlapFallback::EarliestStart => matches.iter().min_by_key(|m| m.start()),
        }
        .expect("matches has at least two entries");
        chosen.clone().into()
    }
}

/// Parse a page's rows and keep the candidates whose window contains `now`.
/// Rows without a usable id or a recognizable date label are not sailings.
fn candidates_containing(rows: &[CalendarRow], month: MonthRef, now: DayKey) -> Vec<SailingRange> {
    rows.iter()
        .filter_map(|row| {
            let id = row.usable_id()?;
            let range = parse_range_label(&row.date_label, month.month(), month.year())?;
            range
                .contains(now)
                .then(|| SailingRange::new(SailingId::new(id), range))
        })
        .collect()
}
