//! End-to-end resolution flow: service over a scripted schedule source,
//! with real time-zone and cutoff arithmetic.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use chrono_tz::America::New_York;

use wakeline::calendar::{CalendarRow, MonthRef};
use wakeline::domain::CutoffTime;
use wakeline::resolver::SailingResolver;
use wakeline::service::VesselService;
use wakeline::testkit::calendar::ScriptedCalendar;
use wakeline::window::HistoryBounds;

fn march_turnaround_calendar() -> ScriptedCalendar {
    ScriptedCalendar::new().with_month(
        2025,
        3,
        vec![
            CalendarRow::new("40610", "10 Mar - 15 Mar"),
            CalendarRow::new("40611", "15 Mar - 20 Mar"),
        ],
    )
}

fn service(source: Arc<ScriptedCalendar>) -> VesselService<Arc<ScriptedCalendar>> {
    VesselService::new(
        SailingResolver::new(source),
        New_York,
        CutoffTime::new(11, 30),
        HistoryBounds {
            min_hours: 1,
            max_hours: 240,
            fallback_hours: 24,
        },
    )
}

#[tokio::test]
async fn turnaround_morning_belongs_to_the_ending_voyage() {
    let source = Arc::new(march_turnaround_calendar());
    let service = service(source);

    // 10:00 New York on the turnaround day, before the 11:30 cutoff.
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 14, 0, 0).unwrap();
    let decision = service.active_sailing_at(now).await.unwrap();

    assert_eq!(decision.sailing_id().as_str(), "40610");
}

#[tokio::test]
async fn turnaround_afternoon_belongs_to_the_starting_voyage() {
    let source = Arc::new(march_turnaround_calendar());
    let service = service(source);

    // 13:00 New York, after the cutoff: guests have turned over.
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 17, 0, 0).unwrap();
    let decision = service.active_sailing_at(now).await.unwrap();

    assert_eq!(decision.sailing_id().as_str(), "40611");
}

#[tokio::test]
async fn months_are_probed_current_previous_next() {
    let source = Arc::new(ScriptedCalendar::new());
    let service = service(source.clone());

    let now = Utc.with_ymd_and_hms(2025, 3, 12, 17, 0, 0).unwrap();
    assert!(service.active_sailing_at(now).await.is_none());

    assert_eq!(
        source.probed(),
        vec![
            MonthRef::new(2025, 3),
            MonthRef::new(2025, 2),
            MonthRef::new(2025, 4),
        ]
    );
}

#[tokio::test]
async fn decision_on_the_current_page_stops_the_probe() {
    let source = Arc::new(march_turnaround_calendar());
    let service = service(source.clone());

    let now = Utc.with_ymd_and_hms(2025, 3, 12, 17, 0, 0).unwrap();
    assert!(service.active_sailing_at(now).await.is_some());

    assert_eq!(source.probed(), vec![MonthRef::new(2025, 3)]);
}

#[tokio::test]
async fn voyage_listed_on_the_previous_page_is_found_across_a_year_boundary() {
    // A New Year's voyage listed only on the December page.
    let source = Arc::new(
        ScriptedCalendar::new()
            .with_month(2026, 1, vec![])
            .with_month(2025, 12, vec![CalendarRow::new("40695", "29 Dec - 2 Jan")]),
    );
    let service = service(source);

    let now = Utc.with_ymd_and_hms(2026, 1, 1, 17, 0, 0).unwrap();
    let decision = service.active_sailing_at(now).await.unwrap();

    assert_eq!(decision.sailing_id().as_str(), "40695");
    assert_eq!(decision.start().to_iso(), "2025-12-29");
    assert_eq!(decision.end().to_iso(), "2026-01-02");
}

#[tokio::test]
async fn history_window_tracks_elapsed_time_since_embarkation() {
    let source = Arc::new(march_turnaround_calendar());
    let service = service(source);

    // Mar 12, 12:00 New York. The active voyage embarked Mar 10, anchored
    // at the 11:30 cutoff: 48.5h elapsed, rounded up to 49.
    let now = Utc.with_ymd_and_hms(2025, 3, 12, 16, 0, 0).unwrap();
    assert_eq!(service.history_hours_at(now).await, 49);
}

#[tokio::test]
async fn history_window_falls_back_when_nothing_resolves() {
    let source = Arc::new(ScriptedCalendar::new());
    let service = service(source);

    let now = Utc.with_ymd_and_hms(2025, 3, 12, 16, 0, 0).unwrap();
    assert_eq!(service.history_hours_at(now).await, 24);
}

#[tokio::test]
async fn history_window_survives_a_fully_failing_source() {
    let source = Arc::new(
        ScriptedCalendar::new()
            .failing_month(2025, 3)
            .failing_month(2025, 2)
            .failing_month(2025, 4),
    );
    let service = service(source);

    let now = Utc.with_ymd_and_hms(2025, 3, 12, 16, 0, 0).unwrap();
    assert_eq!(service.history_hours_at(now).await, 24);
}

#[tokio::test]
async fn summary_reports_the_dashboard_payload() {
    let source = Arc::new(march_turnaround_calendar());
    let service = service(source);

    let now = Utc.with_ymd_and_hms(2025, 3, 12, 16, 0, 0).unwrap();
    let summary = service.summary_at(now, 6).await;

    assert_eq!(summary.sailing_id.as_deref(), Some("40610"));
    assert_eq!(summary.sailing_start_date_iso.as_deref(), Some("2025-03-10"));
    assert_eq!(summary.current_day_index, Some(2));
}

#[tokio::test]
async fn summary_is_all_null_when_unresolved() {
    let source = Arc::new(ScriptedCalendar::new());
    let service = service(source);

    let now = Utc.with_ymd_and_hms(2025, 3, 12, 16, 0, 0).unwrap();
    let summary = service.summary_at(now, 6).await;

    assert!(summary.sailing_id.is_none());
    assert!(summary.sailing_start_date_iso.is_none());
    assert!(summary.current_day_index.is_none());
}
