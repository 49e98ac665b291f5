//! Scraped date-range label parsing.
//!
//! Calendar rows label a voyage as `"10 Mar - 15 Mar"` or `"4 Jul"`. The
//! label carries no year; the month page it was scraped from does. A label
//! that doesn't match either shape is simply not a sailing row - that is a
//! skip, never an error.

use crate::domain::{DayKey, DayRange};

/// Parse a date-range label scraped from a calendar page for
/// (`cal_month`, `cal_year`).
///
/// Year resolution happens per side: a side whose month is the December or
/// January neighbor of the page month crosses the year boundary and shifts
/// by one year; any other mismatch stays in the page year. If the resolved
/// start still sorts after the end, the voyage wraps a year boundary the
/// page didn't reveal and the end year is bumped once.
#[must_use]
pub fn parse_range_label(label: &str, cal_month: u32, cal_year: i32) -> Option<DayRange> {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    let (start_text, end_text) = match collapsed.split_once('-') {
        Some((lhs, rhs)) => (lhs.trim(), Some(rhs.trim())),
        None => (collapsed.as_str(), None),
    };

    let (start_day, start_month) = parse_day_month(start_text)?;
    let (end_day, end_month) = match end_text {
        Some(text) => parse_day_month(text)?,
        None => (start_day, start_month),
    };

    let start_year = resolve_year(start_month, cal_month, cal_year);
    let mut end_year = resolve_year(end_month, cal_month, cal_year);

    let start = DayKey::new(start_year, start_month, start_day);
    let mut end = DayKey::new(end_year, end_month, end_day);

    // A voyage crossing a year boundary the page layout didn't expose.
    if start_year == end_year && start > end {
        end_year += 1;
        end = DayKey::new(end_year, end_month, end_day);
    }

    if start > end {
        return None;
    }

    Some(DayRange::new(start, end))
}

/// One side of a label: `"<day> <Mon>"`.
fn parse_day_month(text: &str) -> Option<(u32, u32)> {
    let mut parts = text.split_whitespace();
    let day_text = parts.next()?;
    let month_text = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let day: u32 = day_text.parse().ok()?;
    if !(1..=31).contains(&day) {
        return None;
    }

    Some((day, month_num(month_text)?))
}

/// Case-insensitive three-letter month abbreviation.
fn month_num(text: &str) -> Option<u32> {
    if text.len() != 3 || !text.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let num = match text.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(num)
}

/// Which year a side of the label belongs to, relative to the page month.
///
/// Only the December/January neighbors of the page month cross a year
/// boundary; every other mismatch is assumed to share the page year.
const fn resolve_year(side_month: u32, cal_month: u32, cal_year: i32) -> i32 {
    if side_month == cal_month {
        return cal_year;
    }
    if cal_month == 1 && side_month == 12 {
        return cal_year - 1;
    }
    if cal_month == 12 && side_month == 1 {
        return cal_year + 1;
    }
    cal_year
}
