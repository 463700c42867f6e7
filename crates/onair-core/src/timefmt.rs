//! Canonical time handling for the weekly schedule.
//!
//! The CMS and legacy member records carry show times in several shapes:
//! ISO-8601 instants ("2025-11-06T03:00:00.000Z", date ignored), 24-hour
//! clock strings ("06:00"), 12-hour clock strings ("6:30 PM"), and the
//! station's compact display tokens ("12n", "12m", "1:30am"). Everything
//! internal works on canonical minute-of-day integers in [0, 1440); strings
//! stop at this boundary.

use chrono::{NaiveTime, Timelike, Weekday};

use crate::error::ScheduleError;

pub const MINUTES_PER_DAY: u32 = 1440;

/// Normalize any supported time representation to minute-of-day.
///
/// ISO instants use only their time-of-day component. The CMS stores Chicago
/// wall time with a `Z` suffix, so the UTC fields *are* the wall clock and no
/// zone conversion happens here.
pub fn parse_minutes(input: &str) -> Result<u32, ScheduleError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ScheduleError::UnparseableTimeFormat(input.to_string()));
    }

    let lower = s.to_ascii_lowercase();

    // Station compact specials, so compact() output round-trips.
    match lower.as_str() {
        "12n" => return Ok(12 * 60),
        "12m" => return Ok(0),
        _ => {}
    }

    if s.contains('T') {
        return iso_minutes(s)
            .ok_or_else(|| ScheduleError::UnparseableTimeFormat(input.to_string()));
    }

    let parsed = if let Some(rest) = lower.strip_suffix("am") {
        clock_parts(rest.trim_end()).and_then(|(h, m)| twelve_hour(h, m, false))
    } else if let Some(rest) = lower.strip_suffix("pm") {
        clock_parts(rest.trim_end()).and_then(|(h, m)| twelve_hour(h, m, true))
    } else if lower.contains(':') {
        // Bare 24-hour clock string, the shape the schedule table uses.
        clock_parts(&lower).and_then(|(h, m)| (h < 24 && m < 60).then(|| h * 60 + m))
    } else {
        None
    };

    parsed.ok_or_else(|| ScheduleError::UnparseableTimeFormat(input.to_string()))
}

/// Normalize a day name (full or 3-letter, any case) to a weekday.
pub fn parse_weekday(input: &str) -> Result<Weekday, ScheduleError> {
    input
        .trim()
        .parse::<Weekday>()
        .map_err(|_| ScheduleError::UnknownDayName(input.trim().to_string()))
}

/// Minute-of-day for a wall-clock time.
pub fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Station-style compact label: exact noon is "12n", exact midnight is "12m",
/// otherwise "6am", "6:30am", "11pm".
pub fn compact(minutes: u32) -> String {
    let m = minutes % MINUTES_PER_DAY;
    let (hour, min) = (m / 60, m % 60);
    if hour == 0 && min == 0 {
        return "12m".to_string();
    }
    if hour == 12 && min == 0 {
        return "12n".to_string();
    }
    let ampm = if hour < 12 { "am" } else { "pm" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    if min == 0 {
        format!("{}{}", hour12, ampm)
    } else {
        format!("{}:{:02}{}", hour12, min, ampm)
    }
}

/// Compact label for a whole weekly slot: "Wed 12n - 2pm".
pub fn compact_slot(day: Weekday, start: u32, end: u32) -> String {
    format!("{} {} - {}", day, compact(start), compact(end))
}

fn iso_minutes(s: &str) -> Option<u32> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(minute_of_day(dt.naive_utc().time()));
    }
    // Zone-less ISO timestamps show up in older CMS exports.
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| minute_of_day(dt.time()))
}

fn clock_parts(s: &str) -> Option<(u32, u32)> {
    match s.split_once(':') {
        Some((h, m)) => Some((h.trim().parse().ok()?, m.trim().parse().ok()?)),
        None => Some((s.trim().parse().ok()?, 0)),
    }
}

fn twelve_hour(hour: u32, min: u32, pm: bool) -> Option<u32> {
    if !(1..=12).contains(&hour) || min >= 60 {
        return None;
    }
    let hour24 = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some(hour24 * 60 + min)
}
