//! Recurring event projection: the next concrete occurrence of a weekly show.
//!
//! Legacy member records describe recurrence as free text ("Mon 6am - 9am",
//! comma-joined when a DJ holds several slots). Each slot projects
//! independently (never merged or averaged), and every projection
//! failure is a typed error the caller must surface; a calendar export that
//! silently does nothing is worse than a visible notice.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;

use crate::error::ScheduleError;
use crate::timefmt::{self, MINUTES_PER_DAY};

/// One parsed weekly slot of a legacy show-time string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowSlot {
    pub day: Weekday,
    pub start: u32,
    pub end: u32,
}

/// A concrete future instance of a recurring show, in station wall time.
/// Weekly recurrence is a property of the serialized event (an RRULE), not
/// extra occurrences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub day: Weekday,
    pub title: String,
    pub description: String,
    /// Stable dj+show+day identity for calendar UIDs.
    pub uid_slug: String,
}

/// Parse one "Day H:MM am - H:MM pm" slot.
pub fn parse_show_slot(text: &str) -> Result<ShowSlot, ScheduleError> {
    let s = text.trim();
    let (day_token, rest) = s
        .split_once(char::is_whitespace)
        .ok_or_else(|| bad_slot(s, "missing day"))?;
    let day = timefmt::parse_weekday(day_token).map_err(|e| bad_slot(s, &e.to_string()))?;

    let (start_str, end_str) = rest
        .split_once(" - ")
        .or_else(|| rest.split_once('-'))
        .ok_or_else(|| bad_slot(s, "missing time range"))?;
    let start = timefmt::parse_minutes(start_str).map_err(|e| bad_slot(s, &e.to_string()))?;
    let end = timefmt::parse_minutes(end_str).map_err(|e| bad_slot(s, &e.to_string()))?;

    Ok(ShowSlot { day, start, end })
}

/// Parse a legacy show-time string into its slots. Comma-joined strings carry
/// one slot per segment; any bad segment fails the whole parse so the caller
/// can show a notice instead of exporting half a schedule.
pub fn parse_show_slots(text: &str) -> Result<Vec<ShowSlot>, ScheduleError> {
    let slots: Result<Vec<_>, _> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_show_slot)
        .collect();
    let slots = slots?;
    if slots.is_empty() {
        return Err(bad_slot(text, "no slots"));
    }
    Ok(slots)
}

fn bad_slot(text: &str, reason: &str) -> ScheduleError {
    ScheduleError::InvalidRecurrenceSpec(format!("{:?}: {}", text, reason))
}

/// Project the next concrete occurrence of a weekly show.
///
/// `(target - today + 7) % 7` days ahead; landing on today counts only while
/// the start time is still in the future, otherwise the occurrence is a week
/// out. An overnight slot ends on the calendar day after it starts.
pub fn next_occurrence(
    dj_name: &str,
    show_name: Option<&str>,
    day: Weekday,
    start_minutes: u32,
    end_minutes: u32,
    reference_now: NaiveDateTime,
) -> Result<Occurrence, ScheduleError> {
    if start_minutes >= MINUTES_PER_DAY || end_minutes >= MINUTES_PER_DAY {
        return Err(ScheduleError::InvalidRecurrenceSpec(format!(
            "minutes out of range: start={} end={}",
            start_minutes, end_minutes
        )));
    }

    let now_idx = reference_now.weekday().num_days_from_sunday();
    let target_idx = day.num_days_from_sunday();
    let mut days_ahead = (target_idx + 7 - now_idx) % 7;
    if days_ahead == 0 && start_minutes <= timefmt::minute_of_day(reference_now.time()) {
        days_ahead = 7; // today's window already started or passed
    }

    let start_date = reference_now.date() + Duration::days(i64::from(days_ahead));
    let end_date = if end_minutes < start_minutes {
        start_date + Duration::days(1)
    } else {
        start_date
    };

    let start = start_date.and_time(time_of(start_minutes)?);
    let end = end_date.and_time(time_of(end_minutes)?);

    let show_name = show_name.map(str::trim).filter(|s| !s.is_empty());
    let (title, description) = match show_name {
        Some(show) => (
            format!("{} with {}", show, dj_name),
            format!("Listen to {} with {} on CHIRP Radio", show, dj_name),
        ),
        None => (
            format!("{} on CHIRP Radio", dj_name),
            format!("Listen to {} on CHIRP Radio", dj_name),
        ),
    };

    let uid_slug = match show_name {
        Some(show) => format!("{}-{}-{}", slug(dj_name), slug(show), slug(&day.to_string())),
        None => format!("{}-{}", slug(dj_name), slug(&day.to_string())),
    };

    Ok(Occurrence {
        start,
        end,
        day,
        title,
        description,
        uid_slug,
    })
}

/// Project one parsed legacy slot.
pub fn next_occurrence_for_slot(
    dj_name: &str,
    show_name: Option<&str>,
    slot: ShowSlot,
    reference_now: NaiveDateTime,
) -> Result<Occurrence, ScheduleError> {
    next_occurrence(
        dj_name,
        show_name,
        slot.day,
        slot.start,
        slot.end,
        reference_now,
    )
}

fn time_of(minutes: u32) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).ok_or_else(|| {
        ScheduleError::InvalidRecurrenceSpec(format!("minutes out of range: {}", minutes))
    })
}

fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut dash_pending = false;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if dash_pending && !out.is_empty() {
                out.push('-');
            }
            dash_pending = false;
            out.extend(c.to_lowercase());
        } else {
            dash_pending = true;
        }
    }
    out
}
