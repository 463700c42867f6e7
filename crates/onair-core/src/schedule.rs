//! Weekly schedule table: "who is on right now" resolution and display
//! bucketing for the schedule grid.
//!
//! Entries arrive from the CMS as-is and are normalized lazily; one malformed
//! row must never take down resolution for the rest of the table, so both
//! passes skip-and-log bad rows instead of aborting.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ScheduleError;
use crate::timefmt::{self, MINUTES_PER_DAY};

/// One recurring weekly slot, as the CMS serves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Lower-case full day name ("monday").
    pub day_of_week: String,
    /// ISO instant or clock string; see `timefmt::parse_minutes`.
    pub start_time: String,
    pub end_time: String,
    /// Member id of the scheduled DJ.
    pub dj_ref: u64,
    #[serde(default)]
    pub dj_name: Option<String>,
    #[serde(default)]
    pub show_name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl ScheduleEntry {
    /// Normalized half-open window for this entry.
    pub fn window(&self) -> Result<ShowWindow, ScheduleError> {
        Ok(ShowWindow {
            start: timefmt::parse_minutes(&self.start_time)?,
            end: timefmt::parse_minutes(&self.end_time)?,
        })
    }

    pub fn weekday(&self) -> Result<Weekday, ScheduleError> {
        timefmt::parse_weekday(&self.day_of_week)
    }

    /// Something recognizable for log lines.
    fn label(&self) -> &str {
        self.slug
            .as_deref()
            .or(self.show_name.as_deref())
            .or(self.dj_name.as_deref())
            .unwrap_or("?")
    }
}

/// A `[start, end)` minute-of-day window. `end < start` means the show wraps
/// past midnight; `end == 0` means it runs right up to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowWindow {
    pub start: u32,
    pub end: u32,
}

impl ShowWindow {
    /// Whether `now` (minute-of-day, on the window's own weekday) falls
    /// inside the window. Start is inclusive, end exclusive.
    pub fn contains(&self, now: u32) -> bool {
        // end == 0 is "ends at midnight": minute 1440 of the same day, not
        // a wrap into the next one.
        let end = if self.end == 0 { MINUTES_PER_DAY } else { self.end };
        if end < self.start {
            now >= self.start || now < end
        } else {
            now >= self.start && now < end
        }
    }
}

/// Find the entry on air at `now_minutes` on `now_day`, or `None` for a dead
/// air slot.
///
/// Overlapping entries are a data-quality anomaly, not a crash condition:
/// the first match in input order wins and the rest are logged. Entries that
/// fail to normalize are skipped the same way so the rest of the table still
/// resolves.
pub fn current_show<'a>(
    entries: &'a [ScheduleEntry],
    now_day: Weekday,
    now_minutes: u32,
) -> Option<&'a ScheduleEntry> {
    let mut hit: Option<&ScheduleEntry> = None;
    for entry in entries.iter().filter(|e| e.is_active) {
        let day = match entry.weekday() {
            Ok(d) => d,
            Err(e) => {
                warn!("[schedule] skipping entry {:?}: {}", entry.label(), e);
                continue;
            }
        };
        if day != now_day {
            continue;
        }
        let window = match entry.window() {
            Ok(w) => w,
            Err(e) => {
                warn!("[schedule] skipping entry {:?}: {}", entry.label(), e);
                continue;
            }
        };
        if window.contains(now_minutes) {
            match hit {
                None => hit = Some(entry),
                Some(first) => warn!(
                    "[schedule] overlapping entries at {} on {}: keeping {:?}, ignoring {:?}",
                    now_minutes,
                    now_day,
                    first.label(),
                    entry.label()
                ),
            }
        }
    }
    hit
}

// ── Display bucketing ─────────────────────────────────────────────────────────

/// A named time-of-day column boundary for the schedule grid.
#[derive(Debug, Clone)]
pub struct DayBucket {
    pub name: &'static str,
    /// `[start, end)` in minutes; an entry belongs here when its *start*
    /// minute falls inside.
    pub start: u32,
    pub end: u32,
}

/// The station's house grid: Early / Daytime / Evening.
pub fn house_buckets() -> Vec<DayBucket> {
    vec![
        DayBucket { name: "Early", start: 0, end: 9 * 60 },
        DayBucket { name: "Daytime", start: 9 * 60, end: 17 * 60 },
        DayBucket { name: "Evening", start: 17 * 60, end: MINUTES_PER_DAY },
    ]
}

/// One rendered grid column.
#[derive(Debug, Clone, Serialize)]
pub struct DayColumn {
    pub name: String,
    pub shows: Vec<ScheduleEntry>,
}

/// Group one day's active entries into display columns.
///
/// An entry is assigned by its own start minute and is never split across
/// columns even when its run time crosses a boundary. Input order is
/// preserved within a column (the table is assumed chronological). An entry
/// whose start falls in a gap between buckets is dropped from display.
pub fn bucket_day(
    entries: &[ScheduleEntry],
    day: Weekday,
    buckets: &[DayBucket],
) -> Vec<DayColumn> {
    let mut columns: Vec<DayColumn> = buckets
        .iter()
        .map(|b| DayColumn {
            name: b.name.to_string(),
            shows: Vec::new(),
        })
        .collect();

    for entry in entries.iter().filter(|e| e.is_active) {
        match entry.weekday() {
            Ok(d) if d == day => {}
            Ok(_) => continue,
            Err(e) => {
                warn!("[schedule] skipping entry {:?}: {}", entry.label(), e);
                continue;
            }
        }
        let start = match entry.window() {
            Ok(w) => w.start,
            Err(e) => {
                warn!("[schedule] skipping entry {:?}: {}", entry.label(), e);
                continue;
            }
        };
        if let Some(idx) = buckets
            .iter()
            .position(|b| start >= b.start && start < b.end)
        {
            columns[idx].shows.push(entry.clone());
        }
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: &str, start: &str, end: &str, dj_ref: u64) -> ScheduleEntry {
        ScheduleEntry {
            day_of_week: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            dj_ref,
            dj_name: None,
            show_name: None,
            slug: None,
            is_active: true,
        }
    }

    #[test]
    fn test_window_bounds_non_overnight() {
        let w = ShowWindow { start: 360, end: 540 };
        assert!(w.contains(360)); // inclusive start
        assert!(w.contains(539));
        assert!(!w.contains(540)); // exclusive end
        assert!(!w.contains(359));
    }

    #[test]
    fn test_window_overnight_wraparound() {
        let w = ShowWindow { start: 1380, end: 120 };
        assert!(w.contains(1380));
        assert!(w.contains(0));
        assert!(w.contains(119));
        assert!(!w.contains(120));
        assert!(!w.contains(1379));
    }

    #[test]
    fn test_window_ending_at_midnight_is_same_day() {
        let w = ShowWindow { start: 1320, end: 0 };
        assert!(w.contains(1320));
        assert!(w.contains(1439));
        assert!(!w.contains(0)); // already next day
        assert!(!w.contains(1319));
    }

    #[test]
    fn test_current_show_basic() {
        let entries = vec![
            entry("monday", "06:00", "09:00", 1),
            entry("monday", "09:00", "12:00", 2),
            entry("tuesday", "06:00", "09:00", 3),
        ];
        let hit = current_show(&entries, Weekday::Mon, 450).unwrap();
        assert_eq!(hit.dj_ref, 1);
        let hit = current_show(&entries, Weekday::Mon, 540).unwrap();
        assert_eq!(hit.dj_ref, 2);
        assert!(current_show(&entries, Weekday::Mon, 300).is_none()); // dead air
        assert!(current_show(&entries, Weekday::Wed, 450).is_none());
    }

    #[test]
    fn test_current_show_ignores_inactive() {
        let mut e = entry("monday", "06:00", "09:00", 1);
        e.is_active = false;
        assert!(current_show(&[e], Weekday::Mon, 400).is_none());
    }

    #[test]
    fn test_current_show_skips_malformed_entry() {
        let entries = vec![
            entry("monday", "not a time", "09:00", 1),
            entry("monday", "06:00", "09:00", 2),
        ];
        let hit = current_show(&entries, Weekday::Mon, 400).unwrap();
        assert_eq!(hit.dj_ref, 2);
    }

    #[test]
    fn test_current_show_overlap_keeps_first() {
        let entries = vec![
            entry("monday", "06:00", "10:00", 1),
            entry("monday", "08:00", "11:00", 2),
        ];
        let hit = current_show(&entries, Weekday::Mon, 540).unwrap();
        assert_eq!(hit.dj_ref, 1);
    }

    #[test]
    fn test_current_show_ampm_and_iso_entries() {
        let entries = vec![
            entry("friday", "11 PM", "2 AM", 7),
            entry("saturday", "2025-11-08T10:00:00.000Z", "2025-11-08T12:00:00.000Z", 8),
        ];
        assert_eq!(current_show(&entries, Weekday::Fri, 1400).unwrap().dj_ref, 7);
        assert_eq!(current_show(&entries, Weekday::Sat, 630).unwrap().dj_ref, 8);
    }

    #[test]
    fn test_bucket_day_assigns_by_start() {
        let entries = vec![
            entry("monday", "06:00", "09:00", 1),  // Early
            entry("monday", "08:00", "10:00", 2),  // Early (start rules, even though it runs past 9)
            entry("monday", "12:00", "14:00", 3),  // Daytime
            entry("monday", "22:00", "01:00", 4),  // Evening, overnight
            entry("tuesday", "12:00", "14:00", 5), // other day
        ];
        let columns = bucket_day(&entries, Weekday::Mon, &house_buckets());
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].name, "Early");
        let refs: Vec<u64> = columns[0].shows.iter().map(|s| s.dj_ref).collect();
        assert_eq!(refs, vec![1, 2]);
        assert_eq!(columns[1].shows.len(), 1);
        assert_eq!(columns[1].shows[0].dj_ref, 3);
        assert_eq!(columns[2].shows.len(), 1);
        assert_eq!(columns[2].shows[0].dj_ref, 4);
    }

    #[test]
    fn test_bucket_day_drops_uncovered_start() {
        // A boundary set with a hole: [0,360) and [540,1440).
        let buckets = vec![
            DayBucket { name: "Overnight", start: 0, end: 360 },
            DayBucket { name: "Rest", start: 540, end: 1440 },
        ];
        let entries = vec![entry("monday", "07:00", "09:00", 1)];
        let columns = bucket_day(&entries, Weekday::Mon, &buckets);
        assert!(columns.iter().all(|c| c.shows.is_empty()));
    }

    #[test]
    fn test_schedule_entry_deserializes_cms_shape() {
        let json = r#"{
            "dayOfWeek": "monday",
            "startTime": "06:00",
            "endTime": "09:00",
            "djRef": 12,
            "showName": "The Morning Mix",
            "slug": "the-morning-mix"
        }"#;
        let e: ScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.dj_ref, 12);
        assert!(e.is_active); // defaulted
        assert_eq!(e.window().unwrap(), ShowWindow { start: 360, end: 540 });
        assert_eq!(e.weekday().unwrap(), Weekday::Mon);
    }
}
