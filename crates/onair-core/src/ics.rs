//! iCalendar body rendering for recurring show occurrences.
//!
//! One VEVENT per occurrence with a weekly RRULE; the VTIMEZONE block pins
//! the station zone so subscribers in other zones see the show at the right
//! local time. Writing the body to disk or triggering a download is the
//! caller's business; this module only produces text.

use chrono::NaiveDateTime;

use crate::project::Occurrence;

pub const STATION_TZID: &str = "America/Chicago";

/// Render a complete VCALENDAR body for one occurrence.
///
/// `dtstamp` is the generation instant (station wall time), passed in so the
/// renderer stays pure.
pub fn vcalendar_body(occ: &Occurrence, dtstamp: NaiveDateTime) -> String {
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//CHIRP Radio//DJ Show Calendar//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "X-WR-CALNAME:CHIRP Radio DJ Shows".to_string(),
        format!("X-WR-TIMEZONE:{}", STATION_TZID),
        "BEGIN:VTIMEZONE".to_string(),
        format!("TZID:{}", STATION_TZID),
        "BEGIN:STANDARD".to_string(),
        "DTSTART:19701101T020000".to_string(),
        "RRULE:FREQ=YEARLY;BYMONTH=11;BYDAY=1SU".to_string(),
        "TZOFFSETFROM:-0500".to_string(),
        "TZOFFSETTO:-0600".to_string(),
        "END:STANDARD".to_string(),
        "BEGIN:DAYLIGHT".to_string(),
        "DTSTART:19700308T020000".to_string(),
        "RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=2SU".to_string(),
        "TZOFFSETFROM:-0600".to_string(),
        "TZOFFSETTO:-0500".to_string(),
        "END:DAYLIGHT".to_string(),
        "END:VTIMEZONE".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@chirpradio.org", occ.uid_slug),
        format!("DTSTAMP:{}", ics_stamp(dtstamp)),
        format!("DTSTART;TZID={}:{}", STATION_TZID, ics_stamp(occ.start)),
        format!("DTEND;TZID={}:{}", STATION_TZID, ics_stamp(occ.end)),
        format!("SUMMARY:{}", occ.title),
        format!("DESCRIPTION:{}", occ.description),
        "LOCATION:CHIRP Radio - chirpradio.org".to_string(),
        "STATUS:CONFIRMED".to_string(),
        "RRULE:FREQ=WEEKLY".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];
    lines.join("\r\n")
}

/// Download filename the station uses for a show's calendar file.
pub fn attachment_filename(occ: &Occurrence) -> String {
    format!("chirp-{}.ics", occ.uid_slug)
}

fn ics_stamp(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}
