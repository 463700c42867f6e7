//! Member roster and live-vs-scheduled reconciliation.
//!
//! The broadcast automation reports a free-text DJ name that often diverges
//! from the schedule table (substitutions happen without schedule edits), so
//! the live signal strictly overrides the static schedule. Matching against
//! the roster is exact-then-fuzzy with a deterministic tie-break, so the same
//! roster/live-name pair always resolves to the same member.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleEntry;

/// A DJ/staff profile from the CMS. Read-only input; the CMS owns lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: u64,
    #[serde(default)]
    pub dj_name: Option<String>,
    #[serde(default)]
    pub show_name: Option<String>,
    /// Legacy free-text slot list, possibly comma-joined
    /// ("Mon 6am - 9am, Thu 6am - 9am").
    #[serde(default)]
    pub show_time: Option<String>,
}

/// Ephemeral live signal from the streaming/automation system. Arrives per
/// poll cycle; never persisted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    #[serde(default)]
    pub dj: String,
    #[serde(default)]
    pub show: String,
}

/// How the on-air member was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnAirSource {
    LiveExactMatch,
    LivePartialMatch,
    ScheduledFallback,
    None,
}

/// Best guess for "who is on air", with how we decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOnAir {
    pub member: Option<Member>,
    pub source: OnAirSource,
}

/// Reconcile the live signal, the currently scheduled entry, and the roster.
///
/// Order is load-bearing:
/// 1. no live name → scheduled member (`ScheduledFallback`) or `None`;
/// 2. exact case-insensitive trimmed match on `djName` → `LiveExactMatch`,
///    regardless of what the schedule says;
/// 3. bidirectional substring containment → `LivePartialMatch`, preferring
///    the longest roster `djName`, ties broken by roster order;
/// 4. otherwise fall back to the schedule.
pub fn resolve_on_air(
    live: Option<&NowPlaying>,
    scheduled: Option<&ScheduleEntry>,
    roster: &[Member],
) -> ResolvedOnAir {
    let live_name = live.map(|l| l.dj.trim()).unwrap_or("");
    if live_name.is_empty() {
        return scheduled_fallback(scheduled, roster);
    }
    let needle = live_name.to_lowercase();

    for member in roster {
        if let Some(name) = normalized_dj_name(member) {
            if name == needle {
                return ResolvedOnAir {
                    member: Some(member.clone()),
                    source: OnAirSource::LiveExactMatch,
                };
            }
        }
    }

    // Partial pass: longest djName is the most specific match. Strict
    // greater-than keeps the earliest roster row on ties.
    let mut best: Option<&Member> = None;
    let mut best_len = 0usize;
    for member in roster {
        let Some(name) = normalized_dj_name(member) else {
            continue;
        };
        if (needle.contains(&name) || name.contains(&needle)) && name.len() > best_len {
            best_len = name.len();
            best = Some(member);
        }
    }
    if let Some(member) = best {
        return ResolvedOnAir {
            member: Some(member.clone()),
            source: OnAirSource::LivePartialMatch,
        };
    }

    scheduled_fallback(scheduled, roster)
}

fn scheduled_fallback(scheduled: Option<&ScheduleEntry>, roster: &[Member]) -> ResolvedOnAir {
    let member = scheduled.and_then(|e| roster.iter().find(|m| m.id == e.dj_ref));
    match member {
        Some(m) => ResolvedOnAir {
            member: Some(m.clone()),
            source: OnAirSource::ScheduledFallback,
        },
        None => ResolvedOnAir {
            member: None,
            source: OnAirSource::None,
        },
    }
}

fn normalized_dj_name(member: &Member) -> Option<String> {
    let name = member.dj_name.as_deref()?.trim();
    if name.is_empty() {
        // An empty needle would contain-match every live name.
        return None;
    }
    Some(name.to_lowercase())
}

// ── DJ/show name splitting ────────────────────────────────────────────────────

/// DJ and show names as the UI wants them.
#[derive(Debug, Clone, PartialEq)]
pub struct DjShowNames {
    pub dj_name: String,
    pub show_name: String,
}

/// The automation sometimes reports "DJ Name: Show Name" in the dj field
/// with no separate show field. Prefer an explicit show name; else split on
/// the first colon (the remainder keeps any further colons); else the dj
/// name stands alone.
pub fn split_dj_show(dj_from_api: &str, show_from_api: &str) -> DjShowNames {
    let dj = dj_from_api.trim();
    let show = show_from_api.trim();

    if !show.is_empty() {
        return DjShowNames {
            dj_name: dj.to_string(),
            show_name: show.to_string(),
        };
    }

    if let Some((name, rest)) = dj.split_once(':') {
        return DjShowNames {
            dj_name: name.trim().to_string(),
            show_name: rest.trim().to_string(),
        };
    }

    DjShowNames {
        dj_name: dj.to_string(),
        show_name: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u64, dj_name: Option<&str>) -> Member {
        Member {
            id,
            dj_name: dj_name.map(|s| s.to_string()),
            show_name: None,
            show_time: None,
        }
    }

    fn sched(dj_ref: u64) -> ScheduleEntry {
        ScheduleEntry {
            day_of_week: "monday".to_string(),
            start_time: "06:00".to_string(),
            end_time: "09:00".to_string(),
            dj_ref,
            dj_name: None,
            show_name: None,
            slug: None,
            is_active: true,
        }
    }

    fn live(dj: &str) -> NowPlaying {
        NowPlaying {
            dj: dj.to_string(),
            show: String::new(),
        }
    }

    #[test]
    fn test_exact_match_overrides_schedule() {
        let roster = vec![member(1, Some("Anna Flores")), member(2, Some("Sarah K"))];
        let scheduled = sched(2);
        let resolved = resolve_on_air(Some(&live("  anna flores ")), Some(&scheduled), &roster);
        assert_eq!(resolved.source, OnAirSource::LiveExactMatch);
        assert_eq!(resolved.member.unwrap().id, 1);
    }

    #[test]
    fn test_partial_match_bidirectional() {
        let roster = vec![member(1, Some("Anna Flores"))];
        // Roster name contained in the live string.
        let r = resolve_on_air(Some(&live("DJ Anna Flores")), None, &roster);
        assert_eq!(r.source, OnAirSource::LivePartialMatch);
        assert_eq!(r.member.unwrap().id, 1);
        // Live string contained in the roster name.
        let r = resolve_on_air(Some(&live("Flores")), None, &roster);
        assert_eq!(r.source, OnAirSource::LivePartialMatch);
    }

    #[test]
    fn test_partial_match_prefers_longest_then_input_order() {
        let roster = vec![
            member(1, Some("Anna")),
            member(2, Some("Anna Flores")),
            member(3, Some("Lena Flores")), // same length as Anna Flores
        ];
        let r = resolve_on_air(Some(&live("DJ Anna Flores and Lena Flores")), None, &roster);
        assert_eq!(r.member.unwrap().id, 2); // longest wins, tie to earlier row
    }

    #[test]
    fn test_no_live_falls_back_to_schedule() {
        let roster = vec![member(1, Some("Sarah K"))];
        let scheduled = sched(1);
        let r = resolve_on_air(None, Some(&scheduled), &roster);
        assert_eq!(r.source, OnAirSource::ScheduledFallback);
        assert_eq!(r.member.unwrap().id, 1);

        let r = resolve_on_air(Some(&live("   ")), Some(&scheduled), &roster);
        assert_eq!(r.source, OnAirSource::ScheduledFallback);
    }

    #[test]
    fn test_unmatched_live_falls_back_to_schedule() {
        let roster = vec![member(1, Some("Sarah K"))];
        let scheduled = sched(1);
        let r = resolve_on_air(Some(&live("Mystery Guest")), Some(&scheduled), &roster);
        assert_eq!(r.source, OnAirSource::ScheduledFallback);
        assert_eq!(r.member.unwrap().id, 1);
    }

    #[test]
    fn test_nothing_resolves_to_none() {
        let r = resolve_on_air(None, None, &[]);
        assert_eq!(r.source, OnAirSource::None);
        assert!(r.member.is_none());

        // Scheduled entry pointing at a member missing from the roster.
        let roster = vec![member(1, Some("Sarah K"))];
        let r = resolve_on_air(None, Some(&sched(99)), &roster);
        assert_eq!(r.source, OnAirSource::None);
    }

    #[test]
    fn test_members_without_dj_name_never_match() {
        let roster = vec![member(1, None), member(2, Some("   ")), member(3, Some("Sarah K"))];
        let r = resolve_on_air(Some(&live("Sarah K")), None, &roster);
        assert_eq!(r.member.unwrap().id, 3);
        assert_eq!(r.source, OnAirSource::LiveExactMatch);
    }

    #[test]
    fn test_source_tags_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_string(&OnAirSource::LiveExactMatch).unwrap(),
            "\"live-exact-match\""
        );
        assert_eq!(
            serde_json::to_string(&OnAirSource::ScheduledFallback).unwrap(),
            "\"scheduled-fallback\""
        );
    }

    #[test]
    fn test_split_dj_show() {
        let r = split_dj_show("Sarah K: The Early Riser", "");
        assert_eq!(r.dj_name, "Sarah K");
        assert_eq!(r.show_name, "The Early Riser");

        // Explicit show name wins; colon in dj field left alone.
        let r = split_dj_show("Sarah K: whatever", "Morning Drive");
        assert_eq!(r.dj_name, "Sarah K: whatever");
        assert_eq!(r.show_name, "Morning Drive");

        // Extra colons stay in the show name.
        let r = split_dj_show("Sarah K: Mix: Volume 2", "");
        assert_eq!(r.show_name, "Mix: Volume 2");

        let r = split_dj_show("Sarah K", "");
        assert_eq!(r.dj_name, "Sarah K");
        assert_eq!(r.show_name, "");
    }
}
