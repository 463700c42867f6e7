//! Shared station state.
//!
//! One snapshot behind an RwLock: the roster, the schedule table, the latest
//! live signal, and the resolved on-air answer. `rev` is a monotonically
//! increasing counter bumped on every write so HTTP clients can detect
//! missed updates. Every write re-resolves; the engine is pure and cheap,
//! so redundant resolution is always safe.

use std::sync::Arc;

use chrono::{Datelike, Local, Timelike};
use onair_core::roster::resolve_on_air;
use onair_core::schedule::current_show;
use onair_core::{Member, NowPlaying, OnAirSource, ResolvedOnAir, ScheduleEntry};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct StationState {
    pub rev: u64,
    pub roster: Vec<Member>,
    pub schedule: Vec<ScheduleEntry>,
    pub live: Option<NowPlaying>,
    pub resolved: ResolvedOnAir,
}

impl Default for StationState {
    fn default() -> Self {
        Self {
            rev: 0,
            roster: Vec::new(),
            schedule: Vec::new(),
            live: None,
            resolved: ResolvedOnAir {
                member: None,
                source: OnAirSource::None,
            },
        }
    }
}

/// Resolve "who is on air" for an explicit weekday/minute. Pure; the manager
/// feeds it the wall clock.
pub fn resolve_at(
    schedule: &[ScheduleEntry],
    roster: &[Member],
    live: Option<&NowPlaying>,
    day: chrono::Weekday,
    minutes: u32,
) -> ResolvedOnAir {
    let scheduled = current_show(schedule, day, minutes);
    resolve_on_air(live, scheduled, roster)
}

#[derive(Clone)]
pub struct StateManager {
    state: Arc<RwLock<StationState>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StationState::default())),
        }
    }

    pub async fn snapshot(&self) -> StationState {
        self.state.read().await.clone()
    }

    pub async fn set_roster(&self, roster: Vec<Member>) {
        let mut state = self.state.write().await;
        state.roster = roster;
        Self::resolve(&mut state);
    }

    pub async fn set_schedule(&self, schedule: Vec<ScheduleEntry>) {
        let mut state = self.state.write().await;
        state.schedule = schedule;
        Self::resolve(&mut state);
    }

    pub async fn set_live(&self, live: Option<NowPlaying>) {
        let mut state = self.state.write().await;
        state.live = live;
        Self::resolve(&mut state);
    }

    /// Recompute from the current wall clock without changing inputs. The
    /// strategic timer calls this at boundary instants.
    pub async fn resolve_now(&self) {
        let mut state = self.state.write().await;
        Self::resolve(&mut state);
    }

    fn resolve(state: &mut StationState) {
        let now = Local::now();
        let minutes = now.hour() * 60 + now.minute();
        let resolved = resolve_at(
            &state.schedule,
            &state.roster,
            state.live.as_ref(),
            now.weekday(),
            minutes,
        );
        state.resolved = resolved;
        state.rev += 1;
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}
