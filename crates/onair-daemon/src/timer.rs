//! Strategic recompute timer.
//!
//! Re-resolving on every UI poll causes visible flicker near show
//! boundaries, so the daemon wakes only at the instants where the schedule
//! answer can actually change: the top of each hour, the first few minutes
//! after it (late schedule flips), and the half-hour mark. The engine has no
//! notion of a next wake time and is always safe to call redundantly; this
//! task is the only thing that owns scheduling.

use std::time::Duration;

use chrono::{Local, Timelike};
use tracing::debug;

use crate::state::StateManager;

/// Minutes within the hour worth waking at.
const WAKE_MINUTES: [u32; 5] = [0, 1, 2, 3, 30];

/// How long to sleep from `minute:second` until the next strategic instant.
pub fn next_wake_delay(minute: u32, second: u32) -> Duration {
    let now = minute * 60 + second;
    let next = WAKE_MINUTES
        .iter()
        .map(|m| m * 60)
        .find(|&t| t > now)
        .unwrap_or(3600); // top of the next hour
    Duration::from_secs(u64::from(next - now))
}

/// A cancellable, restartable refresh task. Dropping it stops the loop.
pub struct RefreshTimer {
    handle: tokio::task::JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start(state: StateManager) -> Self {
        Self {
            handle: spawn_loop(state),
        }
    }

    /// Cancel the current loop and start a fresh one.
    pub fn restart(&mut self, state: StateManager) {
        self.handle.abort();
        self.handle = spawn_loop(state);
    }
}

fn spawn_loop(state: StateManager) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Local::now();
            let delay = next_wake_delay(now.minute(), now.second());
            debug!("[timer] next resolve in {:?}", delay);
            tokio::time::sleep(delay).await;
            state.resolve_now().await;
        }
    })
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_to_half_hour() {
        assert_eq!(next_wake_delay(15, 0), Duration::from_secs(15 * 60));
        assert_eq!(next_wake_delay(29, 30), Duration::from_secs(30));
    }

    #[test]
    fn test_delay_to_top_of_hour() {
        assert_eq!(next_wake_delay(30, 0), Duration::from_secs(30 * 60));
        assert_eq!(next_wake_delay(45, 15), Duration::from_secs(14 * 60 + 45));
    }

    #[test]
    fn test_post_hour_instants() {
        // Right at the top of the hour the next wake is minute 1, then 2, 3.
        assert_eq!(next_wake_delay(0, 0), Duration::from_secs(60));
        assert_eq!(next_wake_delay(1, 0), Duration::from_secs(60));
        assert_eq!(next_wake_delay(3, 0), Duration::from_secs(27 * 60));
        assert_eq!(next_wake_delay(0, 59), Duration::from_secs(1));
    }
}
