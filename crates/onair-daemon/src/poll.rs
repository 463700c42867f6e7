//! CMS and live-signal polling clients.
//!
//! The engine is always safe to call with stale inputs, so every fetch
//! failure here logs at warn and leaves the previous state in place rather
//! than tearing anything down.

use std::time::Duration;

use anyhow::Result;
use onair_core::roster::split_dj_show;
use onair_core::{Member, NowPlaying, ScheduleEntry};
use tracing::{info, warn};

use crate::config::{CmsConfig, LiveConfig};
use crate::state::StateManager;

/// Fetch the full member roster from the CMS.
///
/// Rows that fail to decode are skipped individually so one malformed
/// record can't empty the roster.
pub async fn fetch_roster(client: &reqwest::Client, base_url: &str) -> Result<Vec<Member>> {
    let url = format!("{}/listeners?limit=1000", base_url);
    let resp: serde_json::Value = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(decode_docs(&resp, "member"))
}

/// Fetch the weekly schedule table from the CMS.
pub async fn fetch_schedule(client: &reqwest::Client, base_url: &str) -> Result<Vec<ScheduleEntry>> {
    let url = format!("{}/schedule?limit=1000", base_url);
    let resp: serde_json::Value = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(decode_docs(&resp, "schedule entry"))
}

fn decode_docs<T: serde::de::DeserializeOwned>(resp: &serde_json::Value, what: &str) -> Vec<T> {
    let docs = resp["docs"].as_array().cloned().unwrap_or_default();
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        match serde_json::from_value::<T>(doc) {
            Ok(v) => out.push(v),
            Err(e) => warn!("[cms] skipping malformed {} record: {}", what, e),
        }
    }
    out
}

/// Fetch the live now-playing signal from the broadcast automation.
pub async fn fetch_now_playing(client: &reqwest::Client, url: &str) -> Result<NowPlaying> {
    let resp: serde_json::Value = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(decode_now_playing(&resp))
}

/// Pick the dj/show fields out of a now-playing payload. The automation
/// sometimes packs both into the dj field as "DJ Name: Show Name".
pub fn decode_now_playing(v: &serde_json::Value) -> NowPlaying {
    let dj = v["dj"].as_str().unwrap_or("");
    let show = v["show"].as_str().unwrap_or("");
    let names = split_dj_show(dj, show);
    NowPlaying {
        dj: names.dj_name,
        show: names.show_name,
    }
}

/// One-shot startup load; failures are non-fatal (the refresh loops retry).
pub async fn initial_load(client: &reqwest::Client, cms: &CmsConfig, state: &StateManager) {
    match fetch_roster(client, &cms.base_url).await {
        Ok(roster) => {
            info!("[cms] loaded {} members", roster.len());
            state.set_roster(roster).await;
        }
        Err(e) => warn!("[cms] initial roster fetch failed: {}", e),
    }
    match fetch_schedule(client, &cms.base_url).await {
        Ok(schedule) => {
            info!("[cms] loaded {} schedule entries", schedule.len());
            state.set_schedule(schedule).await;
        }
        Err(e) => warn!("[cms] initial schedule fetch failed: {}", e),
    }
}

/// Periodically re-fetch roster and schedule.
pub fn start_cms_refresh(
    client: reqwest::Client,
    cms: CmsConfig,
    state: StateManager,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(cms.refresh_secs.max(60)));
        interval.tick().await; // initial_load already ran
        loop {
            interval.tick().await;
            match fetch_roster(&client, &cms.base_url).await {
                Ok(roster) => state.set_roster(roster).await,
                Err(e) => warn!("[cms] roster refresh failed, keeping previous: {}", e),
            }
            match fetch_schedule(&client, &cms.base_url).await {
                Ok(schedule) => state.set_schedule(schedule).await,
                Err(e) => warn!("[cms] schedule refresh failed, keeping previous: {}", e),
            }
        }
    })
}

/// Poll the live now-playing feed.
pub fn start_live_poll(
    client: reqwest::Client,
    live: LiveConfig,
    state: StateManager,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(live.poll_secs.max(1)));
        loop {
            interval.tick().await;
            match fetch_now_playing(&client, &live.playlist_url).await {
                Ok(np) => state.set_live(Some(np)).await,
                Err(e) => warn!("[live] poll failed, keeping last signal: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_now_playing_with_explicit_show() {
        let payload = json!({
            "dj": "Sarah K",
            "show": "The Early Riser",
            "artist": "Broadcast",
            "track": "Come On Let's Go"
        });
        let np = decode_now_playing(&payload);
        assert_eq!(np.dj, "Sarah K");
        assert_eq!(np.show, "The Early Riser");
    }

    #[test]
    fn test_decode_now_playing_splits_colon_form() {
        let payload = json!({ "dj": "Sarah K: The Early Riser", "show": "" });
        let np = decode_now_playing(&payload);
        assert_eq!(np.dj, "Sarah K");
        assert_eq!(np.show, "The Early Riser");
    }

    #[test]
    fn test_decode_now_playing_tolerates_missing_fields() {
        let np = decode_now_playing(&json!({ "artist": "Stereolab" }));
        assert_eq!(np.dj, "");
        assert_eq!(np.show, "");
    }

    #[test]
    fn test_decode_docs_skips_malformed_rows() {
        let payload = json!({
            "docs": [
                { "id": 1, "djName": "Sarah K" },
                { "djName": "No Id" },
                { "id": 2, "djName": "Marco", "showTime": "Fri 11pm - 2am" }
            ]
        });
        let members: Vec<Member> = decode_docs(&payload, "member");
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, 1);
        assert_eq!(members[1].show_time.as_deref(), Some("Fri 11pm - 2am"));
    }
}
