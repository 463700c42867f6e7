//! HTTP API for UI consumers.
//!
//! Three read-only endpoints over the shared station state: who is on air,
//! the bucketed day grid, and a calendar file body for a member's recurring
//! show. Normalization failures come back as 422 with a human-readable
//! notice, since a calendar export that silently does nothing is worse than a
//! visible error.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use onair_core::schedule::{bucket_day, house_buckets};
use onair_core::{ics, project, timefmt};

use crate::state::StateManager;

async fn onair(State(state): State<StateManager>) -> impl IntoResponse {
    let snap = state.snapshot().await;
    Json(serde_json::json!({
        "rev": snap.rev,
        "member": snap.resolved.member,
        "source": snap.resolved.source,
    }))
}

async fn schedule_day(
    Path(day): Path<String>,
    State(state): State<StateManager>,
) -> Response {
    let day = match timefmt::parse_weekday(&day) {
        Ok(d) => d,
        Err(e) => return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    };
    let snap = state.snapshot().await;
    let columns = bucket_day(&snap.schedule, day, &house_buckets());
    Json(columns).into_response()
}

#[derive(Debug, Deserialize)]
struct CalendarQuery {
    /// Which legacy slot to export for multi-slot DJs; defaults to the first.
    #[serde(default)]
    slot: usize,
}

async fn calendar(
    Path(member_id): Path<u64>,
    Query(query): Query<CalendarQuery>,
    State(state): State<StateManager>,
) -> Response {
    let snap = state.snapshot().await;
    let Some(member) = snap.roster.iter().find(|m| m.id == member_id) else {
        return (StatusCode::NOT_FOUND, "no such member").into_response();
    };
    let Some(show_time) = member.show_time.as_deref() else {
        return (StatusCode::NOT_FOUND, "member has no scheduled show").into_response();
    };
    let dj_name = member
        .dj_name
        .clone()
        .unwrap_or_else(|| format!("member {}", member.id));

    let slots = match project::parse_show_slots(show_time) {
        Ok(s) => s,
        Err(e) => return calendar_failure(member_id, e),
    };
    let Some(&slot) = slots.get(query.slot) else {
        return (
            StatusCode::NOT_FOUND,
            format!("slot {} out of range ({} slots)", query.slot, slots.len()),
        )
            .into_response();
    };

    let now = chrono::Local::now().naive_local();
    let occurrence =
        match project::next_occurrence_for_slot(&dj_name, member.show_name.as_deref(), slot, now) {
            Ok(o) => o,
            Err(e) => return calendar_failure(member_id, e),
        };

    let body = ics::vcalendar_body(&occurrence, now);
    let filename = ics::attachment_filename(&occurrence);
    (
        [
            (
                header::CONTENT_TYPE,
                "text/calendar;charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

fn calendar_failure(member_id: u64, e: onair_core::ScheduleError) -> Response {
    warn!("[http] calendar export failed for member {}: {}", member_id, e);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("couldn't create calendar event, check the show time format ({})", e),
    )
        .into_response()
}

pub fn start_server(
    bind_address: String,
    port: u16,
    state: StateManager,
) -> tokio::task::JoinHandle<()> {
    let app = Router::new()
        .route("/api/onair", get(onair))
        .route("/api/schedule/:day", get(schedule_day))
        .route("/api/calendar/:member_id", get(calendar))
        .layer(CorsLayer::permissive())
        .with_state(state);

    tokio::spawn(async move {
        let addr = format!("{}:{}", bind_address, port);
        info!("HTTP API listening on http://{}", addr);
        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                warn!("Failed to bind HTTP API on {}: {}", addr, e);
                return;
            }
        };
        if let Err(e) = axum::serve(listener, app).await {
            warn!("HTTP API error: {}", e);
        }
    })
}
