//! HTTP endpoint handlers

use std::{io, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use tokio::time::Instant;
use tracing::{error, info};

use super::responses::{HealthResponse, HomePage, StatusResponse};
use crate::state::{AppState, GateState};

/// Handle /brew - press brew and redirect to the brew number page
pub async fn brew_handler(State(state): State<Arc<AppState>>) -> Redirect {
    let outcome = state.controller.trigger_brew();
    match outcome.brew_count {
        Some(count) if outcome.accepted => {
            state.record_action("brew");
            info!("Brew endpoint called - brewing coffee number {}", count);
            Redirect::temporary(&format!("/n{}", count))
        }
        _ => Redirect::temporary("/"),
    }
}

/// Handle /start - press power only
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Redirect {
    if state.controller.trigger_power().accepted {
        state.record_action("power");
        Redirect::temporary("/s")
    } else {
        Redirect::temporary("/")
    }
}

/// Handle /both - power on, wait for boot, then brew
pub async fn both_handler(State(state): State<Arc<AppState>>) -> Redirect {
    if state.controller.trigger_combined().accepted {
        state.record_action("power-and-brew");
        Redirect::temporary("/b")
    } else {
        Redirect::temporary("/")
    }
}

/// Handle GET / - status page without a message
pub async fn home_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    render_page(&state, "")
}

/// Handle GET /:page - status page for a redirect target
pub async fn page_handler(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Html<String> {
    render_page(&state, &page)
}

fn render_page(state: &AppState, page: &str) -> Html<String> {
    let boot_secs = state.controller.timings().boot.as_secs();
    Html(HomePage::for_page(state.controller.brew_count(), page, boot_secs).render())
}

/// Handle GET /data/:file - export the raw brew log
pub async fn data_handler(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
) -> Response {
    if file != "data.csv" {
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.controller.log().read_raw().await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "text/csv")], bytes).into_response(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("Failed to read brew log: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle GET /status - Return current controller status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let controller = &state.controller;
    let (busy_with, busy_for_seconds) = match controller.gate_state() {
        GateState::Idle => (None, None),
        GateState::Busy { holder, since } => (
            Some(holder.name().to_string()),
            Some(Instant::now().duration_since(since).as_secs()),
        ),
    };
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        busy: busy_with.is_some(),
        busy_with,
        busy_for_seconds,
        brew_count: controller.brew_count(),
        failed_log_writes: controller.log().failed_writes(),
        active_tasks: controller.supervisor().active(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
