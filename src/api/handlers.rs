//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{AppState, Court, CourtStatus, SettingsQuery};
use super::responses::{
    CourtResponse, CourtView, HealthResponse, SettingsResponse, ShuttleChange, StatusResponse,
};

/// Turn a court action result into a response, logging failures
fn court_response(
    result: Result<Option<Court>, String>,
    index: usize,
    message: &str,
) -> Result<Json<CourtResponse>, StatusCode> {
    match result {
        Ok(Some(court)) => {
            info!("Court {}: {}", court.number(), message);
            Ok(Json(CourtResponse::new(message.to_string(), &court)))
        }
        Ok(None) => {
            warn!("No court at index {}", index);
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            error!("Failed to update court at index {}: {}", index, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /courts - List every court
pub async fn courts_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CourtView>>, StatusCode> {
    match state.get_courts() {
        Ok(courts) => Ok(Json(courts.iter().map(CourtView::from).collect())),
        Err(e) => {
            error!("Failed to get courts: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /courts/:index - Show one court
pub async fn court_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<CourtView>, StatusCode> {
    match state.get_court(index) {
        Ok(Some(court)) => Ok(Json(CourtView::from(&court))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to get court at index {}: {}", index, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /courts/:index/toggle - Pause, continue or clear the timer
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<CourtResponse>, StatusCode> {
    let before = state.get_court(index).ok().flatten().map(|court| court.status());
    let result = state.toggle_court(index);
    let after = result.as_ref().ok().and_then(Option::as_ref).map(Court::status);
    let message = match (before, after) {
        (Some(CourtStatus::Counting), Some(CourtStatus::Paused)) => "Timer paused",
        (Some(CourtStatus::Paused), Some(CourtStatus::Counting)) => "Timer continued",
        (Some(CourtStatus::Done), Some(CourtStatus::Blank)) => "Timer cleared",
        _ => "Timer unchanged",
    };
    court_response(result, index, message)
}

/// Handle POST /courts/:index/shuttles - Change the shuttle count
pub async fn shuttles_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(change): Json<ShuttleChange>,
) -> Result<Json<CourtResponse>, StatusCode> {
    let result = state.add_shuttles(index, change.delta);
    let message = format!("Shuttle count changed by {}", change.delta);
    court_response(result, index, &message)
}

/// Handle POST /courts/:index/reset - Start a fresh warmup
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<CourtResponse>, StatusCode> {
    court_response(state.reset_court(index), index, "Warmup started")
}

/// Handle GET /settings - Show settings and their query string
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<SettingsResponse>, StatusCode> {
    match state.get_settings() {
        Ok(settings) => Ok(Json(SettingsResponse::from(settings))),
        Err(e) => {
            error!("Failed to get settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /settings?courtCount=&warmupTime= - Apply settings and resize
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SettingsQuery>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    match state.apply_settings_query(&query) {
        Ok(settings) => {
            info!("Settings endpoint called - now {}", settings.to_query());
            Ok(Json(SettingsResponse::from(settings)))
        }
        Err(e) => {
            error!("Failed to apply settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let settings = match state.get_settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let courts = match state.get_courts() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get courts: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let count = |status: CourtStatus| courts.iter().filter(|c| c.status() == status).count();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        court_count: courts.len(),
        warmup_minutes: settings.warmup_minutes,
        counting: count(CourtStatus::Counting),
        paused: count(CourtStatus::Paused),
        done: count(CourtStatus::Done),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
