//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{Court, CourtStatus, Settings},
    utils::format_millis,
};

/// Everything a client needs to draw one court
#[derive(Debug, Clone, Serialize)]
pub struct CourtView {
    pub index: usize,
    pub number: usize,
    pub status: CourtStatus,
    pub remaining_ms: Option<u64>,
    pub display: String,
    pub paused: bool,
    pub shuttle_count: u32,
    pub toggle_label: String,
    pub toggle_enabled: bool,
}

impl From<&Court> for CourtView {
    fn from(court: &Court) -> Self {
        let status = court.status();
        Self {
            index: court.index(),
            number: court.number(),
            status,
            remaining_ms: court.remaining_ms(),
            display: format_millis(court.remaining_ms()),
            paused: court.is_paused(),
            shuttle_count: court.shuttle_count(),
            toggle_label: status.toggle_label().to_string(),
            toggle_enabled: status.toggle_enabled(),
        }
    }
}

/// API response structure for court action endpoints
#[derive(Debug, Clone, Serialize)]
pub struct CourtResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub court: CourtView,
}

impl CourtResponse {
    pub fn new(message: String, court: &Court) -> Self {
        Self {
            message,
            timestamp: Utc::now(),
            court: CourtView::from(court),
        }
    }
}

/// Request body for changing the shuttle count
#[derive(Debug, Clone, Deserialize)]
pub struct ShuttleChange {
    pub delta: i64,
}

/// Current settings plus the query string that reproduces them
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub court_count: usize,
    pub warmup_time: u64,
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Settings> for SettingsResponse {
    fn from(settings: Settings) -> Self {
        Self {
            court_count: settings.court_count,
            warmup_time: settings.warmup_minutes,
            query: settings.to_query(),
            timestamp: Utc::now(),
        }
    }
}

/// Overall status with per-status court counts
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub court_count: usize,
    pub warmup_minutes: u64,
    pub counting: usize,
    pub paused: usize,
    pub done: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
