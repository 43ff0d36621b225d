//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/courts", get(courts_handler))
        .route("/courts/:index", get(court_handler))
        .route("/courts/:index/toggle", post(toggle_handler))
        .route("/courts/:index/shuttles", post(shuttles_handler))
        .route("/courts/:index/reset", post(reset_handler))
        .route("/settings", get(get_settings_handler).post(update_settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
