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
        .route("/study/start", post(start_handler))
        .route("/study/pause", post(study_pause_handler))
        .route("/study/reset", post(reset_handler))
        .route("/study/reset/confirm", post(reset_confirm_handler))
        .route("/break/take", post(take_break_handler))
        .route("/break/pause", post(break_pause_handler))
        .route("/break/skip", post(skip_break_handler))
        .route("/shortcut", post(shortcut_handler))
        .route("/sessions", get(sessions_handler))
        .route("/sessions/clear", post(clear_sessions_handler))
        .route("/sessions/clear/confirm", post(clear_sessions_confirm_handler))
        .route("/stats", get(stats_handler))
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
