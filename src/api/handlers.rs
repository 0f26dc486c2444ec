//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{
    ApiError, ApiResponse, ApiResult, ClearHistoryResponse, HealthResponse, HistoryQuery,
    HistoryResponse, SettingsResponse, ShortcutRequest, ShortcutResponse, StatusResponse,
};
use crate::{
    shortcuts::{self, Key},
    state::{
        AppState, CommandError, Confirmation, SessionStats, Settings, SettingsUpdate, TimerSnapshot,
    },
};

/// Sessions returned by `GET /sessions` without a limit
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

fn log_failure(action: &str, e: &CommandError) {
    if e.is_rejection() {
        warn!("Rejected {}: {}", action, e);
    } else {
        error!("Failed to {}: {}", action, e);
    }
}

/// Turn a command result into the standard response
fn command_response(
    action: &str,
    result: Result<TimerSnapshot, CommandError>,
    message: &str,
) -> ApiResult<ApiResponse> {
    match result {
        Ok(timer) => Ok(Json(ApiResponse::ok(message.to_string(), timer))),
        Err(e) => {
            log_failure(action, &e);
            Err(ApiError(e))
        }
    }
}

/// Handle POST /study/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    command_response("start", state.start_study(), "Study session started")
}

/// Handle POST /study/pause - toggles pause and resume
pub async fn study_pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let result = state.toggle_study_pause();
    let message = match &result {
        Ok(timer) if timer.study_paused => "Study paused",
        _ => "Study resumed",
    };
    command_response("study-pause", result, message)
}

/// Handle POST /study/reset - may ask for confirmation
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    match state.request_reset() {
        Ok(Confirmation::Done(timer)) => {
            Ok(Json(ApiResponse::ok("Timer reset".to_string(), timer)))
        }
        Ok(Confirmation::Required(message)) => {
            info!("Reset awaiting confirmation");
            let timer = state.snapshot()?;
            Ok(Json(ApiResponse::confirm(message, timer)))
        }
        Err(e) => {
            log_failure("reset", &e);
            Err(ApiError(e))
        }
    }
}

/// Handle POST /study/reset/confirm
pub async fn reset_confirm_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    command_response("reset", state.confirm_reset(), "Timer reset")
}

/// Handle POST /break/take
pub async fn take_break_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    command_response("take-break", state.take_break(), "Break started")
}

/// Handle POST /break/pause - toggles pause and resume
pub async fn break_pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let result = state.toggle_break_pause();
    let message = match &result {
        Ok(timer) if timer.break_paused => "Break paused",
        _ => "Break resumed",
    };
    command_response("break-pause", result, message)
}

/// Handle POST /break/skip
pub async fn skip_break_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    command_response("skip-break", state.skip_break(), "Break skipped")
}

/// Handle POST /shortcut - resolve a key press against the current mode
pub async fn shortcut_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ShortcutRequest>,
) -> ApiResult<ShortcutResponse> {
    let key: Key = request.key.parse().map_err(|e: CommandError| {
        log_failure("shortcut", &e);
        ApiError(e)
    })?;

    let current = state.snapshot()?;
    let mode = state.current_mode()?;
    let Some(command) = shortcuts::resolve(key, mode, current.can_take_break, request.context)
    else {
        return Ok(Json(ShortcutResponse {
            command: None,
            response: ApiResponse::ignored(
                format!("{:?} does nothing right now", key),
                current,
            ),
        }));
    };

    let response = match state.dispatch(command) {
        Ok(Confirmation::Done(timer)) => {
            ApiResponse::ok(format!("Ran {}", command.name()), timer)
        }
        Ok(Confirmation::Required(message)) => ApiResponse::confirm(message, state.snapshot()?),
        Err(e) => {
            log_failure(command.name(), &e);
            return Err(ApiError(e));
        }
    };

    Ok(Json(ShortcutResponse {
        command: Some(command),
        response,
    }))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let timer = state.snapshot().map_err(|e| {
        error!("Failed to get timer snapshot: {}", e);
        ApiError(e)
    })?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /sessions - newest first
pub async fn sessions_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<HistoryResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let sessions = state.recent_sessions(limit)?;
    let total = state.stats()?.sessions;
    Ok(Json(HistoryResponse { sessions, total }))
}

/// Handle POST /sessions/clear - only asks; nothing is removed yet
pub async fn clear_sessions_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ClearHistoryResponse> {
    let message = state.request_clear_history()?;
    Ok(Json(ClearHistoryResponse::new("confirm", message, 0)))
}

/// Handle POST /sessions/clear/confirm
pub async fn clear_sessions_confirm_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ClearHistoryResponse> {
    let removed = state.confirm_clear_history()?;
    Ok(Json(ClearHistoryResponse::new(
        "ok",
        "Study history cleared".to_string(),
        removed,
    )))
}

/// Handle GET /stats
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> ApiResult<SessionStats> {
    Ok(Json(state.stats()?))
}

/// Handle GET /settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> ApiResult<Settings> {
    Ok(Json(state.settings()?))
}

/// Handle PUT /settings - partial update
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<SettingsResponse> {
    let settings = state.update_settings(&update).map_err(|e| {
        log_failure("update settings", &e);
        ApiError(e)
    })?;
    let timer = state.snapshot()?;
    Ok(Json(SettingsResponse { settings, timer }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
