//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    shortcuts::ShortcutContext,
    state::{Command, CommandError, Session, Settings, TimerSnapshot},
};

/// API response structure for timer commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The command ran
    pub fn ok(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ok", message, timer)
    }

    /// Nothing changed; repeat with the confirm endpoint to go ahead
    pub fn confirm(message: String, timer: TimerSnapshot) -> Self {
        Self::new("confirm", message, timer)
    }

    /// The request was valid but did nothing in the current mode
    pub fn ignored(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ignored", message, timer)
    }
}

/// Body returned for rejected commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper turning command errors into HTTP responses
#[derive(Debug)]
pub struct ApiError(pub CommandError);

impl From<CommandError> for ApiError {
    fn from(error: CommandError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            CommandError::InvalidTransition { .. } | CommandError::BreakNotEarned { .. } => {
                StatusCode::CONFLICT
            }
            CommandError::InvalidRatio(_) | CommandError::UnknownKey(_) => StatusCode::BAD_REQUEST,
            CommandError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Status response with timer snapshot and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Query for `GET /sessions`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    /// Number of newest sessions to return; 0 returns everything
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub sessions: Vec<Session>,
    /// Sessions in the whole history, not just this page
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub removed: usize,
}

impl ClearHistoryResponse {
    pub fn new(status: &str, message: String, removed: usize) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            removed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: Settings,
    pub timer: TimerSnapshot,
}

/// Body for `POST /shortcut`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutRequest {
    pub key: String,
    #[serde(flatten)]
    pub context: ShortcutContext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcutResponse {
    /// Command the key resolved to, if any
    pub command: Option<Command>,
    #[serde(flatten)]
    pub response: ApiResponse,
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
