//! Errors returned by timer commands

use thiserror::Error;

use super::Mode;

/// Reasons a command can be rejected without touching timer state
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("cannot {command} while {mode}")]
    InvalidTransition { command: &'static str, mode: Mode },

    #[error("no break earned yet: {study_seconds}s studied, need at least {study_ratio}s")]
    BreakNotEarned { study_seconds: u64, study_ratio: u64 },

    #[error("study ratio must be one of 3, 4 or 5 (got {0})")]
    InvalidRatio(u64),

    #[error("unknown shortcut key: {0}")]
    UnknownKey(String),

    #[error("failed to lock {0}")]
    Lock(String),
}

impl CommandError {
    /// Whether the error comes from the caller rather than the server
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CommandError::Lock(_))
    }
}
