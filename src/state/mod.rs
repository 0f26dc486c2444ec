//! State management module
//!
//! This module contains the timer state machine, session history, settings
//! and the controller that owns them.

pub mod app_state;
pub mod error;
pub mod session;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, Command, Confirmation};
pub use error::CommandError;
pub use session::{Session, SessionStats};
pub use settings::{Settings, SettingsUpdate, StudyRatio};
pub use timer_state::{
    earned_break_seconds, BreakGrant, Mode, TickOutcome, TimerSnapshot, TimerState,
    RESET_CONFIRM_THRESHOLD_SECS,
};
