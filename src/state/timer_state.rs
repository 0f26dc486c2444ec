//! Study/break state machine

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CommandError, Settings, StudyRatio};
use crate::utils::time::format_clock;

/// Resets past this much study time need an explicit confirmation
pub const RESET_CONFIRM_THRESHOLD_SECS: u64 = 600;

/// Break seconds earned for a stretch of study; truncates
pub fn earned_break_seconds(study_seconds: u64, ratio: StudyRatio) -> u64 {
    study_seconds / ratio.get()
}

/// Which counter the timer is driving. Studying and on-break are exclusive
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Studying { paused: bool },
    OnBreak { paused: bool },
}

impl Mode {
    /// Whether the periodic tick should be armed in this mode
    pub fn is_ticking(self) -> bool {
        matches!(
            self,
            Mode::Studying { paused: false } | Mode::OnBreak { paused: false }
        )
    }

    pub fn is_active(self) -> bool {
        self != Mode::Idle
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Studying { .. } => "studying",
            Mode::OnBreak { .. } => "onBreak",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Idle => write!(f, "idle"),
            Mode::Studying { paused: false } => write!(f, "studying"),
            Mode::Studying { paused: true } => write!(f, "study is paused"),
            Mode::OnBreak { paused: false } => write!(f, "on break"),
            Mode::OnBreak { paused: true } => write!(f, "break is paused"),
        }
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is ticking in the current mode
    Skipped,
    Studied { study_seconds: u64 },
    BreakCountdown { remaining: u64 },
    /// The countdown hit zero and the timer is idle again
    BreakFinished,
}

/// Earned break handed back by a successful take-break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakGrant {
    pub study_seconds: u64,
    pub earned_seconds: u64,
}

/// Counters and mode for the current study or break
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerState {
    pub mode: Mode,
    pub study_seconds: u64,
    pub break_seconds_remaining: u64,
    pub break_seconds_total: u64,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) -> Result<(), CommandError> {
        if self.mode != Mode::Idle {
            return Err(self.rejected("start studying"));
        }
        self.mode = Mode::Studying { paused: false };
        self.study_seconds = 0;
        Ok(())
    }

    pub fn toggle_study_pause(&mut self) -> Result<bool, CommandError> {
        match self.mode {
            Mode::Studying { paused } => {
                self.mode = Mode::Studying { paused: !paused };
                Ok(!paused)
            }
            _ => Err(self.rejected("pause study")),
        }
    }

    pub fn toggle_break_pause(&mut self) -> Result<bool, CommandError> {
        match self.mode {
            Mode::OnBreak { paused } => {
                self.mode = Mode::OnBreak { paused: !paused };
                Ok(!paused)
            }
            _ => Err(self.rejected("pause break")),
        }
    }

    /// Turn the study done so far into a break. Allowed while paused.
    pub fn take_break(&mut self, ratio: StudyRatio) -> Result<BreakGrant, CommandError> {
        if !matches!(self.mode, Mode::Studying { .. }) {
            return Err(self.rejected("take a break"));
        }
        if self.study_seconds < ratio.get() {
            return Err(CommandError::BreakNotEarned {
                study_seconds: self.study_seconds,
                study_ratio: ratio.get(),
            });
        }

        let grant = BreakGrant {
            study_seconds: self.study_seconds,
            earned_seconds: earned_break_seconds(self.study_seconds, ratio),
        };
        self.mode = Mode::OnBreak { paused: false };
        self.study_seconds = 0;
        self.break_seconds_remaining = grant.earned_seconds;
        self.break_seconds_total = grant.earned_seconds;
        Ok(grant)
    }

    pub fn skip_break(&mut self) -> Result<(), CommandError> {
        if !matches!(self.mode, Mode::OnBreak { .. }) {
            return Err(self.rejected("skip the break"));
        }
        self.finish_break();
        Ok(())
    }

    pub fn reset_needs_confirmation(&self) -> bool {
        self.study_seconds > RESET_CONFIRM_THRESHOLD_SECS
    }

    /// Zero every counter and go idle
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn tick(&mut self) -> TickOutcome {
        match self.mode {
            Mode::Studying { paused: false } => {
                self.study_seconds += 1;
                TickOutcome::Studied {
                    study_seconds: self.study_seconds,
                }
            }
            Mode::OnBreak { paused: false } if self.break_seconds_remaining > 0 => {
                self.break_seconds_remaining -= 1;
                if self.break_seconds_remaining == 0 {
                    self.finish_break();
                    TickOutcome::BreakFinished
                } else {
                    TickOutcome::BreakCountdown {
                        remaining: self.break_seconds_remaining,
                    }
                }
            }
            _ => TickOutcome::Skipped,
        }
    }

    fn finish_break(&mut self) {
        self.mode = Mode::Idle;
        self.break_seconds_remaining = 0;
        self.break_seconds_total = 0;
    }

    fn rejected(&self, command: &'static str) -> CommandError {
        CommandError::InvalidTransition {
            command,
            mode: self.mode,
        }
    }

    pub fn snapshot(&self, settings: &Settings) -> TimerSnapshot {
        let ratio = settings.study_ratio;
        let earned = earned_break_seconds(self.study_seconds, ratio);
        let studying = matches!(self.mode, Mode::Studying { .. });
        let on_break = matches!(self.mode, Mode::OnBreak { .. });

        let seconds_until_break = (studying && self.study_seconds < ratio.get())
            .then(|| ratio.get() - self.study_seconds);
        let break_progress_percent = if on_break {
            let elapsed = self.break_seconds_total - self.break_seconds_remaining;
            elapsed * 100 / self.break_seconds_total.max(1)
        } else {
            0
        };
        let clock = if on_break {
            format_clock(self.break_seconds_remaining)
        } else {
            format_clock(self.study_seconds)
        };

        TimerSnapshot {
            mode: self.mode.name().to_string(),
            studying,
            study_paused: self.mode == Mode::Studying { paused: true },
            on_break,
            break_paused: self.mode == Mode::OnBreak { paused: true },
            study_seconds: self.study_seconds,
            break_seconds_remaining: self.break_seconds_remaining,
            break_seconds_total: self.break_seconds_total,
            study_ratio: ratio.get(),
            sound_enabled: settings.sound_enabled,
            earned_break_seconds: earned,
            can_take_break: studying && earned >= 1,
            seconds_until_break,
            break_progress_percent,
            clock,
        }
    }
}

/// Read-only view of the timer handed to UI layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub mode: String,
    pub studying: bool,
    pub study_paused: bool,
    pub on_break: bool,
    pub break_paused: bool,
    pub study_seconds: u64,
    pub break_seconds_remaining: u64,
    pub break_seconds_total: u64,
    pub study_ratio: u64,
    pub sound_enabled: bool,
    pub earned_break_seconds: u64,
    pub can_take_break: bool,
    pub seconds_until_break: Option<u64>,
    pub break_progress_percent: u64,
    /// `MM:SS` of whichever counter is on screen
    pub clock: String,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        TimerState::new().snapshot(&Settings::default())
    }
}
