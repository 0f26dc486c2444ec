//! Keyboard shortcut contract
//!
//! Maps a key press to a timer command given the current mode. The UI still
//! owns the actual key listener; this only decides what a key means.

use std::str::FromStr;

use serde::Deserialize;

use crate::state::{Command, CommandError, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    R,
    B,
}

impl FromStr for Key {
    type Err = CommandError;

    /// Accepts `KeyboardEvent.code` names (`Space`, `KeyR`, `KeyB`) or the
    /// bare character, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == " " {
            return Ok(Key::Space);
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "space" | "spacebar" => Ok(Key::Space),
            "r" | "keyr" => Ok(Key::R),
            "b" | "keyb" => Ok(Key::B),
            _ => Err(CommandError::UnknownKey(s.to_string())),
        }
    }
}

/// Where focus was when the key was pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutContext {
    #[serde(default)]
    pub settings_open: bool,
    #[serde(default)]
    pub in_text_input: bool,
}

impl ShortcutContext {
    pub fn suppresses_shortcuts(&self) -> bool {
        self.settings_open || self.in_text_input
    }
}

/// Command for `key`, or `None` when the key does nothing right now
pub fn resolve(key: Key, mode: Mode, can_take_break: bool, context: ShortcutContext) -> Option<Command> {
    if context.suppresses_shortcuts() {
        return None;
    }

    match (key, mode) {
        (Key::Space, Mode::Idle) => Some(Command::Start),
        (Key::Space, Mode::Studying { .. }) => Some(Command::ToggleStudyPause),
        (Key::Space, Mode::OnBreak { .. }) => Some(Command::ToggleBreakPause),
        (Key::R, Mode::Studying { .. }) => Some(Command::Reset),
        (Key::B, Mode::Studying { .. }) if can_take_break => Some(Command::TakeBreak),
        _ => None,
    }
}
