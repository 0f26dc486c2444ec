//! Main application state management
//!
//! `AppState` is the single owner of the timer. UI layers call its commands
//! and read snapshots; they never touch `TimerState` directly. Every mode
//! change is broadcast so the ticker can drop its interval and rearm.

use std::{
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use super::{
    CommandError, Mode, Session, SessionStats, Settings, SettingsUpdate, TickOutcome,
    TimerSnapshot, TimerState,
};
use crate::{services::SoundPlayer, store::LocalStore, utils::time::format_clock};

/// Commands a UI can issue against the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    Start,
    ToggleStudyPause,
    TakeBreak,
    /// Reset, asking for confirmation when a lot of study would be lost
    Reset,
    ConfirmReset,
    ToggleBreakPause,
    SkipBreak,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::ToggleStudyPause => "study-pause",
            Command::TakeBreak => "take-break",
            Command::Reset => "reset",
            Command::ConfirmReset => "reset-confirm",
            Command::ToggleBreakPause => "break-pause",
            Command::SkipBreak => "skip-break",
        }
    }
}

/// Outcome of a destructive command that may need the user to confirm first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation<T> {
    Done(T),
    /// Nothing changed; the message explains what confirming would discard
    Required(String),
}

/// Main application state that owns the timer, settings and history
#[derive(Debug)]
pub struct AppState {
    timer: Mutex<TimerState>,
    settings: Mutex<Settings>,
    /// Newest first
    sessions: Mutex<Vec<Session>>,
    store: LocalStore,
    sound: SoundPlayer,
    /// Interval between ticks, one second outside of tests
    pub tick_period: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Sent on every mode transition, including pause toggles
    pub mode_change_tx: broadcast::Sender<Mode>,
    /// Latest snapshot for UI subscribers
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, CommandError> {
    mutex
        .lock()
        .map_err(|e| CommandError::Lock(format!("{}: {}", name, e)))
}

impl AppState {
    /// Create the controller from whatever the store holds; counters start at zero
    pub fn new(store: LocalStore, sound: SoundPlayer, port: u16, host: String) -> Self {
        let settings = store.load_settings();
        let sessions = store.load_sessions();
        info!(
            "Loaded settings (ratio {}, sound {}) and {} sessions",
            settings.study_ratio,
            if settings.sound_enabled { "on" } else { "off" },
            sessions.len()
        );

        let timer = TimerState::new();
        let (mode_change_tx, _) = broadcast::channel(64);
        let (snapshot_tx, snapshot_rx) = watch::channel(timer.snapshot(&settings));

        Self {
            timer: Mutex::new(timer),
            settings: Mutex::new(settings),
            sessions: Mutex::new(sessions),
            store,
            sound,
            tick_period: Duration::from_secs(1),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            mode_change_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Apply a change to the timer, then publish the result
    fn transition<R, F>(&self, action: &str, change: F) -> Result<(R, TimerSnapshot), CommandError>
    where
        F: FnOnce(&mut TimerState, &Settings) -> Result<R, CommandError>,
    {
        let mut timer = lock(&self.timer, "timer state")?;
        let settings = *lock(&self.settings, "settings")?;

        let result = change(&mut *timer, &settings)?;
        Ok((result, self.commit(action, timer, &settings)))
    }

    /// Snapshot the timer and tell subscribers about the new mode.
    /// Both sends happen under the timer lock so they arrive in the same
    /// order as the transitions.
    fn commit(&self, action: &str, timer: MutexGuard<'_, TimerState>, settings: &Settings) -> TimerSnapshot {
        let snapshot = timer.snapshot(settings);
        self.publish(snapshot.clone());
        self.announce_mode(timer.mode);
        drop(timer);

        self.record_action(action);
        snapshot
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send timer snapshot: {}", e);
        }
    }

    fn announce_mode(&self, mode: Mode) {
        // No receivers just means the ticker is not running (tests, shutdown)
        if self.mode_change_tx.send(mode).is_err() {
            debug!("No mode change listeners for {}", mode);
        }
    }

    /// Start a fresh study stretch
    pub fn start_study(&self) -> Result<TimerSnapshot, CommandError> {
        let ((), snapshot) = self.transition("start", |timer, _| timer.start())?;
        info!("Study session started");
        Ok(snapshot)
    }

    pub fn toggle_study_pause(&self) -> Result<TimerSnapshot, CommandError> {
        let (paused, snapshot) =
            self.transition("study-pause", |timer, _| timer.toggle_study_pause())?;
        info!("Study {}", if paused { "paused" } else { "resumed" });
        Ok(snapshot)
    }

    /// Convert the study so far into a break and record the session
    pub fn take_break(&self) -> Result<TimerSnapshot, CommandError> {
        let (grant, snapshot) = self.transition("take-break", |timer, settings| {
            // Lock history first so a failure leaves the timer untouched
            let mut sessions = lock(&self.sessions, "session history")?;
            let grant = timer.take_break(settings.study_ratio)?;
            sessions.insert(
                0,
                Session::new(grant.study_seconds, grant.earned_seconds, Local::now()),
            );
            if let Err(e) = self.store.save_sessions(&sessions) {
                error!("Failed to save sessions: {:#}", e);
            }
            Ok(grant)
        })?;
        info!(
            "Break started: {}s studied, {}s earned",
            grant.study_seconds, grant.earned_seconds
        );
        Ok(snapshot)
    }

    /// Reset, unless that would throw away more than ten minutes of study
    pub fn request_reset(&self) -> Result<Confirmation<TimerSnapshot>, CommandError> {
        let mut timer = lock(&self.timer, "timer state")?;
        let settings = *lock(&self.settings, "settings")?;

        if timer.reset_needs_confirmation() {
            info!("Reset needs confirmation ({}s studied)", timer.study_seconds);
            return Ok(Confirmation::Required(format!(
                "Resetting will discard {} of study time",
                format_clock(timer.study_seconds)
            )));
        }

        timer.reset();
        info!("Timer reset");
        Ok(Confirmation::Done(self.commit("reset", timer, &settings)))
    }

    pub fn confirm_reset(&self) -> Result<TimerSnapshot, CommandError> {
        let ((), snapshot) = self.transition("reset", |timer, _| {
            timer.reset();
            Ok(())
        })?;
        info!("Timer reset after confirmation");
        Ok(snapshot)
    }

    pub fn toggle_break_pause(&self) -> Result<TimerSnapshot, CommandError> {
        let (paused, snapshot) =
            self.transition("break-pause", |timer, _| timer.toggle_break_pause())?;
        info!("Break {}", if paused { "paused" } else { "resumed" });
        Ok(snapshot)
    }

    pub fn skip_break(&self) -> Result<TimerSnapshot, CommandError> {
        let ((), snapshot) = self.transition("skip-break", |timer, _| timer.skip_break())?;
        info!("Break skipped");
        Ok(snapshot)
    }

    /// Run any command; only `Reset` can come back as `Required`
    pub fn dispatch(&self, command: Command) -> Result<Confirmation<TimerSnapshot>, CommandError> {
        debug!("Dispatching {}", command.name());
        let snapshot = match command {
            Command::Start => self.start_study()?,
            Command::ToggleStudyPause => self.toggle_study_pause()?,
            Command::TakeBreak => self.take_break()?,
            Command::Reset => return self.request_reset(),
            Command::ConfirmReset => self.confirm_reset()?,
            Command::ToggleBreakPause => self.toggle_break_pause()?,
            Command::SkipBreak => self.skip_break()?,
        };
        Ok(Confirmation::Done(snapshot))
    }

    /// Advance whichever counter is running by one second
    pub fn tick(&self) -> Result<TickOutcome, CommandError> {
        let mut timer = lock(&self.timer, "timer state")?;
        let settings = *lock(&self.settings, "settings")?;

        let outcome = timer.tick();
        match outcome {
            TickOutcome::Skipped => {}
            TickOutcome::BreakFinished => {
                info!("Break finished");
                self.commit("break-finished", timer, &settings);
            }
            TickOutcome::Studied { .. } | TickOutcome::BreakCountdown { .. } => {
                self.publish(timer.snapshot(&settings));
                drop(timer);
            }
        }
        Ok(outcome)
    }

    /// Ask for the notification sound without waiting for it.
    /// Returns whether a sound was requested.
    pub fn notify_break_finished(&self) -> bool {
        let sound_enabled = self
            .settings
            .lock()
            .map(|settings| settings.sound_enabled)
            .unwrap_or(false);
        if !sound_enabled {
            debug!("Sound is off, skipping break notification");
            return false;
        }

        let player = self.sound.clone();
        tokio::spawn(async move {
            if let Err(e) = player.play().await {
                warn!("Notification sound failed: {}", e);
            }
        });
        true
    }

    /// First phase of clearing history; always asks, even when empty
    pub fn request_clear_history(&self) -> Result<String, CommandError> {
        let count = lock(&self.sessions, "session history")?.len();
        info!("Clearing history needs confirmation ({} sessions)", count);
        Ok(format!(
            "Clearing will permanently delete {} session{}",
            count,
            if count == 1 { "" } else { "s" }
        ))
    }

    /// Drop every session and its persisted record; returns how many were removed
    pub fn confirm_clear_history(&self) -> Result<usize, CommandError> {
        let mut sessions = lock(&self.sessions, "session history")?;
        let removed = sessions.len();
        sessions.clear();
        if let Err(e) = self.store.clear_sessions() {
            error!("Failed to remove stored sessions: {:#}", e);
        }
        drop(sessions);

        self.record_action("clear-history");
        info!("Cleared {} sessions from history", removed);
        Ok(removed)
    }

    /// Validate and apply a settings change, then persist it
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<Settings, CommandError> {
        let timer = lock(&self.timer, "timer state")?;
        let mut settings = lock(&self.settings, "settings")?;

        settings.apply(update)?;
        let updated = *settings;
        drop(settings);

        if let Err(e) = self.store.save_settings(&updated) {
            error!("Failed to save settings: {:#}", e);
        }

        self.publish(timer.snapshot(&updated));
        drop(timer);
        self.record_action("settings");

        info!(
            "Settings updated: ratio {}, sound {}",
            updated.study_ratio,
            if updated.sound_enabled { "on" } else { "off" }
        );
        Ok(updated)
    }

    pub fn snapshot(&self) -> Result<TimerSnapshot, CommandError> {
        let timer = lock(&self.timer, "timer state")?;
        let settings = *lock(&self.settings, "settings")?;
        Ok(timer.snapshot(&settings))
    }

    pub fn current_mode(&self) -> Result<Mode, CommandError> {
        Ok(lock(&self.timer, "timer state")?.mode)
    }

    /// Watch the latest snapshot, updated after every command and tick
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn settings(&self) -> Result<Settings, CommandError> {
        Ok(*lock(&self.settings, "settings")?)
    }

    /// Full newest-first history
    pub fn sessions(&self) -> Result<Vec<Session>, CommandError> {
        Ok(lock(&self.sessions, "session history")?.clone())
    }

    /// The `limit` newest sessions; zero means all of them
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<Session>, CommandError> {
        let sessions = lock(&self.sessions, "session history")?;
        let take = if limit == 0 { sessions.len() } else { limit };
        Ok(sessions.iter().take(take).cloned().collect())
    }

    pub fn stats(&self) -> Result<SessionStats, CommandError> {
        let sessions = lock(&self.sessions, "session history")?;
        Ok(SessionStats::from_sessions(
            &sessions,
            Local::now().date_naive(),
        ))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
