//! Ticker background task
//!
//! Exactly one one-second interval is armed at a time. Every mode change
//! drops the current interval and the loop decides again whether to arm a
//! fresh one, so pause toggles never leave a second counter running.

use std::sync::Arc;

use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, Mode, TickOutcome};

/// Background task that advances the timer while a counter is running
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting ticker task");

    let mut mode_rx = state.mode_change_tx.subscribe();
    let mut mode = match state.current_mode() {
        Ok(mode) => mode,
        Err(e) => {
            error!("Failed to read timer mode: {}", e);
            Mode::Idle
        }
    };

    loop {
        let next = if mode.is_ticking() {
            run_interval(&state, &mut mode_rx, mode).await
        } else {
            debug!("Timer is {}, ticker idle", mode);
            next_mode(&state, mode_rx.recv().await, mode)
        };

        match next {
            Some(next) => mode = next,
            None => {
                info!("Mode channel closed, stopping ticker task");
                return;
            }
        }
    }
}

/// Tick until the mode changes or the break runs out.
/// Returns the mode to continue with, `None` once the channel is closed.
async fn run_interval(
    state: &AppState,
    mode_rx: &mut broadcast::Receiver<Mode>,
    mode: Mode,
) -> Option<Mode> {
    debug!("Arming ticker for {}", mode);

    let period = state.tick_period;
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match state.tick() {
                    Ok(TickOutcome::BreakFinished) => {
                        state.notify_break_finished();
                        return Some(Mode::Idle);
                    }
                    Ok(TickOutcome::Skipped) => {
                        // Mode moved on without a message reaching us yet
                        return state.current_mode().ok().or(Some(Mode::Idle));
                    }
                    Ok(outcome) => debug!("Tick: {:?}", outcome),
                    Err(e) => error!("Failed to advance timer: {}", e),
                }
            }

            received = mode_rx.recv() => {
                debug!("Mode changed, disarming ticker");
                return next_mode(state, received, mode);
            }
        }
    }
}

fn next_mode(state: &AppState, received: Result<Mode, RecvError>, fallback: Mode) -> Option<Mode> {
    match received {
        Ok(mode) => Some(mode),
        Err(RecvError::Lagged(skipped)) => {
            warn!("Ticker missed {} mode changes, re-reading state", skipped);
            Some(state.current_mode().unwrap_or(fallback))
        }
        Err(RecvError::Closed) => None,
    }
}
