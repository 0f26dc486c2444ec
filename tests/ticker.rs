//! Ticker behaviour on a paused tokio clock.

use std::{sync::Arc, time::Duration};

use ratio_timer::{services::SoundPlayer, state::AppState, tasks::ticker_task, LocalStore};
use tempfile::TempDir;
use tokio::time::sleep;

fn app() -> (TempDir, Arc<AppState>) {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();
    let state = AppState::new(store, SoundPlayer::Silent, 0, "127.0.0.1".to_string());
    (dir, Arc::new(state))
}

fn spawn_ticker(state: &Arc<AppState>) {
    tokio::spawn(ticker_task(Arc::clone(state)));
}

#[tokio::test(start_paused = true)]
async fn test_study_ticks_once_per_second() {
    let (_dir, state) = app();
    spawn_ticker(&state);

    state.start_study().unwrap();
    sleep(Duration::from_millis(3500)).await;
    assert_eq!(state.snapshot().unwrap().study_seconds, 3);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_and_resume_rearms() {
    let (_dir, state) = app();
    spawn_ticker(&state);

    state.start_study().unwrap();
    sleep(Duration::from_millis(2500)).await;
    state.toggle_study_pause().unwrap();
    sleep(Duration::from_secs(5)).await;
    assert_eq!(state.snapshot().unwrap().study_seconds, 2);

    state.toggle_study_pause().unwrap();
    sleep(Duration::from_millis(2200)).await;
    assert_eq!(state.snapshot().unwrap().study_seconds, 4);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_toggles_leave_one_counter() {
    let (_dir, state) = app();
    spawn_ticker(&state);

    state.start_study().unwrap();
    sleep(Duration::from_millis(2500)).await;
    for _ in 0..10 {
        state.toggle_study_pause().unwrap();
    }
    assert!(!state.snapshot().unwrap().study_paused);

    sleep(Duration::from_millis(3200)).await;
    assert_eq!(state.snapshot().unwrap().study_seconds, 5);
}

#[tokio::test(start_paused = true)]
async fn test_break_counts_down_to_idle() {
    let (_dir, state) = app();
    spawn_ticker(&state);

    state.start_study().unwrap();
    sleep(Duration::from_millis(8500)).await;
    let snapshot = state.take_break().unwrap();
    assert_eq!(snapshot.break_seconds_remaining, 2);

    sleep(Duration::from_millis(1200)).await;
    assert_eq!(state.snapshot().unwrap().break_seconds_remaining, 1);

    sleep(Duration::from_secs(4)).await;
    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.mode, "idle");
    assert_eq!(snapshot.break_seconds_remaining, 0);
    assert_eq!(snapshot.study_seconds, 0);
    assert_eq!(state.sessions().unwrap().len(), 1);
    assert_eq!(state.get_last_action().0.as_deref(), Some("break-finished"));
}

#[tokio::test(start_paused = true)]
async fn test_paused_break_holds() {
    let (_dir, state) = app();
    spawn_ticker(&state);

    state.start_study().unwrap();
    sleep(Duration::from_millis(20_500)).await;
    state.take_break().unwrap();
    state.toggle_break_pause().unwrap();

    sleep(Duration::from_secs(10)).await;
    let snapshot = state.snapshot().unwrap();
    assert!(snapshot.break_paused);
    assert_eq!(snapshot.break_seconds_remaining, 5);
}

#[tokio::test(start_paused = true)]
async fn test_idle_does_not_tick() {
    let (_dir, state) = app();
    spawn_ticker(&state);

    sleep(Duration::from_secs(5)).await;
    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.mode, "idle");
    assert_eq!(snapshot.study_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_watchers_follow_ticks() {
    let (_dir, state) = app();
    let mut rx = state.subscribe();
    spawn_ticker(&state);

    state.start_study().unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().studying);

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().study_seconds, 1);
}

#[tokio::test(start_paused = true)]
async fn test_custom_tick_period() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();
    let state = Arc::new(
        AppState::new(store, SoundPlayer::Silent, 0, "127.0.0.1".to_string())
            .with_tick_period(Duration::from_millis(100)),
    );
    spawn_ticker(&state);

    state.start_study().unwrap();
    sleep(Duration::from_millis(550)).await;
    assert_eq!(state.snapshot().unwrap().study_seconds, 5);
}

#[tokio::test(start_paused = true)]
async fn test_failing_sound_does_not_stop_ticker() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path()).unwrap();
    let sound = SoundPlayer::Command {
        program: "ratio-timer-no-such-player".to_string(),
        args: vec![],
    };
    let state = Arc::new(AppState::new(store, sound, 0, "127.0.0.1".to_string()));
    assert!(state.settings().unwrap().sound_enabled);
    spawn_ticker(&state);

    state.start_study().unwrap();
    sleep(Duration::from_millis(4500)).await;
    state.take_break().unwrap();
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(state.snapshot().unwrap().mode, "idle");

    state.start_study().unwrap();
    sleep(Duration::from_millis(2500)).await;
    assert_eq!(state.snapshot().unwrap().study_seconds, 2);
}
