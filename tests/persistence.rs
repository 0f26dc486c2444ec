//! Startup from whatever the data directory holds.

use std::fs;

use ratio_timer::{
    services::SoundPlayer,
    state::{AppState, SettingsUpdate},
    store::{SESSIONS_KEY, SETTINGS_KEY},
    LocalStore,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> AppState {
    let store = LocalStore::open(dir.path()).unwrap();
    AppState::new(store, SoundPlayer::Silent, 0, "127.0.0.1".to_string())
}

#[test]
fn test_fresh_directory_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let state = open(&dir);
    let snapshot = state.snapshot().unwrap();
    assert_eq!(snapshot.study_ratio, 4);
    assert!(snapshot.sound_enabled);
    assert!(state.sessions().unwrap().is_empty());
}

#[test]
fn test_corrupt_records_do_not_block_startup() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(format!("{}.json", SETTINGS_KEY)), "{{{").unwrap();
    fs::write(dir.path().join(format!("{}.json", SESSIONS_KEY)), "not json").unwrap();

    let state = open(&dir);
    let settings = state.settings().unwrap();
    assert_eq!(settings.study_ratio.get(), 4);
    assert!(settings.sound_enabled);
    assert!(state.sessions().unwrap().is_empty());
}

#[test]
fn test_history_and_settings_survive_restart() {
    let dir = TempDir::new().unwrap();
    let state = open(&dir);
    state
        .update_settings(&SettingsUpdate {
            study_ratio: Some(3),
            sound_enabled: Some(false),
        })
        .unwrap();

    for seconds in [9, 30, 61] {
        state.start_study().unwrap();
        for _ in 0..seconds {
            state.tick().unwrap();
        }
        state.take_break().unwrap();
        state.skip_break().unwrap();
    }
    let sessions = state.sessions().unwrap();
    let settings = state.settings().unwrap();
    drop(state);

    let reloaded = open(&dir);
    assert_eq!(reloaded.settings().unwrap(), settings);
    assert_eq!(reloaded.sessions().unwrap(), sessions);
    let breaks: Vec<u64> = sessions.iter().map(|s| s.break_earned).collect();
    assert_eq!(breaks, vec![20, 10, 3]);
}

#[test]
fn test_reads_history_written_by_browser_version() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(format!("{}.json", SESSIONS_KEY)),
        r#"[{"study":1500,"break":375,"time":"11:20 am","date":"2 Oct","timestamp":"2025-10-02T05:50:12.345Z"}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join(format!("{}.json", SETTINGS_KEY)),
        r#"{"studyRatio":5,"isSoundOn":true}"#,
    )
    .unwrap();

    let state = open(&dir);
    let sessions = state.sessions().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].study, 1500);
    assert_eq!(sessions[0].break_earned, 375);
    assert_eq!(sessions[0].time, "11:20 am");
    assert_eq!(state.settings().unwrap().study_ratio.get(), 5);
    assert_eq!(state.stats().unwrap().total_break_seconds, 375);
}
