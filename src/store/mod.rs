//! Local key-value persistence
//!
//! Each key maps to one `<key>.json` file in the data directory. Records are
//! always written whole. Loading never fails: a missing or corrupt record
//! falls back to defaults so startup cannot be blocked by bad data on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::state::{Session, Settings, StudyRatio};

/// Key holding the session history
pub const SESSIONS_KEY: &str = "ratiotimer-sessions";
/// Key holding the user settings
pub const SETTINGS_KEY: &str = "ratiotimer-settings";

/// Directory-backed store of JSON records
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        debug!("Using data directory {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Raw record for `key`, `None` if it was never written
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Replace the record for `key`
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to move {} into place", path.display()))
    }

    /// Delete the record for `key`; a missing record is not an error
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    /// Load settings, filling each missing or invalid field with its default
    pub fn load_settings(&self) -> Settings {
        let Some(raw) = self.read_or_warn(SETTINGS_KEY) else {
            return Settings::default();
        };

        let stored: StoredSettings = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to load settings: {}", e);
                return Settings::default();
            }
        };

        let defaults = Settings::default();
        let study_ratio = match stored.study_ratio {
            Some(ratio) => StudyRatio::new(ratio).unwrap_or_else(|e| {
                warn!("Ignoring stored settings value: {}", e);
                defaults.study_ratio
            }),
            None => defaults.study_ratio,
        };

        Settings {
            study_ratio,
            sound_enabled: stored.sound_enabled.unwrap_or(defaults.sound_enabled),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.set(SETTINGS_KEY, &json)
    }

    /// Load the newest-first session history; corrupt data yields an empty list
    pub fn load_sessions(&self) -> Vec<Session> {
        let Some(raw) = self.read_or_warn(SESSIONS_KEY) else {
            return Vec::new();
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Failed to load sessions: {}", e);
            Vec::new()
        })
    }

    pub fn save_sessions(&self, sessions: &[Session]) -> Result<()> {
        let json = serde_json::to_string(sessions)?;
        self.set(SESSIONS_KEY, &json)
    }

    pub fn clear_sessions(&self) -> Result<()> {
        self.remove(SESSIONS_KEY)
    }

    fn read_or_warn(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        }
    }
}

/// Lenient view of the settings record
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    study_ratio: Option<u64>,
    #[serde(rename = "isSoundOn")]
    sound_enabled: Option<bool>,
}
