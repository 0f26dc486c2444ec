//! User settings: study ratio and sound toggle

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CommandError;

/// Minutes of study per minute of break. Only 3, 4 and 5 are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct StudyRatio(u64);

impl StudyRatio {
    pub const ALLOWED: [u64; 3] = [3, 4, 5];

    pub fn new(ratio: u64) -> Result<Self, CommandError> {
        if Self::ALLOWED.contains(&ratio) {
            Ok(Self(ratio))
        } else {
            Err(CommandError::InvalidRatio(ratio))
        }
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for StudyRatio {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<u64> for StudyRatio {
    type Error = CommandError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudyRatio> for u64 {
    fn from(ratio: StudyRatio) -> Self {
        ratio.0
    }
}

impl fmt::Display for StudyRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:1", self.0)
    }
}

/// Persisted settings record, `{studyRatio, isSoundOn}` on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub study_ratio: StudyRatio,
    #[serde(rename = "isSoundOn")]
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            study_ratio: StudyRatio::default(),
            sound_enabled: true,
        }
    }
}

/// Partial settings change; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub study_ratio: Option<u64>,
    #[serde(rename = "isSoundOn")]
    pub sound_enabled: Option<bool>,
}

impl Settings {
    /// Apply an update, validating the ratio before anything changes
    pub fn apply(&mut self, update: &SettingsUpdate) -> Result<(), CommandError> {
        let ratio = update.study_ratio.map(StudyRatio::new).transpose()?;
        if let Some(ratio) = ratio {
            self.study_ratio = ratio;
        }
        if let Some(sound_enabled) = update.sound_enabled {
            self.sound_enabled = sound_enabled;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_accepts_only_three_to_five() {
        for ratio in [3, 4, 5] {
            assert_eq!(StudyRatio::new(ratio).unwrap().get(), ratio);
        }
        assert_eq!(StudyRatio::new(2), Err(CommandError::InvalidRatio(2)));
        assert_eq!(StudyRatio::new(6), Err(CommandError::InvalidRatio(6)));
        assert_eq!(StudyRatio::new(0), Err(CommandError::InvalidRatio(0)));
    }

    #[test]
    fn test_settings_json_shape() {
        let settings = Settings {
            study_ratio: StudyRatio::new(5).unwrap(),
            sound_enabled: false,
        };
        let json = serde_json::to_value(settings).unwrap();
        assert_eq!(json, serde_json::json!({ "studyRatio": 5, "isSoundOn": false }));
    }

    #[test]
    fn test_out_of_range_ratio_fails_to_deserialize() {
        let result = serde_json::from_str::<Settings>(r#"{"studyRatio": 9, "isSoundOn": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_rejects_bad_ratio_without_partial_update() {
        let mut settings = Settings::default();
        let update = SettingsUpdate {
            study_ratio: Some(7),
            sound_enabled: Some(false),
        };
        assert_eq!(settings.apply(&update), Err(CommandError::InvalidRatio(7)));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_apply_partial_update() {
        let mut settings = Settings::default();
        settings
            .apply(&SettingsUpdate {
                study_ratio: None,
                sound_enabled: Some(false),
            })
            .unwrap();
        assert_eq!(settings.study_ratio.get(), 4);
        assert!(!settings.sound_enabled);
    }
}
