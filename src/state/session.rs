//! Completed study sessions and history statistics

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::{display_date, display_time};

/// One study stretch that ended in a break, recorded when the break starts.
///
/// Serialized field names match the persisted history format:
/// `{study, break, time, date, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Study duration in seconds
    pub study: u64,
    /// Break seconds earned for that study
    #[serde(rename = "break")]
    pub break_earned: u64,
    /// Local time of day the break started
    pub time: String,
    /// Local date the break started
    pub date: String,
    pub timestamp: DateTime<Utc>,
}

impl Session {
    pub fn new(study: u64, break_earned: u64, at: DateTime<Local>) -> Self {
        Self {
            study,
            break_earned,
            time: display_time(&at),
            date: display_date(&at),
            timestamp: at.with_timezone(&Utc),
        }
    }

    /// Local calendar day of the session
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

/// Aggregates over the whole history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub sessions: usize,
    pub total_study_seconds: u64,
    pub total_break_seconds: u64,
    pub today_study_seconds: u64,
}

impl SessionStats {
    pub fn from_sessions(sessions: &[Session], today: NaiveDate) -> Self {
        sessions.iter().fold(
            Self {
                sessions: sessions.len(),
                ..Self::default()
            },
            |mut stats, session| {
                stats.total_study_seconds += session.study;
                stats.total_break_seconds += session.break_earned;
                if session.local_date() == today {
                    stats.today_study_seconds += session.study;
                }
                stats
            },
        )
    }
}
