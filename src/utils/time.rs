//! Display formatting for durations and session timestamps

use chrono::{DateTime, TimeZone};

/// Format a second count as `MM:SS`; minutes keep growing past 99
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Short time of day, e.g. `02:35 pm`
pub fn display_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%I:%M %P").to_string()
}

/// Day and abbreviated month, e.g. `2 Oct`
pub fn display_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-d %b").to_string()
}
