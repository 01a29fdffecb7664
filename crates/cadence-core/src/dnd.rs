//! Do-not-disturb window arithmetic.
//!
//! A DND window is a daily quiet period given as two seconds-from-midnight
//! boundaries. When `start < end` it lies inside one day (09:00-17:00);
//! otherwise it spans midnight (22:00-08:00). Equal boundaries therefore
//! describe a window covering the whole day.
//!
//! Two questions are answered here: whether "now" is inside the window, and
//! when the most recently *completed* window ended. The latter is a floor for
//! interval rescheduling: reminders restart their countdown when quiet time
//! ends instead of firing the moment it does.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::clock::{at_offset, seconds_since_midnight, start_of_day, Timestamp, SECONDS_PER_DAY};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DndWindow {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub start_seconds: u32,
    #[serde(default)]
    pub end_seconds: u32,
}

impl DndWindow {
    pub fn new(start_seconds: u32, end_seconds: u32) -> Self {
        Self {
            enabled: true,
            start_seconds,
            end_seconds,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build an enabled window from `HH:MM` or `HH:MM:SS` strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when either boundary is not a
    /// time of day.
    pub fn from_clock_times(start: &str, end: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(
            parse_clock_time("dnd.start", start)?,
            parse_clock_time("dnd.end", end)?,
        ))
    }

    fn spans_midnight(&self) -> bool {
        self.start_seconds >= self.end_seconds
    }

    /// Whether `now` falls inside the quiet window.
    pub fn is_inside(&self, now: Timestamp) -> bool {
        if !self.enabled {
            return false;
        }
        let current = seconds_since_midnight(now);
        if self.spans_midnight() {
            current >= self.start_seconds || current < self.end_seconds
        } else {
            current >= self.start_seconds && current < self.end_seconds
        }
    }

    /// End of the most recently completed window; never after `now`.
    ///
    /// Both window shapes resolve the same way: if today's end boundary has
    /// passed it is the latest end, otherwise yesterday's is. For an
    /// overnight window observed at 06:00 that means yesterday 08:00, since
    /// the window in progress has not completed yet.
    pub fn latest_window_end(&self, now: Timestamp) -> Option<Timestamp> {
        if !self.enabled {
            return None;
        }
        let today = start_of_day(now);
        if seconds_since_midnight(now) >= self.end_seconds {
            Some(at_offset(today, self.end_seconds))
        } else {
            Some(at_offset(today - Duration::days(1), self.end_seconds))
        }
    }
}

/// Parse `HH:MM[:SS]` into seconds from midnight.
pub fn parse_clock_time(key: &str, value: &str) -> Result<u32, ConfigError> {
    let trimmed = value.trim();
    let time = NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{value}' is not a time of day: {e}"),
        })?;
    let seconds = time.num_seconds_from_midnight();
    debug_assert!(seconds < SECONDS_PER_DAY);
    Ok(seconds)
}

/// Render seconds from midnight as `HH:MM`.
pub fn format_clock_time(seconds: u32) -> String {
    let seconds = seconds % SECONDS_PER_DAY;
    format!("{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}
