//! Reminder configuration and logged entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{Timestamp, MINUTES_PER_DAY, SECONDS_PER_DAY};
use crate::error::ValidationError;

/// Unique identifier for a reminder.
pub type ReminderId = Uuid;

/// Fixed-time offsets closer than this are treated as the same slot.
pub const FIXED_TIME_MIN_GAP_SECS: u32 = 60;

/// How a reminder recurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReminderKind {
    /// Every `interval_minutes` after the last entry, optionally snapped to
    /// clock slots `alignment_minute + k * interval_minutes`.
    Interval {
        interval_minutes: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        daily_goal: Option<u32>,
        #[serde(default)]
        align_to_clock: bool,
        #[serde(default)]
        alignment_minute: u32,
    },
    /// At specific times of day, in seconds from midnight. Kept sorted.
    Fixed {
        #[serde(default)]
        times: Vec<u32>,
    },
}

impl ReminderKind {
    pub fn interval(interval_minutes: u32, daily_goal: Option<u32>) -> Self {
        ReminderKind::Interval {
            interval_minutes,
            daily_goal,
            align_to_clock: false,
            alignment_minute: 0,
        }
    }

    pub fn aligned(interval_minutes: u32, alignment_minute: u32, daily_goal: Option<u32>) -> Self {
        ReminderKind::Interval {
            interval_minutes,
            daily_goal,
            align_to_clock: true,
            alignment_minute,
        }
    }

    /// Fixed slots from arbitrary offsets; sorts them and drops near-duplicates.
    pub fn fixed(times: impl IntoIterator<Item = u32>) -> Self {
        let mut kind = ReminderKind::Fixed { times: Vec::new() };
        for t in times {
            kind.add_fixed_time(t);
        }
        kind
    }

    /// Insert a fixed-time slot keeping `times` sorted.
    ///
    /// Returns `false` (and leaves the slots untouched) for interval reminders
    /// and for offsets within a minute of an existing slot.
    pub fn add_fixed_time(&mut self, seconds: u32) -> bool {
        let ReminderKind::Fixed { times } = self else {
            return false;
        };
        if times
            .iter()
            .any(|&t| t.abs_diff(seconds) < FIXED_TIME_MIN_GAP_SECS)
        {
            return false;
        }
        let pos = times.partition_point(|&t| t < seconds);
        times.insert(pos, seconds);
        true
    }
}

/// Static configuration of one tracked habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "Uuid::new_v4")]
    pub id: ReminderId,
    pub name: String,
    #[serde(flatten)]
    pub kind: ReminderKind,
    /// Earliest moment the reminder can be due.
    pub created_at: Timestamp,
    #[serde(default)]
    pub archived: bool,
}

impl ReminderConfig {
    pub fn new(name: impl Into<String>, kind: ReminderKind, created_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            created_at,
            archived: false,
        }
    }

    /// Fixed reminders aim for one entry per slot.
    pub fn effective_daily_goal(&self) -> u32 {
        match &self.kind {
            ReminderKind::Fixed { times } => times.len() as u32,
            ReminderKind::Interval { daily_goal, .. } => daily_goal.unwrap_or(0),
        }
    }

    /// Check the settings the calculators assume but never enforce.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.kind {
            ReminderKind::Interval {
                interval_minutes,
                alignment_minute,
                ..
            } => {
                if *interval_minutes == 0 {
                    return Err(ValidationError::ZeroInterval {
                        name: self.name.clone(),
                    });
                }
                if *alignment_minute >= MINUTES_PER_DAY {
                    return Err(ValidationError::InvalidValue {
                        field: "alignment_minute".into(),
                        message: format!("{alignment_minute} is not a minute of the day"),
                    });
                }
            }
            ReminderKind::Fixed { times } => {
                if let Some(&bad) = times.iter().find(|&&t| t >= SECONDS_PER_DAY) {
                    return Err(ValidationError::OffsetOutOfDay {
                        field: "times".into(),
                        seconds: bad,
                    });
                }
                if times.windows(2).any(|w| w[0] > w[1]) {
                    return Err(ValidationError::InvalidValue {
                        field: "times".into(),
                        message: "fixed times must be sorted".into(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// One completion (or skip) of a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEntry {
    pub timestamp: Timestamp,
    #[serde(default = "default_count")]
    pub count: u32,
    /// A skip still covers the slot it answered.
    #[serde(default)]
    pub skipped: bool,
    /// Seconds the overlay was visible before the user acted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
}

fn default_count() -> u32 {
    1
}

impl ReminderEntry {
    pub fn new(timestamp: Timestamp, count: u32) -> Self {
        Self {
            timestamp,
            count,
            skipped: false,
            duration_secs: None,
        }
    }

    pub fn skip(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            count: 0,
            skipped: true,
            duration_secs: None,
        }
    }
}

/// Logged entries of one reminder, in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryHistory {
    entries: Vec<ReminderEntry>,
}

impl EntryHistory {
    pub fn new(entries: Vec<ReminderEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: ReminderEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReminderEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest entry timestamp, skipped entries included.
    pub fn last_entry(&self) -> Option<Timestamp> {
        self.entries.iter().map(|e| e.timestamp).max()
    }

    /// Sum of counts logged at or after `since`.
    pub fn count_since(&self, since: Timestamp) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.timestamp >= since)
            .map(|e| e.count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2026, 5, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn fixed_times_are_sorted_and_deduplicated() {
        let kind = ReminderKind::fixed([61_200, 32_400, 32_430, 32_460]);
        assert_eq!(
            kind,
            ReminderKind::Fixed {
                times: vec![32_400, 32_460, 61_200]
            }
        );
    }

    #[test]
    fn add_fixed_time_rejects_interval_kind() {
        let mut kind = ReminderKind::interval(30, None);
        assert!(!kind.add_fixed_time(3600));
    }

    #[test]
    fn effective_goal_counts_fixed_slots() {
        let fixed = ReminderConfig::new("Meds", ReminderKind::fixed([28_800, 72_000]), at(7, 0));
        assert_eq!(fixed.effective_daily_goal(), 2);

        let open = ReminderConfig::new("Stretch", ReminderKind::interval(45, None), at(7, 0));
        assert_eq!(open.effective_daily_goal(), 0);
    }

    #[test]
    fn validate_catches_bad_settings() {
        let zero = ReminderConfig::new("Water", ReminderKind::interval(0, Some(8)), at(7, 0));
        assert!(matches!(
            zero.validate(),
            Err(ValidationError::ZeroInterval { .. })
        ));

        let late = ReminderConfig::new(
            "Late",
            ReminderKind::Fixed {
                times: vec![86_400],
            },
            at(7, 0),
        );
        assert!(matches!(
            late.validate(),
            Err(ValidationError::OffsetOutOfDay { seconds: 86_400, .. })
        ));

        let unsorted = ReminderConfig::new(
            "Unsorted",
            ReminderKind::Fixed {
                times: vec![7200, 3600],
            },
            at(7, 0),
        );
        assert!(unsorted.validate().is_err());

        let ok = ReminderConfig::new("Eyes", ReminderKind::aligned(20, 5, Some(10)), at(7, 0));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn history_tracks_latest_and_daily_sum() {
        let mut history = EntryHistory::default();
        assert_eq!(history.last_entry(), None);

        history.push(ReminderEntry::new(at(9, 0), 2));
        history.push(ReminderEntry::skip(at(11, 30)));
        history.push(ReminderEntry::new(at(10, 0), 1));

        assert_eq!(history.last_entry(), Some(at(11, 30)));
        assert_eq!(history.count_since(at(9, 30)), 1);
        assert_eq!(history.count_since(at(0, 0)), 3);
    }
}
