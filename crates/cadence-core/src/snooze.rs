//! Temporary suppression of new overlays.

use chrono::Duration;

use crate::clock::Timestamp;

/// Snooze presets offered to the user, in minutes.
pub const SNOOZE_PRESETS: [u32; 4] = [15, 30, 60, 120];

/// A timed "not now" switch.
///
/// Lives only in memory; a restarted process starts unsnoozed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnoozeGate {
    until: Option<Timestamp>,
}

impl SnoozeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snooze for `minutes` from `now`, replacing any running snooze.
    pub fn start(&mut self, now: Timestamp, minutes: u32) {
        self.until = Some(now + Duration::minutes(i64::from(minutes)));
    }

    pub fn cancel(&mut self) {
        self.until = None;
    }

    pub fn is_snoozing(&self, now: Timestamp) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    pub fn until(&self) -> Option<Timestamp> {
        self.until
    }

    /// Time left, zero once expired or when not snoozing.
    pub fn remaining(&self, now: Timestamp) -> Duration {
        match self.until {
            Some(until) if now < until => until - now,
            _ => Duration::zero(),
        }
    }
}
