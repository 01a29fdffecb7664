//! Local-calendar helpers.
//!
//! Every computation in this crate works on local wall-clock timestamps and
//! receives "now" from the caller. The [`Clock`] trait is the single place a
//! real clock is read, so binaries can inject it and tests can ignore it.

use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Timelike};

/// A local wall-clock timestamp.
pub type Timestamp = NaiveDateTime;

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 1_440;

/// Sentinel for "never due".
pub const FAR_FUTURE: Timestamp = NaiveDateTime::MAX;

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Reads the operating system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Local::now().naive_local()
    }
}

/// Midnight of the day containing `t`.
pub fn start_of_day(t: Timestamp) -> Timestamp {
    t.date().and_time(NaiveTime::MIN)
}

/// Whole seconds elapsed since local midnight.
pub fn seconds_since_midnight(t: Timestamp) -> u32 {
    t.num_seconds_from_midnight()
}

/// Whole minutes elapsed since local midnight (seconds truncated).
pub fn minute_of_day(t: Timestamp) -> i64 {
    i64::from(t.num_seconds_from_midnight() / 60)
}

/// `day` (a start of day) shifted by a seconds-from-midnight offset.
pub fn at_offset(day: Timestamp, seconds: u32) -> Timestamp {
    day + Duration::seconds(i64::from(seconds))
}

/// `day` shifted by a minute-of-day value, which may be negative or exceed a
/// day and then lands on the neighbouring date.
pub fn at_minute(day: Timestamp, minute: i64) -> Timestamp {
    day + Duration::minutes(minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn start_of_day_drops_time() {
        assert_eq!(start_of_day(ts(17, 42, 9)), ts(0, 0, 0));
    }

    #[test]
    fn minute_of_day_truncates_seconds() {
        assert_eq!(minute_of_day(ts(1, 2, 59)), 62);
        assert_eq!(seconds_since_midnight(ts(1, 2, 59)), 3779);
    }

    #[test]
    fn negative_minute_lands_on_previous_day() {
        let day = start_of_day(ts(12, 0, 0));
        let t = at_minute(day, -30);
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2026, 3, 13).unwrap());
        assert_eq!(minute_of_day(t), 1410);
    }
}
