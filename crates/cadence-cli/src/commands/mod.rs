pub mod config;
pub mod dnd;
pub mod due;
pub mod log;
pub mod profile;
pub mod status;
pub mod watch;

use std::path::PathBuf;

use cadence_core::{Clock, Config, Profile, ReminderBook, SystemClock, Timestamp};
use chrono::NaiveDateTime;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a local timestamp given on the command line.
pub fn parse_timestamp(value: &str) -> Result<Timestamp, String> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM[:SS], got '{value}'"))
}

/// `--at` when given, the system clock otherwise.
pub fn now_or(at: Option<Timestamp>) -> Timestamp {
    at.unwrap_or_else(|| SystemClock.now())
}

/// Loaded config plus the resolved reminder book location.
pub struct Context {
    pub config: Config,
    pub book_path: PathBuf,
}

impl Context {
    pub fn load(book_override: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let book_path = match book_override {
            Some(path) => path,
            None => config.book_path()?,
        };
        Ok(Self { config, book_path })
    }

    pub fn book(&self) -> Result<ReminderBook, Box<dyn std::error::Error>> {
        Ok(ReminderBook::load(&self.book_path)?)
    }

    pub fn save_book(&self, book: &ReminderBook) -> CliResult {
        book.save(&self.book_path)?;
        Ok(())
    }

    pub fn profile(&self, book: &ReminderBook) -> Profile {
        book.profile(self.config.active_profile.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_supported_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2026, 5, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2026-05-02T09:30"), Ok(expected));
        assert_eq!(parse_timestamp("2026-05-02T09:30:00"), Ok(expected));
        assert_eq!(parse_timestamp("2026-05-02 09:30"), Ok(expected));
    }

    #[test]
    fn rejects_other_timestamps() {
        assert!(parse_timestamp("09:30").is_err());
        assert!(parse_timestamp("2026-05-02").is_err());
    }
}
