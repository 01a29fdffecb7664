//! The reminder book: profiles, reminders and their entries in one TOML file.
//!
//! ```toml
//! [[profiles]]
//! name = "Default"
//! dnd = { enabled = true, start = "22:00", end = "08:00" }
//!
//! [[reminders]]
//! name = "Water"
//! kind = "interval"
//! interval_minutes = 60
//! daily_goal = 8
//! created_at = "2026-01-05T08:00:00"
//!
//! [[reminders.entries]]
//! timestamp = "2026-01-05T09:02:11"
//! count = 1
//! ```
//!
//! Reminders without a `profile` belong to [`DEFAULT_PROFILE`]. Loading
//! validates every reminder so the calculators only ever see sane settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Timestamp;
use crate::dnd::{format_clock_time, DndWindow};
use crate::due::ReminderSnapshot;
use crate::error::{ConfigError, CoreError, Result};
use crate::reminder::{EntryHistory, ReminderConfig, ReminderEntry, ReminderId};

pub const DEFAULT_PROFILE: &str = "Default";

/// DND settings as written by people: clock times instead of offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DndSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_dnd_start")]
    pub start: String,
    #[serde(default = "default_dnd_end")]
    pub end: String,
}

fn default_dnd_start() -> String {
    "22:00".into()
}
fn default_dnd_end() -> String {
    "08:00".into()
}

impl Default for DndSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            start: default_dnd_start(),
            end: default_dnd_end(),
        }
    }
}

impl DndSettings {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparseable clock times.
    pub fn to_window(&self) -> Result<DndWindow, ConfigError> {
        let mut window = DndWindow::from_clock_times(&self.start, &self.end)?;
        window.enabled = self.enabled;
        Ok(window)
    }

    pub fn from_window(window: &DndWindow) -> Self {
        Self {
            enabled: window.enabled,
            start: format_clock_time(window.start_seconds),
            end: format_clock_time(window.end_seconds),
        }
    }
}

/// A named set of reminders sharing one DND window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub dnd: DndSettings,
}

fn default_icon() -> String {
    "person".into()
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: default_icon(),
            dnd: DndSettings::default(),
        }
    }

    /// The parsed window; the book loader has already checked it parses.
    pub fn dnd_window(&self) -> DndWindow {
        self.dnd.to_window().unwrap_or_default()
    }
}

/// A reminder with its owning profile and logged entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReminder {
    #[serde(flatten)]
    pub config: ReminderConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "EntryHistory::is_empty")]
    pub entries: EntryHistory,
}

impl BookReminder {
    pub fn new(config: ReminderConfig) -> Self {
        Self {
            config,
            profile: None,
            entries: EntryHistory::default(),
        }
    }

    pub fn profile_name(&self) -> &str {
        self.profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }

    pub fn snapshot(&self, now: Timestamp) -> ReminderSnapshot<'_> {
        ReminderSnapshot::from_history(&self.config, &self.entries, now)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderBook {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub reminders: Vec<BookReminder>,
}

impl ReminderBook {
    /// Load a book, treating a missing file as an empty one.
    ///
    /// Reminders written without an `id` get one assigned, and the book is
    /// saved back so the id stays the same on the next load.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or rewritten, or
    /// if any reminder or DND setting fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let table: toml::Table = toml::from_str(&content)?;
        let missing_ids = table
            .get("reminders")
            .and_then(toml::Value::as_array)
            .is_some_and(|reminders| reminders.iter().any(|r| r.get("id").is_none()));

        let book: ReminderBook = toml::Value::Table(table).try_into()?;
        book.validate()?;
        if missing_ids {
            book.save(path)?;
            info!(path = %path.display(), "assigned ids to reminders in book");
        }
        Ok(book)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the first invalid reminder or DND window.
    pub fn validate(&self) -> Result<()> {
        for profile in &self.profiles {
            profile.dnd.to_window()?;
        }
        for reminder in &self.reminders {
            reminder.config.validate()?;
        }
        Ok(())
    }

    /// Resolve the active profile, falling back to the first one and then to
    /// an implicit default profile without DND.
    pub fn profile(&self, name: Option<&str>) -> Profile {
        if let Some(name) = name {
            if let Some(found) = self.profiles.iter().find(|p| p.name == name) {
                return found.clone();
            }
            warn!(profile = name, "profile not found in reminder book; using fallback");
        }
        self.profiles
            .first()
            .cloned()
            .unwrap_or_else(|| Profile::new(DEFAULT_PROFILE))
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p.name == name)
            || (self.profiles.is_empty() && name == DEFAULT_PROFILE)
    }

    /// Non-archived reminders of a profile, in book order.
    pub fn active(&self, profile: &Profile) -> impl Iterator<Item = &BookReminder> + '_ {
        let name = profile.name.clone();
        self.reminders
            .iter()
            .filter(move |r| !r.config.archived && r.profile_name() == name)
    }

    /// Calculator inputs for every active reminder of a profile.
    pub fn snapshots(&self, profile: &Profile, now: Timestamp) -> Vec<ReminderSnapshot<'_>> {
        self.active(profile).map(|r| r.snapshot(now)).collect()
    }

    /// Find a reminder by id or case-insensitive name.
    pub fn find(&self, query: &str) -> Result<&BookReminder> {
        let index = self.position(query)?;
        Ok(&self.reminders[index])
    }

    /// Append an entry to the reminder matching `query`.
    pub fn log_entry(&mut self, query: &str, entry: ReminderEntry) -> Result<ReminderId> {
        let index = self.position(query)?;
        let reminder = &mut self.reminders[index];
        reminder.entries.push(entry);
        Ok(reminder.config.id)
    }

    fn position(&self, query: &str) -> Result<usize> {
        let by_id = Uuid::parse_str(query).ok();
        self.reminders
            .iter()
            .position(|r| Some(r.config.id) == by_id || r.config.name.eq_ignore_ascii_case(query))
            .ok_or_else(|| CoreError::NotFound {
                kind: "reminder",
                query: query.to_string(),
            })
    }
}
