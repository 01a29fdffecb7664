//! # Cadence Core Library
//!
//! This library provides the scheduling core of Cadence, a recurring
//! reminder keeper for habits such as drinking water or taking medication.
//! All operations are available via the standalone `cadence` CLI; any GUI is
//! expected to be a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Due calculation**: pure next-due / is-due / goal-reached functions
//!   over a reminder's settings and its latest entry
//! - **DND windows**: daily quiet periods and the floor they put under
//!   rescheduling
//! - **Sequencer**: a tick-driven state machine deciding which due reminder
//!   is presented and tracking who was already notified
//! - **Storage**: TOML configuration and the TOML reminder book
//!
//! Nothing in the core reads the clock on its own: every call receives
//! "now", so results are deterministic and testable.
//!
//! ## Key Components
//!
//! - [`ReminderSnapshot`]: calculator input for one reminder
//! - [`DndWindow`]: quiet-hours arithmetic
//! - [`Sequencer`]: overlay state machine
//! - [`Config`] / [`ReminderBook`]: on-disk settings and data

pub mod clock;
pub mod dnd;
pub mod due;
pub mod error;
pub mod events;
pub mod reminder;
pub mod sequencer;
pub mod snooze;
pub mod status;
pub mod storage;

pub use clock::{Clock, SystemClock, Timestamp, FAR_FUTURE};
pub use dnd::DndWindow;
pub use due::{earliest_due, ReminderSnapshot};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{CloseReason, Event};
pub use reminder::{EntryHistory, ReminderConfig, ReminderEntry, ReminderId, ReminderKind};
pub use sequencer::{OverlayState, Sequencer};
pub use snooze::SnoozeGate;
pub use status::NextEvent;
pub use storage::{BookReminder, Config, Profile, ReminderBook};
