use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::reminder::ReminderId;
use crate::sequencer::OverlayState;

/// Every overlay state change produces an Event.
/// The presentation layer reacts to them; nothing else mutates the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The due overlay opened for a reminder.
    OverlayOpened {
        reminder_id: ReminderId,
        at: Timestamp,
    },
    /// The open overlay handed over to the next due reminder.
    OverlayAdvanced {
        from: ReminderId,
        to: ReminderId,
        at: Timestamp,
    },
    OverlayClosed {
        reminder_id: ReminderId,
        reason: CloseReason,
        at: Timestamp,
    },
    SnoozeStarted {
        until: Timestamp,
        at: Timestamp,
    },
    SnoozeCancelled {
        at: Timestamp,
    },
    StateSnapshot {
        state: OverlayState,
        notified: Vec<ReminderId>,
        overlay_opened_at: Option<Timestamp>,
        snoozed_until: Option<Timestamp>,
        at: Timestamp,
    },
}

/// Why an overlay went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Quiet hours began.
    DoNotDisturb,
    /// Nothing else was due after the last logged entry.
    Resolved,
    /// Bookkeeping was reset, e.g. on a profile switch.
    Reset,
}
