//! Due-overlay sequencer.
//!
//! The sequencer is a tick-driven state machine. It does not use internal
//! threads or read a clock - the caller invokes `tick()` on a fixed cadence
//! and `logged()` after persisting a new entry, passing "now" and fresh
//! reminder snapshots each time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --tick: earliest reminder due, not yet notified, not snoozed--> Showing(id)
//! Showing(a) --logged(a): b due--> Showing(b)
//! Showing(a) --logged(a): nothing due--> Idle (notified set cleared)
//! any --inside DND--> Idle (notified set cleared)
//! ```
//!
//! An open overlay is never preempted by a tick: only `logged()` moves it on.
//! Because "due" is re-evaluated from scratch every tick, a dropped or late
//! tick delays detection but never produces a wrong notification.
//!
//! ## Usage
//!
//! ```ignore
//! let mut sequencer = Sequencer::new();
//! // every second:
//! if let Some(event) = sequencer.tick(now, &snapshots, &dnd) { present(event) }
//! // after the user completes or skips the overlay reminder:
//! sequencer.logged(id, now, &snapshots, &dnd);
//! ```

use std::collections::HashSet;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Timestamp;
use crate::dnd::DndWindow;
use crate::due::{earliest_due, ReminderSnapshot};
use crate::events::{CloseReason, Event};
use crate::reminder::ReminderId;
use crate::snooze::SnoozeGate;

/// Whether the due overlay is up, and for which reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "reminder_id", rename_all = "lowercase")]
pub enum OverlayState {
    #[default]
    Idle,
    Showing(ReminderId),
}

impl OverlayState {
    pub fn is_showing(&self) -> bool {
        matches!(self, OverlayState::Showing(_))
    }

    pub fn reminder(&self) -> Option<ReminderId> {
        match self {
            OverlayState::Showing(id) => Some(*id),
            OverlayState::Idle => None,
        }
    }
}

/// Owns the notified set, the active overlay slot and the snooze gate.
///
/// All mutation goes through the transition methods, which keeps the active
/// reminder always a member of the notified set.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    notified: HashSet<ReminderId>,
    overlay: OverlayState,
    overlay_opened_at: Option<Timestamp>,
    snooze: SnoozeGate,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> OverlayState {
        self.overlay
    }

    pub fn active_reminder(&self) -> Option<ReminderId> {
        self.overlay.reminder()
    }

    pub fn is_notified(&self, id: ReminderId) -> bool {
        self.notified.contains(&id)
    }

    pub fn notified_ids(&self) -> &HashSet<ReminderId> {
        &self.notified
    }

    pub fn overlay_opened_at(&self) -> Option<Timestamp> {
        self.overlay_opened_at
    }

    /// How long the current overlay has been visible.
    pub fn overlay_elapsed(&self, now: Timestamp) -> Option<Duration> {
        self.overlay_opened_at
            .map(|opened| (now - opened).max(Duration::zero()))
    }

    pub fn is_snoozing(&self, now: Timestamp) -> bool {
        self.snooze.is_snoozing(now)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: Timestamp) -> Event {
        let mut notified: Vec<ReminderId> = self.notified.iter().copied().collect();
        notified.sort();
        Event::StateSnapshot {
            state: self.overlay,
            notified,
            overlay_opened_at: self.overlay_opened_at,
            snoozed_until: self.snooze.until().filter(|&until| now < until),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Periodic re-evaluation. Returns an event when the overlay changes.
    pub fn tick(
        &mut self,
        now: Timestamp,
        reminders: &[ReminderSnapshot<'_>],
        dnd: &DndWindow,
    ) -> Option<Event> {
        if dnd.is_inside(now) {
            return self.clear(now, CloseReason::DoNotDisturb);
        }

        let floor = dnd.latest_window_end(now);
        let (candidate, due_at) = earliest_due(reminders, now, floor)?;
        let id = candidate.id();

        if due_at > now {
            // not due yet: a later occurrence may notify again
            if self.notified.remove(&id) {
                debug!(reminder = %id, due_at = %due_at, "re-armed reminder");
            }
            return None;
        }

        if self.overlay.is_showing() || self.notified.contains(&id) || self.snooze.is_snoozing(now) {
            return None;
        }

        self.show(id, now);
        debug!(reminder = %id, name = candidate.name(), "overlay opened");
        Some(Event::OverlayOpened {
            reminder_id: id,
            at: now,
        })
    }

    /// The user completed or skipped `id`; hand the overlay to the next due
    /// reminder or close it.
    ///
    /// `reminders` must already reflect the new entry.
    pub fn logged(
        &mut self,
        id: ReminderId,
        now: Timestamp,
        reminders: &[ReminderSnapshot<'_>],
        dnd: &DndWindow,
    ) -> Option<Event> {
        self.notified.remove(&id);

        if dnd.is_inside(now) {
            return self.clear(now, CloseReason::DoNotDisturb);
        }

        let next = reminders
            .iter()
            .filter(|r| !r.config.archived && !self.notified.contains(&r.id()))
            .find(|r| r.is_due(now))
            .map(|r| r.id());

        let previous = self.overlay;
        match next {
            Some(next_id) => {
                self.show(next_id, now);
                match previous {
                    OverlayState::Showing(from) => {
                        debug!(from = %from, to = %next_id, "overlay advanced");
                        Some(Event::OverlayAdvanced {
                            from,
                            to: next_id,
                            at: now,
                        })
                    }
                    OverlayState::Idle => {
                        debug!(reminder = %next_id, "overlay opened after log");
                        Some(Event::OverlayOpened {
                            reminder_id: next_id,
                            at: now,
                        })
                    }
                }
            }
            None => self.clear(now, CloseReason::Resolved),
        }
    }

    /// Forget the current due-cycle, e.g. when the active profile changes.
    /// A running snooze is kept.
    pub fn reset(&mut self, now: Timestamp) -> Option<Event> {
        self.clear(now, CloseReason::Reset)
    }

    pub fn snooze(&mut self, now: Timestamp, minutes: u32) -> Event {
        self.snooze.start(now, minutes);
        let until = self.snooze.until().unwrap_or(now);
        debug!(until = %until, "snooze started");
        Event::SnoozeStarted { until, at: now }
    }

    pub fn cancel_snooze(&mut self, now: Timestamp) -> Event {
        self.snooze.cancel();
        Event::SnoozeCancelled { at: now }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn show(&mut self, id: ReminderId, now: Timestamp) {
        self.overlay = OverlayState::Showing(id);
        self.notified.insert(id);
        self.overlay_opened_at = Some(now);
    }

    fn clear(&mut self, now: Timestamp, reason: CloseReason) -> Option<Event> {
        let previous = self.overlay;
        self.overlay = OverlayState::Idle;
        self.overlay_opened_at = None;
        self.notified.clear();
        let reminder_id = previous.reminder()?;
        debug!(reminder = %reminder_id, ?reason, "overlay closed");
        Some(Event::OverlayClosed {
            reminder_id,
            reason,
            at: now,
        })
    }
}
