//! Read-only summaries for menus and listings.
//!
//! Nothing here feeds back into the sequencer; these helpers only rearrange
//! calculator results for display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::dnd::DndWindow;
use crate::due::{earliest_due, ReminderSnapshot};
use crate::reminder::ReminderId;

/// What the user should hear about next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextEvent {
    NoReminders,
    DoNotDisturb,
    Ready {
        id: ReminderId,
        name: String,
    },
    Upcoming {
        id: ReminderId,
        name: String,
        in_secs: i64,
    },
    AllGoalsReached,
}

impl fmt::Display for NextEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextEvent::NoReminders => write!(f, "No reminders"),
            NextEvent::DoNotDisturb => write!(f, "Do not disturb"),
            NextEvent::Ready { name, .. } => write!(f, "Ready: {name}"),
            NextEvent::Upcoming { name, in_secs, .. } => {
                write!(f, "{} until {name}", format_short_time(*in_secs))
            }
            NextEvent::AllGoalsReached => write!(f, "All goals reached"),
        }
    }
}

/// Summarize the reminder set the way the menu bar shows it.
pub fn next_event(now: Timestamp, reminders: &[ReminderSnapshot<'_>], dnd: &DndWindow) -> NextEvent {
    if reminders.iter().all(|r| r.config.archived) {
        return NextEvent::NoReminders;
    }
    if dnd.is_inside(now) {
        return NextEvent::DoNotDisturb;
    }
    match earliest_due(reminders, now, dnd.latest_window_end(now)) {
        None => NextEvent::AllGoalsReached,
        Some((reminder, due_at)) if due_at <= now => NextEvent::Ready {
            id: reminder.id(),
            name: reminder.name().to_string(),
        },
        Some((reminder, due_at)) => NextEvent::Upcoming {
            id: reminder.id(),
            name: reminder.name().to_string(),
            in_secs: (due_at - now).num_seconds(),
        },
    }
}

/// Reminders still working toward today's goal, soonest first.
pub fn upcoming<'r, 'a>(
    now: Timestamp,
    reminders: &'r [ReminderSnapshot<'a>],
    dnd: &DndWindow,
) -> Vec<(&'r ReminderSnapshot<'a>, Timestamp)> {
    let floor = dnd.latest_window_end(now);
    let mut pending: Vec<_> = reminders
        .iter()
        .filter(|r| !r.config.archived && !r.goal_reached(now))
        .map(|r| (r, r.next_due_date(now, floor)))
        .collect();
    pending.sort_by_key(|(_, due)| *due);
    pending
}

/// Reminders done for today, by name.
pub fn completed<'r, 'a>(
    now: Timestamp,
    reminders: &'r [ReminderSnapshot<'a>],
) -> Vec<&'r ReminderSnapshot<'a>> {
    let mut done: Vec<_> = reminders
        .iter()
        .filter(|r| !r.config.archived && r.goal_reached(now))
        .collect();
    done.sort_by(|a, b| a.name().cmp(b.name()));
    done
}

/// 0.0 .. n progress toward the daily goal; 0 when there is no goal.
pub fn daily_progress(reminder: &ReminderSnapshot<'_>) -> f64 {
    let goal = reminder.config.effective_daily_goal();
    if goal == 0 {
        return 0.0;
    }
    f64::from(reminder.today_count) / f64::from(goal)
}

/// Compact countdown: `1h 5m`, `12m`, `42s`.
pub fn format_short_time(seconds: i64) -> String {
    let total = seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{secs}s")
    }
}
