use std::path::PathBuf;

use cadence_core::status::daily_progress;
use cadence_core::{DndWindow, ReminderId, ReminderKind, ReminderSnapshot, Timestamp, FAR_FUTURE};
use serde::Serialize;

use super::{now_or, CliResult, Context};

/// One reminder's calculator results at a given moment.
#[derive(Debug, Serialize)]
pub struct ReminderRow {
    pub id: ReminderId,
    pub name: String,
    pub kind: &'static str,
    /// `None` when the reminder can never become due.
    pub next_due: Option<Timestamp>,
    pub is_due: bool,
    pub goal_reached: bool,
    pub today_count: u32,
    pub daily_goal: u32,
    pub progress: f64,
}

impl ReminderRow {
    pub fn evaluate(snap: &ReminderSnapshot<'_>, now: Timestamp, dnd: &DndWindow) -> Self {
        let next_due = snap.next_due_date(now, dnd.latest_window_end(now));
        Self {
            id: snap.id(),
            name: snap.name().to_string(),
            kind: match snap.config.kind {
                ReminderKind::Interval { .. } => "interval",
                ReminderKind::Fixed { .. } => "fixed",
            },
            next_due: (next_due != FAR_FUTURE).then_some(next_due),
            is_due: snap.is_due(now),
            goal_reached: snap.goal_reached(now),
            today_count: snap.today_count,
            daily_goal: snap.config.effective_daily_goal(),
            progress: daily_progress(snap),
        }
    }
}

pub fn run(book: Option<PathBuf>, at: Option<Timestamp>) -> CliResult {
    let ctx = Context::load(book)?;
    let book = ctx.book()?;
    let profile = ctx.profile(&book);
    let dnd = profile.dnd_window();
    let now = now_or(at);

    let rows: Vec<ReminderRow> = book
        .snapshots(&profile, now)
        .iter()
        .map(|snap| ReminderRow::evaluate(snap, now, &dnd))
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
