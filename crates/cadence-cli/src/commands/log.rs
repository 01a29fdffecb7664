use std::path::PathBuf;

use cadence_core::{ReminderEntry, Timestamp};
use serde_json::json;
use tracing::info;

use super::{now_or, CliResult, Context};

pub fn run(
    book: Option<PathBuf>,
    reminder: &str,
    count: u32,
    skip: bool,
    at: Option<Timestamp>,
) -> CliResult {
    let ctx = Context::load(book)?;
    let mut book = ctx.book()?;
    let now = now_or(at);

    let entry = if skip {
        ReminderEntry::skip(now)
    } else {
        ReminderEntry::new(now, count)
    };
    let id = book.log_entry(reminder, entry.clone())?;
    ctx.save_book(&book)?;
    info!(reminder = %id, skipped = skip, "entry logged");

    let logged = book.find(&id.to_string())?;
    let snap = logged.snapshot(now);
    let out = json!({
        "type": "entry_logged",
        "reminder_id": id,
        "name": snap.name(),
        "entry": entry,
        "today_count": snap.today_count,
        "goal_reached": snap.goal_reached(now),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
