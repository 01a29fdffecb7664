use std::path::PathBuf;

use cadence_core::status::{completed, format_short_time, next_event, upcoming};
use cadence_core::Timestamp;
use serde_json::json;

use super::due::ReminderRow;
use super::{now_or, CliResult, Context};

pub fn run(book: Option<PathBuf>, at: Option<Timestamp>, as_json: bool) -> CliResult {
    let ctx = Context::load(book)?;
    let book = ctx.book()?;
    let profile = ctx.profile(&book);
    let dnd = profile.dnd_window();
    let now = now_or(at);
    let snaps = book.snapshots(&profile, now);
    let next = next_event(now, &snaps, &dnd);

    if as_json {
        let rows: Vec<ReminderRow> = snaps
            .iter()
            .map(|snap| ReminderRow::evaluate(snap, now, &dnd))
            .collect();
        let out = json!({
            "profile": &profile.name,
            "at": now,
            "next": next,
            "dnd_active": dnd.is_inside(now),
            "reminders": rows,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Profile: {}", profile.name);
    println!("{next}");

    let pending = upcoming(now, &snaps, &dnd);
    if !pending.is_empty() {
        println!();
        println!("Upcoming:");
        for (snap, due_at) in pending {
            let when = if due_at <= now {
                "due now".to_string()
            } else {
                format!("in {}", format_short_time((due_at - now).num_seconds()))
            };
            let goal = snap.config.effective_daily_goal();
            if goal > 0 {
                println!("  {:<20} {:<12} {}/{}", snap.name(), when, snap.today_count, goal);
            } else {
                println!("  {:<20} {}", snap.name(), when);
            }
        }
    }

    let done = completed(now, &snaps);
    if !done.is_empty() {
        println!();
        println!("Completed today:");
        for snap in done {
            println!("  {}", snap.name());
        }
    }
    Ok(())
}
