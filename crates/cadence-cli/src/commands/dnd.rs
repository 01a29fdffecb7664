use std::path::PathBuf;

use cadence_core::Timestamp;
use serde_json::json;

use super::{now_or, CliResult, Context};

pub fn run(book: Option<PathBuf>, at: Option<Timestamp>) -> CliResult {
    let ctx = Context::load(book)?;
    let book = ctx.book()?;
    let profile = ctx.profile(&book);
    let window = profile.dnd.to_window()?;
    let now = now_or(at);

    let out = json!({
        "profile": &profile.name,
        "enabled": window.enabled,
        "start": &profile.dnd.start,
        "end": &profile.dnd.end,
        "inside": window.is_inside(now),
        "latest_window_end": window.latest_window_end(now),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
