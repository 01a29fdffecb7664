//! Profile selection commands.
//!
//! Profiles live in the reminder book; the active one is remembered in the
//! config so every other command picks up its reminders and DND window.

use std::path::PathBuf;

use cadence_core::CoreError;
use clap::Subcommand;

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// List profiles in the reminder book
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the active profile
    Current,
    /// Make another profile active
    Switch {
        /// Profile name
        name: String,
    },
}

pub fn run(book: Option<PathBuf>, action: ProfileAction) -> CliResult {
    let mut ctx = Context::load(book)?;
    let book = ctx.book()?;

    match action {
        ProfileAction::List { json } => {
            let active = ctx.profile(&book);
            if json {
                println!("{}", serde_json::to_string_pretty(&book.profiles)?);
                return Ok(());
            }
            if book.profiles.is_empty() {
                println!("* {} (implicit)", active.name);
                return Ok(());
            }
            for profile in &book.profiles {
                let marker = if profile.name == active.name { "*" } else { " " };
                let count = book.active(profile).count();
                let dnd = if profile.dnd.enabled {
                    format!("dnd {}-{}", profile.dnd.start, profile.dnd.end)
                } else {
                    "dnd off".to_string()
                };
                println!("{marker} {:<16} {count} reminders, {dnd}", profile.name);
            }
        }
        ProfileAction::Current => {
            let active = ctx.profile(&book);
            println!("{}", serde_json::to_string_pretty(&active)?);
        }
        ProfileAction::Switch { name } => {
            if !book.has_profile(&name) {
                return Err(CoreError::NotFound {
                    kind: "profile",
                    query: name,
                }
                .into());
            }
            ctx.config.active_profile = Some(name.clone());
            ctx.config.save()?;
            println!("active profile: {name}");
        }
    }
    Ok(())
}
