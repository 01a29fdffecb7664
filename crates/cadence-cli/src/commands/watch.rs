//! Live overlay loop.
//!
//! Drives a [`Sequencer`] from one task: a fixed-cadence tick and stdin
//! command lines are multiplexed with `select!`, so a tick and a logged
//! entry are never processed at the same time. Every event is printed as one
//! JSON line on stdout.
//!
//! Commands: `log [reminder] [--count N]`, `skip [reminder]`,
//! `snooze [minutes]`, `cancel`, `status`, `reload`, `quit`. Without a
//! reminder, `log` and `skip` act on the reminder currently shown. Reminder
//! names may contain spaces and digits (`log Break 2`). `snooze` only takes
//! durations listed in `snooze.presets`, unless that list is empty.

use std::path::PathBuf;
use std::time::Duration;

use cadence_core::{
    Clock, DndWindow, Event, Profile, ReminderBook, ReminderEntry, Sequencer, SystemClock,
    Timestamp,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::{CliResult, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
enum WatchCommand {
    Log {
        reminder: Option<String>,
        count: u32,
    },
    Skip {
        reminder: Option<String>,
    },
    Snooze {
        minutes: Option<u32>,
    },
    Cancel,
    Status,
    Reload,
    Quit,
}

impl WatchCommand {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match verb {
            "log" => {
                let mut name = Vec::new();
                let mut count = 1;
                let mut args = rest.iter();
                while let Some(&word) = args.next() {
                    if word == "--count" || word == "-n" {
                        let value = args
                            .next()
                            .ok_or_else(|| format!("{word} needs a number"))?;
                        count = value
                            .parse::<u32>()
                            .map_err(|_| format!("'{value}' is not a count"))?;
                    } else {
                        name.push(word);
                    }
                }
                let name = name.join(" ");
                if count == 0 {
                    return Err("count must be positive".into());
                }
                WatchCommand::Log {
                    reminder: (!name.is_empty()).then_some(name),
                    count,
                }
            }
            "skip" => {
                let name = rest.join(" ");
                WatchCommand::Skip {
                    reminder: (!name.is_empty()).then_some(name),
                }
            }
            "snooze" => {
                let minutes = match rest.as_slice() {
                    [] => None,
                    [m] => Some(
                        m.parse::<u32>()
                            .map_err(|_| format!("'{m}' is not a number of minutes"))?,
                    ),
                    _ => return Err("usage: snooze [minutes]".into()),
                };
                WatchCommand::Snooze { minutes }
            }
            "cancel" => WatchCommand::Cancel,
            "status" => WatchCommand::Status,
            "reload" => WatchCommand::Reload,
            "quit" | "exit" => WatchCommand::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(Some(command))
    }
}

struct Watcher<C: Clock> {
    ctx: Context,
    clock: C,
    book: ReminderBook,
    profile: Profile,
    dnd: DndWindow,
    sequencer: Sequencer,
}

impl<C: Clock> Watcher<C> {
    fn new(ctx: Context, clock: C) -> Result<Self, Box<dyn std::error::Error>> {
        let book = ctx.book()?;
        let profile = ctx.profile(&book);
        let dnd = profile.dnd.to_window()?;
        Ok(Self {
            ctx,
            clock,
            book,
            profile,
            dnd,
            sequencer: Sequencer::new(),
        })
    }

    fn tick(&mut self) -> Option<Event> {
        let now = self.clock.now();
        let snaps = self.book.snapshots(&self.profile, now);
        self.sequencer.tick(now, &snaps, &self.dnd)
    }

    /// Apply one stdin command. `Ok(None)` means nothing changed.
    fn handle(&mut self, command: WatchCommand) -> Result<Option<Event>, Box<dyn std::error::Error>> {
        let now = self.clock.now();
        match command {
            WatchCommand::Log { reminder, count } => {
                self.record(reminder, now, ReminderEntry::new(now, count))
            }
            WatchCommand::Skip { reminder } => self.record(reminder, now, ReminderEntry::skip(now)),
            WatchCommand::Snooze { minutes } => {
                let snooze = &self.ctx.config.snooze;
                let minutes = minutes.unwrap_or(snooze.default_minutes);
                if !snooze.presets.is_empty() && !snooze.presets.contains(&minutes) {
                    let presets: Vec<String> =
                        snooze.presets.iter().map(u32::to_string).collect();
                    return Err(format!(
                        "snooze for {minutes} minutes is not a preset (choose {})",
                        presets.join(", ")
                    )
                    .into());
                }
                Ok(Some(self.sequencer.snooze(now, minutes)))
            }
            WatchCommand::Cancel => Ok(Some(self.sequencer.cancel_snooze(now))),
            WatchCommand::Status => Ok(Some(self.sequencer.snapshot(now))),
            WatchCommand::Reload => {
                self.book = self.ctx.book()?;
                self.profile = self.ctx.profile(&self.book);
                self.dnd = self.profile.dnd.to_window()?;
                debug!(profile = %self.profile.name, "reminder book reloaded");
                Ok(self.sequencer.reset(now))
            }
            WatchCommand::Quit => Ok(None),
        }
    }

    fn record(
        &mut self,
        reminder: Option<String>,
        now: Timestamp,
        mut entry: ReminderEntry,
    ) -> Result<Option<Event>, Box<dyn std::error::Error>> {
        let active = self.sequencer.active_reminder();
        let query = match (reminder, active) {
            (Some(name), _) => name,
            (None, Some(id)) => id.to_string(),
            (None, None) => return Err("no reminder is showing; name one".into()),
        };

        let id = self.book.find(&query)?.config.id;
        if active == Some(id) {
            entry.duration_secs = self
                .sequencer
                .overlay_elapsed(now)
                .and_then(|elapsed| u64::try_from(elapsed.num_seconds()).ok());
        }
        // only adopt the new entry once it is on disk
        let mut updated = self.book.clone();
        updated.log_entry(&query, entry)?;
        self.ctx.save_book(&updated)?;
        self.book = updated;

        let snaps = self.book.snapshots(&self.profile, now);
        Ok(self.sequencer.logged(id, now, &snaps, &self.dnd))
    }
}

fn emit(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

async fn watch_loop(ctx: Context) -> CliResult {
    let period = Duration::from_secs(ctx.config.tick_interval_secs.max(1));
    let mut watcher = Watcher::new(ctx, SystemClock)?;
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    emit(&watcher.sequencer.snapshot(watcher.clock.now()))?;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = watcher.tick() {
                    emit(&event)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = match WatchCommand::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        eprintln!("error: {message}");
                        continue;
                    }
                };
                if command == WatchCommand::Quit {
                    break;
                }
                match watcher.handle(command) {
                    Ok(Some(event)) => emit(&event)?,
                    Ok(None) => {}
                    Err(e) => eprintln!("error: {e}"),
                }
            }
        }
    }
    Ok(())
}

pub fn run(book: Option<PathBuf>) -> CliResult {
    let ctx = Context::load(book)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_loop(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{BookReminder, OverlayState, ReminderConfig, ReminderKind};
    use chrono::NaiveDate;
    use std::cell::Cell;

    struct FakeClock(Cell<Timestamp>);

    impl Clock for FakeClock {
        fn now(&self) -> Timestamp {
            self.0.get()
        }
    }

    fn at(h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2026, 7, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(WatchCommand::parse("   "), Ok(None));
        assert_eq!(
            WatchCommand::parse("log Green Tea --count 2"),
            Ok(Some(WatchCommand::Log {
                reminder: Some("Green Tea".into()),
                count: 2
            }))
        );
        assert_eq!(
            WatchCommand::parse("log -n 3"),
            Ok(Some(WatchCommand::Log {
                reminder: None,
                count: 3
            }))
        );
        // digits in a name stay part of the name
        assert_eq!(
            WatchCommand::parse("log Break 2"),
            Ok(Some(WatchCommand::Log {
                reminder: Some("Break 2".into()),
                count: 1
            }))
        );
        assert_eq!(
            WatchCommand::parse("log"),
            Ok(Some(WatchCommand::Log {
                reminder: None,
                count: 1
            }))
        );
        assert_eq!(
            WatchCommand::parse("skip Meds"),
            Ok(Some(WatchCommand::Skip {
                reminder: Some("Meds".into())
            }))
        );
        assert_eq!(
            WatchCommand::parse("snooze 30"),
            Ok(Some(WatchCommand::Snooze { minutes: Some(30) }))
        );
        assert_eq!(WatchCommand::parse("quit"), Ok(Some(WatchCommand::Quit)));
        assert!(WatchCommand::parse("snooze soon").is_err());
        assert!(WatchCommand::parse("log Water --count 0").is_err());
        assert!(WatchCommand::parse("log Water --count").is_err());
        assert!(WatchCommand::parse("log Water -n two").is_err());
        assert!(WatchCommand::parse("dance").is_err());
    }

    #[test]
    fn logging_the_shown_reminder_records_duration_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let book_path = dir.path().join("reminders.toml");

        let mut book = ReminderBook::default();
        book.reminders.push(BookReminder::new(ReminderConfig::new(
            "Water",
            ReminderKind::interval(60, None),
            at(8, 0),
        )));
        book.save(&book_path).unwrap();

        let ctx = Context {
            config: cadence_core::Config::default(),
            book_path: book_path.clone(),
        };
        let clock = FakeClock(Cell::new(at(9, 0)));
        let mut watcher = Watcher::new(ctx, clock).unwrap();

        assert!(matches!(watcher.tick(), Some(Event::OverlayOpened { .. })));
        let shown = watcher.sequencer.active_reminder().unwrap();

        watcher.clock.0.set(at(9, 2));
        let event = watcher
            .handle(WatchCommand::Log {
                reminder: None,
                count: 1,
            })
            .unwrap();
        assert!(matches!(event, Some(Event::OverlayClosed { .. })));
        assert_eq!(watcher.sequencer.state(), OverlayState::Idle);

        let saved = ReminderBook::load(&book_path).unwrap();
        let entry = &saved.find(&shown.to_string()).unwrap().entries.entries()[0];
        assert_eq!(entry.timestamp, at(9, 2));
        assert_eq!(entry.duration_secs, Some(120));
    }

    fn watcher_with_water(dir: &std::path::Path) -> Watcher<FakeClock> {
        let book_path = dir.join("reminders.toml");
        let mut book = ReminderBook::default();
        book.reminders.push(BookReminder::new(ReminderConfig::new(
            "Water",
            ReminderKind::interval(60, None),
            at(8, 0),
        )));
        book.save(&book_path).unwrap();

        let ctx = Context {
            config: cadence_core::Config::default(),
            book_path,
        };
        Watcher::new(ctx, FakeClock(Cell::new(at(9, 0)))).unwrap()
    }

    #[test]
    fn failed_save_keeps_book_and_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = watcher_with_water(dir.path());
        assert!(watcher.tick().is_some());
        let shown = watcher.sequencer.active_reminder().unwrap();

        // a regular file where the book's directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        watcher.ctx.book_path = blocker.join("reminders.toml");

        let result = watcher.handle(WatchCommand::Log {
            reminder: None,
            count: 1,
        });
        assert!(result.is_err());
        assert!(watcher.book.find("Water").unwrap().entries.entries().is_empty());
        assert_eq!(watcher.sequencer.state(), OverlayState::Showing(shown));
    }

    #[test]
    fn snooze_accepts_only_presets() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = watcher_with_water(dir.path());

        let err = watcher
            .handle(WatchCommand::Snooze { minutes: Some(45) })
            .unwrap_err();
        assert!(err.to_string().contains("15, 30, 60, 120"), "got: {err}");
        assert!(!watcher.sequencer.is_snoozing(at(9, 0)));

        let event = watcher
            .handle(WatchCommand::Snooze { minutes: None })
            .unwrap();
        assert!(matches!(event, Some(Event::SnoozeStarted { .. })));

        watcher.ctx.config.snooze.presets.clear();
        assert!(watcher
            .handle(WatchCommand::Snooze { minutes: Some(45) })
            .is_ok());
    }

    #[test]
    fn logging_without_overlay_needs_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: cadence_core::Config::default(),
            book_path: dir.path().join("reminders.toml"),
        };
        let mut watcher = Watcher::new(ctx, FakeClock(Cell::new(at(9, 0)))).unwrap();
        assert!(watcher
            .handle(WatchCommand::Skip { reminder: None })
            .is_err());
    }
}
