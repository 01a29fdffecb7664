use std::path::PathBuf;

use cadence_core::Timestamp;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cadence", version, about = "Cadence reminder CLI")]
struct Cli {
    /// Reminder book to use instead of the configured one
    #[arg(long, global = true)]
    book: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the next event and every reminder of the active profile
    Status {
        /// Evaluate at this local time instead of now (e.g. 2026-05-02T09:30)
        #[arg(long, value_parser = commands::parse_timestamp)]
        at: Option<Timestamp>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print due calculations for the active profile as JSON
    Due {
        #[arg(long, value_parser = commands::parse_timestamp)]
        at: Option<Timestamp>,
    },
    /// Log a completed (or skipped) reminder
    Log {
        /// Reminder name or id
        reminder: String,
        /// How many units were completed
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
        /// Record a skip instead of a completion
        #[arg(long, conflicts_with = "count")]
        skip: bool,
        #[arg(long, value_parser = commands::parse_timestamp)]
        at: Option<Timestamp>,
    },
    /// Show the do-not-disturb window of the active profile
    Dnd {
        #[arg(long, value_parser = commands::parse_timestamp)]
        at: Option<Timestamp>,
    },
    /// Run the live overlay sequencer, reading commands from stdin
    Watch,
    /// Profile selection
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CADENCE_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let book = cli.book;
    let result = match cli.command {
        Commands::Status { at, json } => commands::status::run(book, at, json),
        Commands::Due { at } => commands::due::run(book, at),
        Commands::Log {
            reminder,
            count,
            skip,
            at,
        } => commands::log::run(book, &reminder, count, skip, at),
        Commands::Dnd { at } => commands::dnd::run(book, at),
        Commands::Watch => commands::watch::run(book),
        Commands::Profile { action } => commands::profile::run(book, action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
