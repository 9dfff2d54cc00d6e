//! class-scheduler - weekly class timetable TUI
//!
//! Add classes to a seven-day calendar, get told when they clash, and
//! find free gaps of a given length.

mod app;
mod config;
mod models;
mod screens;
mod services;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::models::{FreeSlot, Weekday};
use crate::services::{export, ScheduleStorage, Scheduler};

/// class-scheduler - Weekly Class Planner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Config file path (default: ~/.config/class-scheduler/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Schedule file path (default: ~/.local/share/class-scheduler/schedule.json)
    #[arg(long)]
    data_file: Option<String>,

    /// Print the schedule as text and exit
    #[arg(long, conflicts_with = "free")]
    export: bool,

    /// Print free slots of at least this many minutes and exit
    #[arg(long, value_name = "MINUTES")]
    free: Option<u32>,

    /// Restrict --free to these days (repeatable)
    #[arg(long = "day", value_name = "DAY", requires = "free")]
    days: Vec<Weekday>,
}

impl Args {
    fn is_headless(&self) -> bool {
        self.export || self.free.is_some()
    }
}

/// Route logs to stderr, or to a file while the TUI owns the terminal.
fn init_logging(args: &Args) -> Result<()> {
    let filter = if args.debug {
        "class_scheduler=debug,info"
    } else {
        "class_scheduler=info,warn"
    };

    let writer = if args.is_headless() {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        let dir = config::Config::data_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("class-scheduler.log"))
            .context("Failed to open log file")?;
        BoxMakeWriter::new(Mutex::new(log_file))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(args.is_headless()),
        )
        .init();
    Ok(())
}

/// One line per slot, longest first.
fn format_free_slots(slots: &[FreeSlot]) -> String {
    if slots.is_empty() {
        return "No free slots found.\n".to_string();
    }

    slots
        .iter()
        .map(|slot| {
            format!(
                "{:<10} {} - {}  {}\n",
                slot.day.name(),
                slot.start_time,
                slot.end_time,
                slot.duration_str()
            )
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    // Load configuration
    let mut config = if let Some(path) = &args.config {
        config::Config::from_file(path)?
    } else {
        config::Config::load()?
    };

    // Override data_file if specified
    if let Some(data_file) = &args.data_file {
        config.schedule.data_file = data_file.clone();
    }

    if args.is_headless() {
        let scheduler = Scheduler::open(config.new_index(), ScheduleStorage::new(config.data_file()));

        if args.export {
            let today = chrono::Local::now().date_naive();
            print!("{}", export::export_schedule_text(&scheduler.all_classes(), today));
        } else if let Some(minutes) = args.free {
            let days = (!args.days.is_empty()).then_some(args.days.as_slice());
            print!("{}", format_free_slots(&scheduler.suggest_free_slots(minutes, days)));
        }
        return Ok(());
    }

    // Run the TUI application
    let mut app = app::App::new(config).await?;
    app.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClockTime;

    #[test]
    fn test_args_parse_days() {
        let args = Args::parse_from(["class-scheduler", "--free", "90", "--day", "mon", "--day", "Friday"]);
        assert_eq!(args.free, Some(90));
        assert_eq!(args.days, vec![Weekday::Monday, Weekday::Friday]);
        assert!(args.is_headless());
    }

    #[test]
    fn test_day_requires_free() {
        assert!(Args::try_parse_from(["class-scheduler", "--day", "mon"]).is_err());
    }

    #[test]
    fn test_format_free_slots() {
        let slots = vec![FreeSlot::new(
            Weekday::Monday,
            ClockTime::at_hour(10),
            ClockTime::at_hour(21),
        )];
        assert_eq!(format_free_slots(&slots), "Monday     10:00 - 21:00  11h\n");
        assert_eq!(format_free_slots(&[]), "No free slots found.\n");
    }
}
