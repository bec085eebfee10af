//! liftlog - Strength training log with PR and weekly volume analytics

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use liftlog::db::{DEFAULT_RECENT_LIMIT, Database};
use liftlog::models::{DATE_FORMAT, WorkoutDay, WorkoutSet, parse_iso_date};
use liftlog::progress::{PrQuery, PrReport, VolumeQuery, VolumeReport, pr_report, volume_report};
use liftlog::tui::App;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(author, version, about = "Strength training log with PRs and weekly volume")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "LIFTLOG_DB", default_value = "liftlog.db", global = true)]
    db: String,

    /// Whose log to read and write
    #[arg(long, env = "LIFTLOG_USER", default_value = "default", global = true)]
    user: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Dashboard,

    /// Show all-time personal records
    Prs {
        /// Only count sets marked completed
        #[arg(long)]
        require_completed: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show weekly volume over a date range
    Volume {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// Last day (inclusive), YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,

        /// Only count sets marked completed
        #[arg(long)]
        require_completed: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Log a set
    Log {
        /// Exercise name (e.g., "Bench Press")
        exercise: String,

        /// Reps performed
        #[arg(short, long)]
        reps: u32,

        /// Weight lifted (0 for bodyweight)
        #[arg(short, long, default_value = "0")]
        weight: f64,

        /// Day of the set, YYYY-MM-DD (default: today)
        #[arg(short, long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Rest after the set, seconds
        #[arg(long, default_value = "0")]
        rest: u32,

        /// Mark the set completed now
        #[arg(short, long)]
        completed: bool,
    },

    /// Save a whole day from a JSON document (replaces that day)
    Import {
        file: PathBuf,
    },

    /// Show one day
    Day {
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,

        #[arg(long)]
        json: bool,
    },

    /// List recent days
    Recent {
        /// Number of days to show (max 100)
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_iso_date(s).ok_or_else(|| format!("expected a YYYY-MM-DD date, got {:?}", s))
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = Database::open(&cli.db)?;
    let user = cli.user.as_str();

    match cli.command {
        Some(Commands::Prs { require_completed, json }) => {
            let report = pr_report(&db, user, &PrQuery { require_completed })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_prs(&report);
            }
        }

        Some(Commands::Volume { from, to, require_completed, json }) => {
            let query = VolumeQuery { from, to, require_completed };
            let report = volume_report(&db, user, &query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_volume(&report);
            }
        }

        Some(Commands::Log { exercise, reps, weight, date, rest, completed }) => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut set = WorkoutSet::new(weight, reps);
            set.rest_seconds = rest;
            if completed {
                set = set.completed(Utc::now());
            }
            let day = db.log_set(user, date, &exercise, set.clone())?;
            println!(
                "Logged: {} - {}x{} on {} ({} sets that day)",
                exercise.trim(),
                set.weight,
                set.reps,
                day.date_label(),
                day.set_count()
            );
        }

        Some(Commands::Import { file }) => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let day: WorkoutDay = serde_json::from_str(&text)
                .with_context(|| format!("invalid workout day in {}", file.display()))?;
            db.upsert_day(user, &day)?;
            println!("Saved {} ({} entries, {} sets)", day.date_label(), day.entries.len(), day.set_count());
        }

        Some(Commands::Day { date, json }) => {
            let day = db.get_day(user, date)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&day)?);
            } else {
                print_day(&day);
            }
        }

        Some(Commands::Recent { limit }) => {
            let days = db.list_recent_days(user, limit)?;
            println!("Recent days:");
            println!("{:-<60}", "");
            for day in &days {
                let names: Vec<&str> = day.entries.iter().map(|e| e.exercise_name.as_str()).collect();
                println!(
                    "{} | {:10} | {:3} sets | {}",
                    day.date.format(DATE_FORMAT),
                    if day.workout_type.is_empty() { "-" } else { day.workout_type.as_str() },
                    day.set_count(),
                    names.join(", ")
                );
            }
        }

        Some(Commands::Dashboard) | None => {
            let mut app = App::new(db, user)?;
            app.run()?;
        }
    }

    Ok(())
}

fn print_prs(report: &PrReport) {
    println!("Personal Records");
    println!("{:-<72}", "");
    if report.prs.is_empty() {
        println!("No countable sets yet");
        return;
    }
    for pr in &report.prs {
        let from = match pr.best_e1rm_set.date {
            Some(date) => format!(
                "{}x{} on {}",
                pr.best_e1rm_set.weight,
                pr.best_e1rm_set.reps,
                date.format(DATE_FORMAT)
            ),
            None => "-".to_string(),
        };
        println!(
            "{:24} | best {:>7}x{:<3} | e1RM {:>7.1} | {}",
            pr.exercise_name, pr.best_weight, pr.best_weight_reps, pr.best_e1rm, from
        );
    }
}

fn print_volume(report: &VolumeReport) {
    println!("Weekly Volume");
    println!("{:-<48}", "");
    if report.weeks.is_empty() {
        println!("No countable sets in range");
        return;
    }
    for week in &report.weeks {
        println!(
            "{} | {:4} sets | {:5} reps | {:>10.1}",
            week.week_start.format(DATE_FORMAT),
            week.total_sets,
            week.total_reps,
            week.total_volume
        );
    }
}

fn print_day(day: &WorkoutDay) {
    println!("{} {}", day.date.format(DATE_FORMAT), day.workout_type);
    println!("{:-<40}", "");
    if day.entries.is_empty() {
        println!("Nothing logged");
        return;
    }
    for entry in &day.entries {
        println!("{}", entry.exercise_name);
        for (i, set) in entry.sets.iter().enumerate() {
            let mark = if set.completed_at.is_some() { "done" } else { "" };
            println!("  {}. {}x{} {}", i + 1, set.weight, set.reps, mark);
        }
    }
}
