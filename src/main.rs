//! # study - Study Schedule CLI
//!
//! Generates a day-by-day study plan for a topic and tracks it as you work
//! through it: completing tasks, postponing and splitting them, replanning
//! unfinished work onto today and keeping a daily completion streak.
//!
//! ## Key Features
//!
//! - **Schedule Generation**: 1 to 90 consecutive days with level-specific subtopics and tasks
//! - **Adaptive Backlog**: Postpone or split tasks, pull everything unfinished onto today
//! - **Today View**: Today's day, its three quickest open tasks and the current streak
//! - **Enrichment**: Attach summaries, key topics and study tips to a day from a JSON payload
//! - **Local File Storage**: Plain JSON documents, compatible with older exports
//!
//! ## Quick Start
//!
//! ```bash
//! # Two weeks of Rust, two hours a day
//! study new "Rust" --days 14 --hours 2 --level intermediate
//!
//! # What to do today
//! study today
//!
//! # Tick off today's second task, push the third to tomorrow
//! study done 2
//! study postpone 3
//!
//! # Missed a few days? Move the backlog onto today
//! study replan
//! ```
//!
//! Data is stored locally in `~/.study/` (override with `--dir` or
//! `STUDY_PLANNER_DIR`). Set `RUST_LOG=info` to see what each command changed.

use chrono::Local;
use clap::Parser;

pub mod backlog;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod display;
pub mod edit;
pub mod enrich;
pub mod error;
pub mod fields;
pub mod generator;
pub mod migrate;
pub mod progress;
pub mod schedule;
pub mod streak;
pub mod task;
pub mod today;

use cli::Cli;
use cmd::*;
use db::JsonStore;
use error::Result;

fn main() {
    config::init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Completions need no data directory.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let dir = config::resolve_data_dir(cli.dir.as_deref())?;
    let mut store = JsonStore::open(&dir)?;
    tracing::debug!(dir = %store.dir().display(), "opened store");

    let today = Local::now().date_naive();
    let target = cli.schedule.as_deref();

    match cli.command {
        Commands::New { topic, hours, days, level, goal, pomodoro } =>
            cmd_new(&mut store, topic, hours, days, level, goal, pomodoro, today).map(|_| ()),

        Commands::List => cmd_list(&store),

        Commands::Use { id } => cmd_use(&mut store, &id),

        Commands::Delete { id } => cmd_delete(&mut store, &id),

        Commands::Show { day } => cmd_show(&store, target, day, today),

        Commands::Today => cmd_today(&store, target, today),

        Commands::Done { task } => cmd_done(&mut store, target, &task, today),

        Commands::Postpone { task } => cmd_postpone(&mut store, target, &task, today),

        Commands::Split { task, minutes } => cmd_split(&mut store, target, &task, minutes, today),

        Commands::Replan => cmd_replan(&mut store, target, today),

        Commands::Time { task, minutes } => cmd_time(&mut store, target, &task, minutes, today),

        Commands::Notes { day, text } => cmd_notes(&mut store, target, day, &text),

        Commands::At { day, time } => cmd_at(&mut store, target, day, &time),

        Commands::Enrich { day, file, error } => cmd_enrich(&mut store, target, day, file, error),

        Commands::Migrate => cmd_migrate(&mut store),

        Commands::Import { input } => cmd_import(&mut store, &input),

        Commands::Streak => cmd_streak(&store),

        Commands::Completions { .. } => Ok(()),
    }
}
