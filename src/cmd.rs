//! Command implementations for the CLI interface.
//!
//! Each handler loads the target schedule from the store, applies one
//! operation from the scheduling core and saves the result. Handlers are
//! generic over the store so they run the same against the JSON files and an
//! in-memory store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use serde::Deserialize;
use tracing::info;

use crate::backlog::{pending_before, postpone_task, replan_from, split_task, update_task_time_spent, MIN_SPLIT_PART_MIN};
use crate::cli::Cli;
use crate::db::Repository;
use crate::display::*;
use crate::edit::{attach_enrichment, parse_scheduled_time, set_notes, set_scheduled_time, toggle_task};
use crate::enrich::{enrich_day, FileEnricher};
use crate::error::{PlannerError, Result};
use crate::fields::{Goal, Level};
use crate::generator::generate_schedule_from;
use crate::migrate::{migrate_schedule, needs_migration};
use crate::progress::{calculate_day_progress, calculate_progress};
use crate::schedule::{Schedule, ScheduleConfig, TaskPos};
use crate::streak::{update_streak, StreakStore};
use crate::today::{get_top3_tasks, today_index_on};

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new schedule and make it active.
    New {
        /// What to study.
        topic: String,
        /// Study hours per day (0.5 to 12).
        #[arg(long, default_value_t = 2.0)]
        hours: f64,
        /// Number of days (1 to 90).
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Level: beginner | intermediate | advanced.
        #[arg(long, value_enum, default_value_t = Level::Beginner)]
        level: Level,
        /// Goal: exam | skill | review.
        #[arg(long, value_enum, default_value_t = Goal::Skill)]
        goal: Goal,
        /// Mark every task as a 25/5 minute pomodoro block.
        #[arg(long)]
        pomodoro: bool,
    },

    /// List stored schedules.
    List,

    /// Make a schedule the active one.
    Use {
        /// Schedule id or unique id prefix.
        id: String,
    },

    /// Delete a schedule.
    Delete {
        /// Schedule id or unique id prefix.
        id: String,
    },

    /// Show every day of the schedule, or one day in detail.
    Show {
        /// Day number to show in detail.
        #[arg(long)]
        day: Option<usize>,
    },

    /// Show today's day, its three quickest open tasks and the streak.
    Today,

    /// Toggle a task between done and not done.
    Done {
        /// Task: N (today's task N), D.N (day D, task N) or a task id.
        task: String,
    },

    /// Move a task to the front of the next day.
    Postpone {
        /// Task: N, D.N or a task id.
        task: String,
    },

    /// Split a task in two.
    Split {
        /// Task: N, D.N or a task id.
        task: String,
        /// Length of the first part in minutes.
        minutes: u32,
    },

    /// Move unfinished tasks from earlier days to today.
    Replan,

    /// Record minutes actually spent on a task.
    Time {
        /// Task: N, D.N or a task id.
        task: String,
        minutes: u32,
    },

    /// Set notes for a day. Empty text clears them.
    Notes {
        /// Day number.
        day: usize,
        text: String,
    },

    /// Set the time of day a day is planned for ("none" clears it).
    At {
        /// Day number.
        day: usize,
        /// HH:MM
        time: String,
    },

    /// Attach enrichment content to a day.
    Enrich {
        /// Day number.
        day: usize,
        /// JSON payload with summary, keyTopics, studyTips and tasks.
        #[arg(long, conflicts_with = "error", required_unless_present = "error")]
        file: Option<PathBuf>,
        /// Record a failed enrichment with this message instead.
        #[arg(long)]
        error: Option<String>,
    },

    /// Fill in fields missing from older stored tasks.
    Migrate,

    /// Import schedules from a JSON file (a single schedule or an array).
    Import {
        /// Input JSON file path
        input: PathBuf,
    },

    /// Show the current completion streak.
    Streak,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve a schedule reference (full id or unique prefix) to an id.
pub fn resolve_schedule_id(schedules: &[Schedule], reference: &str) -> Result<String> {
    if let Some(s) = schedules.iter().find(|s| s.id == reference) {
        return Ok(s.id.clone());
    }
    let matches: Vec<&Schedule> = schedules.iter().filter(|s| s.id.starts_with(reference)).collect();
    match matches.len() {
        0 => Err(PlannerError::ScheduleNotFound(reference.to_string())),
        1 => Ok(matches[0].id.clone()),
        count => Err(PlannerError::Ambiguous {
            reference: reference.to_string(),
            count,
        }),
    }
}

/// Index of the day with the given 1-based day number.
pub fn resolve_day(schedule: &Schedule, day_number: usize) -> Result<usize> {
    schedule
        .days
        .iter()
        .position(|d| d.day_number == day_number)
        .ok_or(PlannerError::DayNotFound(day_number))
}

/// Resolve a task reference.
///
/// Accepts `N` (task N of the day at `today_index`), `D.N` (task N of day D),
/// or a task id / unique id prefix. Positions are 1-based.
pub fn resolve_task(schedule: &Schedule, today_index: usize, reference: &str) -> Result<TaskPos> {
    let not_found = || PlannerError::TaskNotFound(reference.to_string());
    let by_position = |day: usize, n: usize| -> Result<TaskPos> {
        let tasks = &schedule.days.get(day).ok_or_else(not_found)?.tasks;
        if n == 0 || n > tasks.len() {
            return Err(not_found());
        }
        Ok(TaskPos { day, task: n - 1 })
    };

    if let Some((d, n)) = reference.split_once('.') {
        if let (Ok(d), Ok(n)) = (d.parse::<usize>(), n.parse::<usize>()) {
            let day = resolve_day(schedule, d)?;
            return by_position(day, n);
        }
    }
    if let Ok(n) = reference.parse::<usize>() {
        return by_position(today_index, n);
    }
    if let Some(pos) = schedule.find_task(reference) {
        return Ok(pos);
    }

    let matches: Vec<TaskPos> = schedule
        .days
        .iter()
        .enumerate()
        .flat_map(|(day, d)| {
            d.tasks
                .iter()
                .enumerate()
                .filter(move |(_, t)| t.id.starts_with(reference))
                .map(move |(task, _)| TaskPos { day, task })
        })
        .collect();
    match matches.len() {
        0 => Err(not_found()),
        1 => Ok(matches[0]),
        count => Err(PlannerError::Ambiguous {
            reference: reference.to_string(),
            count,
        }),
    }
}

/// Load the targeted schedule (or the active one) in its current shape.
pub fn load_target<S: Repository + ?Sized>(store: &S, target: Option<&str>) -> Result<Schedule> {
    let id = match target {
        Some(reference) => Some(resolve_schedule_id(&store.list_all()?, reference)?),
        None => None,
    };
    let schedule = store.load(id.as_deref())?.ok_or(PlannerError::NoSchedules)?;
    Ok(migrate_schedule(&schedule))
}

/// Day and task ids for a resolved task position.
fn ids_at(schedule: &Schedule, pos: TaskPos) -> (String, String) {
    let day = &schedule.days[pos.day];
    (day.id.clone(), day.tasks[pos.task].id.clone())
}

/// Generate and store a new schedule.
#[allow(clippy::too_many_arguments)]
pub fn cmd_new<S: Repository + ?Sized>(
    store: &mut S,
    topic: String,
    hours: f64,
    days: u32,
    level: Level,
    goal: Goal,
    pomodoro: bool,
    today: NaiveDate,
) -> Result<Schedule> {
    let config = ScheduleConfig::new(topic.trim(), hours, days, level, goal, pomodoro);
    config.validate()?;
    let schedule = generate_schedule_from(&config, today);
    store.save(&schedule)?;
    println!(
        "Created schedule {} for '{}': {} days, {} tasks",
        schedule.id,
        schedule.config.topic,
        schedule.days.len(),
        schedule.task_count()
    );
    Ok(schedule)
}

/// List stored schedules with their progress.
pub fn cmd_list<S: Repository + ?Sized>(store: &S) -> Result<()> {
    let schedules = store.list_all()?;
    if schedules.is_empty() {
        println!("No schedules yet.");
        return Ok(());
    }
    let active = store.get_active_id()?;
    print_schedule_list(&schedules, active.as_deref());
    Ok(())
}

/// Make a schedule active.
pub fn cmd_use<S: Repository + ?Sized>(store: &mut S, reference: &str) -> Result<()> {
    let id = resolve_schedule_id(&store.list_all()?, reference)?;
    store.set_active_id(Some(&id))?;
    println!("Active schedule: {id}");
    Ok(())
}

/// Delete a schedule.
pub fn cmd_delete<S: Repository + ?Sized>(store: &mut S, reference: &str) -> Result<()> {
    let id = resolve_schedule_id(&store.list_all()?, reference)?;
    store.delete(&id)?;
    println!("Deleted schedule {id}");
    Ok(())
}

/// Show the schedule overview or one day.
pub fn cmd_show<S: Repository + ?Sized>(
    store: &S,
    target: Option<&str>,
    day: Option<usize>,
    today: NaiveDate,
) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    match day {
        Some(n) => {
            let idx = resolve_day(&schedule, n)?;
            print_day_detail(&schedule.days[idx], today);
        }
        None => print_days(&schedule, today_index_on(&schedule, today), today),
    }
    Ok(())
}

/// Today's view.
pub fn cmd_today<S: Repository + StreakStore + ?Sized>(
    store: &S,
    target: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let idx = today_index_on(&schedule, today);
    let Some(day) = schedule.days.get(idx) else {
        println!("This schedule has no days.");
        return Ok(());
    };
    let streak = store.load_streak()?;

    println!(
        "{}: overall {}%, streak {} day(s)",
        schedule.config.topic,
        calculate_progress(&schedule),
        streak.streak_count
    );
    if day.date != today {
        println!("(No day is dated today; showing the first day with open tasks.)");
    }
    print_day_detail(day, today);

    let behind = pending_before(&schedule, idx);
    if behind > 0 {
        println!("{behind} unfinished task(s) on earlier days; run `study replan` to move them here.");
    }

    let top = get_top3_tasks(&day.tasks);
    if top.is_empty() {
        let (_, total) = calculate_day_progress(day);
        if total > 0 {
            println!("All tasks done for today.");
        }
    } else {
        println!("Start with:");
        for task in top {
            let number = day.tasks.iter().position(|t| t.id == task.id).map_or(0, |i| i + 1);
            println!("  {}", format_task_line(number, task));
        }
    }
    Ok(())
}

/// Toggle a task and credit the streak when a task on today's day gets done.
pub fn cmd_done<S: Repository + StreakStore + ?Sized>(
    store: &mut S,
    target: Option<&str>,
    task: &str,
    today: NaiveDate,
) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let today_index = today_index_on(&schedule, today);
    let pos = resolve_task(&schedule, today_index, task)?;
    let (day_id, task_id) = ids_at(&schedule, pos);

    let updated = toggle_task(&schedule, &day_id, &task_id);
    store.save(&updated)?;

    let toggled = &updated.days[pos.day].tasks[pos.task];
    if toggled.completed {
        println!("Done: {}", toggled.title);
        if pos.day == today_index {
            let streak = update_streak(store, true, today)?;
            println!("Streak: {streak} day(s)");
        }
    } else {
        println!("Reopened: {}", toggled.title);
    }
    Ok(())
}

/// Postpone a task to the next day.
pub fn cmd_postpone<S: Repository + ?Sized>(
    store: &mut S,
    target: Option<&str>,
    task: &str,
    today: NaiveDate,
) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let pos = resolve_task(&schedule, today_index_on(&schedule, today), task)?;
    if pos.day + 1 >= schedule.days.len() {
        println!("Cannot postpone: day {} is the last day of the schedule.", schedule.days[pos.day].day_number);
        return Ok(());
    }
    let (day_id, task_id) = ids_at(&schedule, pos);
    let updated = postpone_task(&schedule, &day_id, &task_id);
    store.save(&updated)?;
    println!(
        "Postponed '{}' to day {}",
        schedule.days[pos.day].tasks[pos.task].title,
        updated.days[pos.day + 1].day_number
    );
    Ok(())
}

/// Split a task after checking the first part leaves at least five minutes
/// for the second.
pub fn cmd_split<S: Repository + ?Sized>(
    store: &mut S,
    target: Option<&str>,
    task: &str,
    minutes: u32,
    today: NaiveDate,
) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let pos = resolve_task(&schedule, today_index_on(&schedule, today), task)?;
    let original = &schedule.days[pos.day].tasks[pos.task];
    let total = original.duration_or_default();
    let max = total as i64 - MIN_SPLIT_PART_MIN as i64;
    if minutes < MIN_SPLIT_PART_MIN || minutes as i64 > max {
        return Err(PlannerError::InvalidSplit { total, max });
    }

    let (day_id, task_id) = ids_at(&schedule, pos);
    let updated = split_task(&schedule, &day_id, &task_id, minutes);
    store.save(&updated)?;
    println!("Split '{}' into {}m + {}m", original.title, minutes, total - minutes);
    Ok(())
}

/// Move the backlog to today.
pub fn cmd_replan<S: Repository + ?Sized>(store: &mut S, target: Option<&str>, today: NaiveDate) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let updated = replan_from(&schedule, today);
    if updated == schedule {
        println!("Nothing to replan.");
        return Ok(());
    }
    let idx = today_index_on(&schedule, today);
    let moved = updated.days[idx].tasks.len() - schedule.days[idx].tasks.len();
    store.save(&updated)?;
    println!("Moved {moved} unfinished task(s) to day {}", updated.days[idx].day_number);
    Ok(())
}

/// Record time spent on a task.
pub fn cmd_time<S: Repository + ?Sized>(
    store: &mut S,
    target: Option<&str>,
    task: &str,
    minutes: u32,
    today: NaiveDate,
) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let pos = resolve_task(&schedule, today_index_on(&schedule, today), task)?;
    let (day_id, task_id) = ids_at(&schedule, pos);
    let updated = update_task_time_spent(&schedule, &day_id, &task_id, minutes);
    store.save(&updated)?;
    println!("Recorded {minutes}m on '{}'", updated.days[pos.day].tasks[pos.task].title);
    Ok(())
}

/// Set or clear a day's notes.
pub fn cmd_notes<S: Repository + ?Sized>(store: &mut S, target: Option<&str>, day: usize, text: &str) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let idx = resolve_day(&schedule, day)?;
    let day_id = schedule.days[idx].id.clone();
    let updated = set_notes(&schedule, &day_id, text);
    store.save(&updated)?;
    if updated.days[idx].notes.is_some() {
        println!("Notes saved for day {day}");
    } else {
        println!("Notes cleared for day {day}");
    }
    Ok(())
}

/// Set or clear a day's scheduled time.
pub fn cmd_at<S: Repository + ?Sized>(store: &mut S, target: Option<&str>, day: usize, time: &str) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let idx = resolve_day(&schedule, day)?;
    let day_id = schedule.days[idx].id.clone();
    let parsed = match time.trim() {
        "" | "none" | "-" => None,
        other => Some(parse_scheduled_time(other)?),
    };
    let updated = set_scheduled_time(&schedule, &day_id, parsed.as_deref());
    store.save(&updated)?;
    match parsed {
        Some(t) => println!("Day {day} scheduled at {t}"),
        None => println!("Day {day} time cleared"),
    }
    Ok(())
}

/// Attach enrichment (or an enrichment failure) to a day.
pub fn cmd_enrich<S: Repository + ?Sized>(
    store: &mut S,
    target: Option<&str>,
    day: usize,
    file: Option<PathBuf>,
    error: Option<String>,
) -> Result<()> {
    let schedule = load_target(&*store, target)?;
    let idx = resolve_day(&schedule, day)?;
    let day_id = schedule.days[idx].id.clone();
    let updated = match (file, error) {
        (Some(path), _) => enrich_day(&schedule, &day_id, &FileEnricher::new(path)),
        (None, Some(message)) => attach_enrichment(&schedule, &day_id, Err(message)),
        (None, None) => return Err(PlannerError::InvalidConfig("pass --file or --error".into())),
    };
    store.save(&updated)?;
    match updated.days[idx].enriched_content.as_ref().and_then(|c| c.error.as_deref()) {
        Some(err) => println!("Recorded enrichment failure for day {day}: {err}"),
        None => println!("Enrichment attached to day {day}"),
    }
    Ok(())
}

/// Rewrite every stored schedule that still has older-shaped tasks.
pub fn cmd_migrate<S: Repository + ?Sized>(store: &mut S) -> Result<()> {
    let active = store.get_active_id()?;
    let mut migrated = 0;
    for schedule in store.list_all()? {
        if needs_migration(&schedule) {
            store.save(&migrate_schedule(&schedule))?;
            migrated += 1;
        }
    }
    // Saving marks a schedule active; put the pointer back.
    store.set_active_id(active.as_deref())?;
    info!(migrated, "migration finished");
    println!("Migrated {migrated} schedule(s).");
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Many(Vec<Schedule>),
    One(Box<Schedule>),
}

/// Import schedules from a JSON export. Schedules already stored under the same
/// id are replaced and moved, so the file's order wins: its first schedule ends
/// up first in the list and active.
pub fn cmd_import<S: Repository + ?Sized>(store: &mut S, input: &Path) -> Result<()> {
    let raw = fs::read_to_string(input)?;
    let schedules = match serde_json::from_str::<ImportFile>(&raw)? {
        ImportFile::Many(list) => list,
        ImportFile::One(one) => vec![*one],
    };
    let existing = store.list_all()?;
    let mut replaced = 0;
    for schedule in schedules.iter().rev() {
        if existing.iter().any(|s| s.id == schedule.id) {
            store.delete(&schedule.id)?;
            replaced += 1;
        }
        store.save(&migrate_schedule(schedule))?;
    }
    println!(
        "Imported {} schedule(s) ({} replaced existing).",
        schedules.len(),
        replaced
    );
    Ok(())
}

/// Print the streak record.
pub fn cmd_streak<S: StreakStore + ?Sized>(store: &S) -> Result<()> {
    let record = store.load_streak()?;
    match record.last_completion_date {
        Some(last) => println!("Streak: {} day(s), last completion {last}", record.streak_count),
        None => println!("Streak: {} day(s), no completions yet", record.streak_count),
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "study", &mut std::io::stdout());
}
