//! Upgrades tasks persisted before durations and acceptance criteria existed.

use crate::schedule::Schedule;
use crate::task::{Task, DEFAULT_DURATION_MIN};

/// Fill in a missing duration (30 minutes) and missing acceptance criteria
/// (none). Fields already present are kept as they are.
pub fn migrate_task(task: &Task) -> Task {
    Task {
        duration_min: Some(task.duration_min.unwrap_or(DEFAULT_DURATION_MIN)),
        acceptance_criteria: Some(task.acceptance_criteria.clone().unwrap_or_default()),
        ..task.clone()
    }
}

/// Apply `migrate_task` to every task of every day. Idempotent.
pub fn migrate_schedule(schedule: &Schedule) -> Schedule {
    let mut out = schedule.clone();
    for day in out.days.iter_mut() {
        for task in day.tasks.iter_mut() {
            *task = migrate_task(task);
        }
    }
    out
}

/// Whether `migrate_schedule` would change anything.
pub fn needs_migration(schedule: &Schedule) -> bool {
    schedule
        .days
        .iter()
        .flat_map(|d| d.tasks.iter())
        .any(|t| t.duration_min.is_none() || t.acceptance_criteria.is_none())
}
