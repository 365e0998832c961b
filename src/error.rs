//! Error type shared by the repository and the command layer.
//!
//! The scheduling core itself never fails: unknown ids and empty backlogs are
//! no-ops. Errors only arise at the edges, when reading or writing the data
//! directory or when resolving what the user typed on the command line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No schedules yet. Create one with `study new <topic>`.")]
    NoSchedules,

    #[error("Schedule not found: {0}")]
    ScheduleNotFound(String),

    #[error("Day {0} not found")]
    DayNotFound(usize),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("'{reference}' matches {count} entries, use a longer prefix")]
    Ambiguous { reference: String, count: usize },

    #[error("First part must be between 5 and {max} minutes (task is {total} minutes)")]
    InvalidSplit { total: u32, max: i64 },

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Could not determine a data directory; pass --dir")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, PlannerError>;
