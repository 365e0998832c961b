//! Task data structure and related functionality.
//!
//! A `Task` is a single study activity owned by exactly one day of a schedule.
//! Older persisted tasks may lack `durationMin` and `acceptanceCriteria`; see
//! `migrate` for how those are filled in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Duration assumed for tasks that carry no explicit `duration_min`.
pub const DEFAULT_DURATION_MIN: u32 = 30;

/// Mint a fresh identifier for a schedule, day or task.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A single study activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

impl Task {
    /// Create an incomplete task with a fresh id and no optional metadata.
    pub fn new(title: impl Into<String>) -> Self {
        Task {
            id: new_id(),
            title: title.into(),
            completed: false,
            duration_min: None,
            acceptance_criteria: None,
            time_spent_min: None,
            resources: None,
        }
    }

    /// Planned duration in minutes, falling back to the default.
    pub fn duration_or_default(&self) -> u32 {
        self.duration_min.unwrap_or(DEFAULT_DURATION_MIN)
    }

    /// Copy of this task under a newly minted id.
    pub fn with_fresh_id(&self) -> Self {
        Task {
            id: new_id(),
            ..self.clone()
        }
    }
}
