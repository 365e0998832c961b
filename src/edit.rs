//! Small copy-on-write edits to a single day: completion, notes, time of day
//! and enrichment. Unknown ids leave the schedule unchanged.

use chrono::NaiveTime;
use tracing::debug;

use crate::enrich::{EnrichedContent, EnrichmentOutcome};
use crate::error::{PlannerError, Result};
use crate::schedule::Schedule;

/// Flip a task between done and not done.
pub fn toggle_task(schedule: &Schedule, day_id: &str, task_id: &str) -> Schedule {
    let mut out = schedule.clone();
    match out.locate_task(day_id, task_id) {
        Some(pos) => {
            let task = &mut out.days[pos.day].tasks[pos.task];
            task.completed = !task.completed;
        }
        None => debug!(day_id, task_id, "toggle skipped: task not found"),
    }
    out
}

/// Set a day's notes. Blank text clears them.
pub fn set_notes(schedule: &Schedule, day_id: &str, notes: &str) -> Schedule {
    let mut out = schedule.clone();
    if let Some(idx) = out.locate_day(day_id) {
        out.days[idx].notes = Some(notes.to_string()).filter(|n| !n.trim().is_empty());
    }
    out
}

/// Set or clear the time of day a study day is planned for.
pub fn set_scheduled_time(schedule: &Schedule, day_id: &str, time: Option<&str>) -> Schedule {
    let mut out = schedule.clone();
    if let Some(idx) = out.locate_day(day_id) {
        out.days[idx].scheduled_time = time.map(str::to_string);
    }
    out
}

/// Normalise "H:MM"/"HH:MM" to "HH:MM", rejecting anything that is not a
/// valid time of day.
pub fn parse_scheduled_time(s: &str) -> Result<String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| PlannerError::InvalidTime(s.to_string()))
}

/// Store an enrichment result on a day. Errors are stored too, as content with
/// only its `error` field set.
pub fn attach_enrichment(schedule: &Schedule, day_id: &str, outcome: EnrichmentOutcome) -> Schedule {
    let mut out = schedule.clone();
    if let Some(idx) = out.locate_day(day_id) {
        let content = outcome.unwrap_or_else(|e| EnrichedContent::failed(e));
        out.days[idx].enriched_content = Some(content);
    }
    out
}
