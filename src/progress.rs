//! Completion ratios for a day and for a whole schedule.

use crate::schedule::{Schedule, StudyDay};

/// Percentage of completed tasks across the schedule, rounded to the nearest
/// integer. A schedule with no tasks is at 0.
pub fn calculate_progress(schedule: &Schedule) -> u8 {
    let (completed, total) = schedule
        .days
        .iter()
        .map(calculate_day_progress)
        .fold((0, 0), |(c, t), (dc, dt)| (c + dc, t + dt));
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u8
}

/// `(completed, total)` task counts for one day.
pub fn calculate_day_progress(day: &StudyDay) -> (usize, usize) {
    let completed = day.tasks.iter().filter(|t| t.completed).count();
    (completed, day.tasks.len())
}
