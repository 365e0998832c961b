//! Moving unfinished work around a schedule.
//!
//! Every operation takes the schedule by reference and returns a new one.
//! Lookups that fail (unknown day or task, postponing from the last day, an
//! empty backlog) return an unchanged copy instead of an error, so callers can
//! apply edits optimistically.
//!
//! Tasks that move or split receive fresh ids; day numbers and dates never
//! change.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::schedule::Schedule;
use crate::task::{new_id, Task};
use crate::today::today_index_on;

/// Shortest duration the second half of a split may have.
pub const MIN_SPLIT_PART_MIN: u32 = 5;

/// Move a task to the front of the following day under a new id.
pub fn postpone_task(schedule: &Schedule, day_id: &str, task_id: &str) -> Schedule {
    let Some(pos) = schedule.locate_task(day_id, task_id) else {
        debug!(day_id, task_id, "postpone skipped: task not found");
        return schedule.clone();
    };
    if pos.day + 1 >= schedule.days.len() {
        debug!(day_id, task_id, "postpone skipped: last day of the schedule");
        return schedule.clone();
    }

    let mut out = schedule.clone();
    let task = out.days[pos.day].tasks.remove(pos.task);
    let moved = Task { id: new_id(), ..task };
    info!(
        from = out.days[pos.day].day_number,
        to = out.days[pos.day + 1].day_number,
        task = %moved.title,
        "postponed task"
    );
    out.days[pos.day + 1].tasks.insert(0, moved);
    out
}

/// Replace a task with two incomplete halves.
///
/// The first part lasts `first_part_minutes`; the second gets the remainder of
/// the original duration (30 when unset) but never less than 5 minutes.
/// `first_part_minutes` itself is taken as given.
pub fn split_task(
    schedule: &Schedule,
    day_id: &str,
    task_id: &str,
    first_part_minutes: u32,
) -> Schedule {
    let Some(pos) = schedule.locate_task(day_id, task_id) else {
        debug!(day_id, task_id, "split skipped: task not found");
        return schedule.clone();
    };

    let original = &schedule.days[pos.day].tasks[pos.task];
    let total = original.duration_or_default();
    let second_part_minutes = total.saturating_sub(first_part_minutes).max(MIN_SPLIT_PART_MIN);

    let first = Task {
        id: new_id(),
        title: format!("{} (parte 1)", original.title),
        completed: false,
        duration_min: Some(first_part_minutes),
        ..original.clone()
    };
    let second = Task {
        id: new_id(),
        title: format!("{} (parte 2)", original.title),
        completed: false,
        duration_min: Some(second_part_minutes),
        ..original.clone()
    };
    info!(
        task = %original.title,
        total,
        first = first_part_minutes,
        second = second_part_minutes,
        "split task"
    );

    let mut out = schedule.clone();
    out.days[pos.day]
        .tasks
        .splice(pos.task..=pos.task, [first, second]);
    out
}

/// Number of incomplete tasks on the days before `today_index`; what a replan
/// would move.
pub fn pending_before(schedule: &Schedule, today_index: usize) -> usize {
    schedule
        .days
        .iter()
        .take(today_index)
        .flat_map(|d| d.tasks.iter())
        .filter(|t| !t.completed)
        .count()
}

/// Pull every incomplete task from days before today to the front of today,
/// using the local calendar date.
pub fn replan_from_today(schedule: &Schedule) -> Schedule {
    replan_from(schedule, Local::now().date_naive())
}

/// Pull every incomplete task from days before `today`'s index to the front of
/// that day.
///
/// The backlog keeps its order across and within days. Completed tasks stay
/// where they are. With nothing to move the schedule comes back unchanged and
/// no ids are reissued.
pub fn replan_from(schedule: &Schedule, today: NaiveDate) -> Schedule {
    if schedule.days.is_empty() {
        return schedule.clone();
    }
    let t = today_index_on(schedule, today);

    let backlog: Vec<Task> = schedule.days[..t]
        .iter()
        .flat_map(|d| d.tasks.iter())
        .filter(|task| !task.completed)
        .map(Task::with_fresh_id)
        .collect();
    if backlog.is_empty() {
        debug!(today = t + 1, "replan skipped: no backlog");
        return schedule.clone();
    }
    info!(today = t + 1, moved = backlog.len(), "replanned backlog");

    let mut out = schedule.clone();
    for day in out.days[..t].iter_mut() {
        day.tasks.retain(|task| task.completed);
    }
    out.days[t].tasks.splice(0..0, backlog);
    out
}

/// Record how many minutes were actually spent on a task.
pub fn update_task_time_spent(
    schedule: &Schedule,
    day_id: &str,
    task_id: &str,
    minutes: u32,
) -> Schedule {
    let mut out = schedule.clone();
    match out.locate_task(day_id, task_id) {
        Some(pos) => out.days[pos.day].tasks[pos.task].time_spent_min = Some(minutes),
        None => debug!(day_id, task_id, "time spent skipped: task not found"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Goal, Level};
    use crate::generator::generate_schedule_from;
    use crate::schedule::ScheduleConfig;
    use chrono::Duration;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn sample(days: u32) -> Schedule {
        let config = ScheduleConfig::new("Química", 2.0, days, Level::Beginner, Goal::Exam, false);
        generate_schedule_from(&config, start())
    }

    fn ids(schedule: &Schedule, day: usize) -> Vec<String> {
        schedule.days[day].tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_postpone_moves_to_front_of_next_day() {
        let s = sample(3);
        let day1 = s.days[0].id.clone();
        let task = s.days[0].tasks[1].clone();

        let out = postpone_task(&s, &day1, &task.id);
        assert_eq!(out.days[0].tasks.len(), 2);
        assert_eq!(out.days[1].tasks.len(), 4);
        let moved = &out.days[1].tasks[0];
        assert_ne!(moved.id, task.id);
        assert_eq!(moved.title, task.title);
        assert_eq!(moved.duration_min, task.duration_min);
        assert!(out.days[0].tasks.iter().all(|t| t.id != task.id));
        // Input untouched.
        assert_eq!(s.days[0].tasks.len(), 3);
    }

    #[test]
    fn test_postpone_from_last_day_is_noop() {
        let s = sample(3);
        let last = s.days[2].id.clone();
        let task = s.days[2].tasks[0].id.clone();
        assert_eq!(postpone_task(&s, &last, &task), s);
    }

    #[test]
    fn test_postpone_unknown_ids_is_noop() {
        let s = sample(2);
        let day1 = s.days[0].id.clone();
        let foreign_task = s.days[1].tasks[0].id.clone();
        assert_eq!(postpone_task(&s, "nope", &foreign_task), s);
        assert_eq!(postpone_task(&s, &day1, "nope"), s);
        // A task that exists but on another day is not found on this one.
        assert_eq!(postpone_task(&s, &day1, &foreign_task), s);
    }

    #[test]
    fn test_split_preserves_total_within_bounds() {
        let mut s = sample(1);
        s.days[0].tasks[1].duration_min = Some(50);
        s.days[0].tasks[1].acceptance_criteria = Some(vec!["exercícios feitos".into()]);
        s.days[0].tasks[1].completed = true;
        let day = s.days[0].id.clone();
        let original = s.days[0].tasks[1].clone();

        for first in 5..=45 {
            let out = split_task(&s, &day, &original.id, first);
            let tasks = &out.days[0].tasks;
            assert_eq!(tasks.len(), 4);
            let (p1, p2) = (&tasks[1], &tasks[2]);
            assert_eq!(p1.duration_min.unwrap() + p2.duration_min.unwrap(), 50);
            assert_eq!(p1.title, format!("{} (parte 1)", original.title));
            assert_eq!(p2.title, format!("{} (parte 2)", original.title));
            assert!(!p1.completed && !p2.completed);
            assert_ne!(p1.id, original.id);
            assert_ne!(p1.id, p2.id);
            assert_eq!(p2.acceptance_criteria, original.acceptance_criteria);
        }
    }

    #[test]
    fn test_split_keeps_neighbours_in_place() {
        let s = sample(1);
        let day = s.days[0].id.clone();
        let before = ids(&s, 0);
        let out = split_task(&s, &day, &before[1], 10);
        let after = ids(&out, 0);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[3], before[2]);
    }

    #[test]
    fn test_split_clamps_second_part_only() {
        let s = sample(1);
        let day = s.days[0].id.clone();
        let task = s.days[0].tasks[0].id.clone();

        // Unset duration counts as 30.
        let out = split_task(&s, &day, &task, 28);
        assert_eq!(out.days[0].tasks[0].duration_min, Some(28));
        assert_eq!(out.days[0].tasks[1].duration_min, Some(5));

        let out = split_task(&s, &day, &task, 90);
        assert_eq!(out.days[0].tasks[0].duration_min, Some(90));
        assert_eq!(out.days[0].tasks[1].duration_min, Some(5));

        let out = split_task(&s, &day, &task, 0);
        assert_eq!(out.days[0].tasks[0].duration_min, Some(0));
        assert_eq!(out.days[0].tasks[1].duration_min, Some(30));
    }

    #[test]
    fn test_split_unknown_is_noop() {
        let s = sample(1);
        let day = s.days[0].id.clone();
        assert_eq!(split_task(&s, &day, "nope", 10), s);
        assert_eq!(split_task(&s, "nope", &s.days[0].tasks[0].id, 10), s);
    }

    #[test]
    fn test_replan_moves_backlog_in_order() {
        let mut s = sample(4);
        s.days[0].tasks[0].completed = true;
        s.days[1].tasks[2].completed = true;
        let backlog_titles: Vec<String> = [(0, 1), (0, 2), (1, 0), (1, 1)]
            .iter()
            .map(|&(d, t)| s.days[d].tasks[t].title.clone())
            .collect();
        let old_ids: Vec<String> = [(0, 1), (0, 2), (1, 0), (1, 1)]
            .iter()
            .map(|&(d, t)| s.days[d].tasks[t].id.clone())
            .collect();
        let today_before = ids(&s, 2);

        let out = replan_from(&s, start() + Duration::days(2));

        assert_eq!(out.days[0].tasks.len(), 1);
        assert!(out.days[0].tasks[0].completed);
        assert_eq!(out.days[1].tasks.len(), 1);
        assert!(out.days[1].tasks[0].completed);

        let today = &out.days[2].tasks;
        assert_eq!(today.len(), 4 + 3);
        let moved: Vec<String> = today[..4].iter().map(|t| t.title.clone()).collect();
        assert_eq!(moved, backlog_titles);
        assert!(today[..4].iter().all(|t| !old_ids.contains(&t.id)));
        assert_eq!(ids(&out, 2)[4..], today_before[..]);
        assert_eq!(out.days[3], s.days[3]);
        assert_eq!(out.task_count(), s.task_count());
    }

    #[test]
    fn test_replan_twice_is_noop() {
        let s = sample(3);
        let today = start() + Duration::days(2);
        let once = replan_from(&s, today);
        assert_ne!(once, s);
        let twice = replan_from(&once, today);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_replan_without_backlog_is_noop() {
        let s = sample(3);
        assert_eq!(replan_from(&s, start()), s);

        let mut empty = s.clone();
        empty.days.clear();
        assert_eq!(replan_from(&empty, start()), empty);
    }

    #[test]
    fn test_replan_after_schedule_ends_targets_first_incomplete_day() {
        let s = sample(3);
        // Past the end, today falls back to day 1, which has nothing before it.
        assert_eq!(replan_from(&s, start() + Duration::days(20)), s);
    }

    #[test]
    fn test_pending_before_counts_backlog() {
        let mut s = sample(3);
        s.days[0].tasks[0].completed = true;
        assert_eq!(pending_before(&s, 0), 0);
        assert_eq!(pending_before(&s, 2), 5);
        assert_eq!(pending_before(&s, 10), 8);

        let later = start() + Duration::days(2);
        let replanned = replan_from(&s, later);
        assert_eq!(pending_before(&replanned, 2), 0);
    }

    #[test]
    fn test_update_time_spent() {
        let s = sample(2);
        let day = s.days[1].id.clone();
        let task = s.days[1].tasks[2].id.clone();
        let out = update_task_time_spent(&s, &day, &task, 42);
        assert_eq!(out.days[1].tasks[2].time_spent_min, Some(42));
        assert_eq!(s.days[1].tasks[2].time_spent_min, None);
        assert_eq!(update_task_time_spent(&s, &day, "nope", 42), s);
    }
}
