//! Locating "today" inside a schedule.
//!
//! Today is the day whose calendar date matches the current local date. When
//! the schedule does not cover today (it started in the future or has already
//! ended) the first day with unfinished work stands in for it.

use chrono::{Local, NaiveDate};

use crate::schedule::{Schedule, StudyDay};
use crate::task::Task;

/// Index of today's day using the local calendar date.
pub fn get_today_index(schedule: &Schedule) -> usize {
    today_index_on(schedule, Local::now().date_naive())
}

/// Index of the day dated `today`, else the first day with an incomplete
/// task, else 0.
///
/// Callers must check for a schedule with zero days before indexing.
pub fn today_index_on(schedule: &Schedule, today: NaiveDate) -> usize {
    if let Some(i) = schedule.days.iter().position(|d| d.date == today) {
        return i;
    }
    schedule
        .days
        .iter()
        .position(|d| d.tasks.iter().any(|t| !t.completed))
        .unwrap_or(0)
}

/// Today's day, or `None` for a schedule with no days.
pub fn get_today_day(schedule: &Schedule) -> Option<&StudyDay> {
    today_day_on(schedule, Local::now().date_naive())
}

pub fn today_day_on(schedule: &Schedule, today: NaiveDate) -> Option<&StudyDay> {
    schedule.days.get(today_index_on(schedule, today))
}

/// Up to three incomplete tasks, shortest first. Tasks without a duration
/// count as 30 minutes and ties keep their original order.
pub fn get_top3_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut pending: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    pending.sort_by_key(|t| t.duration_or_default());
    pending.truncate(3);
    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Goal, Level};
    use crate::generator::generate_schedule_from;
    use crate::schedule::ScheduleConfig;
    use chrono::Duration;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn sample(days: u32) -> Schedule {
        let config = ScheduleConfig::new("Física", 2.0, days, Level::Beginner, Goal::Exam, false);
        generate_schedule_from(&config, start())
    }

    fn task(title: &str, duration: Option<u32>, completed: bool) -> Task {
        let mut t = Task::new(title);
        t.duration_min = duration;
        t.completed = completed;
        t
    }

    #[test]
    fn test_matches_calendar_date() {
        let s = sample(5);
        assert_eq!(today_index_on(&s, start()), 0);
        assert_eq!(today_index_on(&s, start() + Duration::days(3)), 3);
        assert_eq!(today_day_on(&s, start() + Duration::days(4)).unwrap().day_number, 5);
    }

    #[test]
    fn test_falls_back_to_first_incomplete_day() {
        let mut s = sample(4);
        for day in s.days.iter_mut().take(2) {
            for t in day.tasks.iter_mut() {
                t.completed = true;
            }
        }
        let after_end = start() + Duration::days(30);
        assert_eq!(today_index_on(&s, after_end), 2);
        let before_start = start() - Duration::days(1);
        assert_eq!(today_index_on(&s, before_start), 2);
    }

    #[test]
    fn test_falls_back_to_zero_when_everything_done() {
        let mut s = sample(3);
        for day in s.days.iter_mut() {
            for t in day.tasks.iter_mut() {
                t.completed = true;
            }
        }
        assert_eq!(today_index_on(&s, start() + Duration::days(10)), 0);
    }

    #[test]
    fn test_no_days() {
        let mut s = sample(1);
        s.days.clear();
        assert_eq!(today_index_on(&s, start()), 0);
        assert!(today_day_on(&s, start()).is_none());
    }

    #[test]
    fn test_top3_shortest_incomplete_first() {
        let tasks = vec![
            task("a", Some(45), false),
            task("b", None, false),
            task("c", Some(10), true),
            task("d", Some(15), false),
            task("e", Some(30), false),
            task("f", Some(5), false),
        ];
        let top: Vec<&str> = get_top3_tasks(&tasks).iter().map(|t| t.title.as_str()).collect();
        // b and e both count as 30 minutes; b comes first in the list.
        assert_eq!(top, ["f", "d", "b"]);
    }

    #[test]
    fn test_top3_with_fewer_candidates() {
        let tasks = vec![task("a", Some(20), true), task("b", Some(20), false)];
        let top = get_top3_tasks(&tasks);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].title, "b");
        assert!(get_top3_tasks(&[]).is_empty());
    }
}
