//! Schedule, day and configuration types.
//!
//! A `Schedule` is an ordered sequence of `StudyDay`s generated from a
//! `ScheduleConfig`. Every edit produces a new `Schedule` value; see
//! `backlog` and `edit` for the operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enrich::EnrichedContent;
use crate::error::{PlannerError, Result};
use crate::fields::{Goal, Level};
use crate::task::Task;

pub const MIN_HOURS_PER_DAY: f64 = 0.5;
pub const MAX_HOURS_PER_DAY: f64 = 12.0;
pub const MIN_TOTAL_DAYS: u32 = 1;
pub const MAX_TOTAL_DAYS: u32 = 90;

/// Inputs a schedule is generated from. Never changed after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub topic: String,
    pub hours_per_day: f64,
    pub total_days: u32,
    pub level: Level,
    pub goal: Goal,
    #[serde(default)]
    pub use_pomodoro: bool,
    pub created_at: DateTime<Utc>,
}

impl ScheduleConfig {
    pub fn new(
        topic: impl Into<String>,
        hours_per_day: f64,
        total_days: u32,
        level: Level,
        goal: Goal,
        use_pomodoro: bool,
    ) -> Self {
        ScheduleConfig {
            topic: topic.into(),
            hours_per_day,
            total_days,
            level,
            goal,
            use_pomodoro,
            created_at: Utc::now(),
        }
    }

    /// Check the bounds a config must satisfy before it is generated from.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(PlannerError::InvalidConfig("topic cannot be empty".into()));
        }
        if !(MIN_HOURS_PER_DAY..=MAX_HOURS_PER_DAY).contains(&self.hours_per_day) {
            return Err(PlannerError::InvalidConfig(format!(
                "hours per day must be between {} and {}",
                MIN_HOURS_PER_DAY, MAX_HOURS_PER_DAY
            )));
        }
        if !(MIN_TOTAL_DAYS..=MAX_TOTAL_DAYS).contains(&self.total_days) {
            return Err(PlannerError::InvalidConfig(format!(
                "total days must be between {} and {}",
                MIN_TOTAL_DAYS, MAX_TOTAL_DAYS
            )));
        }
        Ok(())
    }
}

/// One day of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyDay {
    pub id: String,
    pub day_number: usize,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub title: String,
    /// Planned study hours.
    pub duration: f64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// "HH:MM".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enriched_content: Option<EnrichedContent>,
}

/// Position of a task inside a schedule: `days[day].tasks[task]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPos {
    pub day: usize,
    pub task: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub config: ScheduleConfig,
    #[serde(default)]
    pub days: Vec<StudyDay>,
}

impl Schedule {
    /// Index of the day with the given id.
    pub fn locate_day(&self, day_id: &str) -> Option<usize> {
        self.days.iter().position(|d| d.id == day_id)
    }

    /// Position of `task_id` within the day `day_id`.
    pub fn locate_task(&self, day_id: &str, task_id: &str) -> Option<TaskPos> {
        let day = self.locate_day(day_id)?;
        let task = self.days[day].tasks.iter().position(|t| t.id == task_id)?;
        Some(TaskPos { day, task })
    }

    /// Position of `task_id` anywhere in the schedule.
    pub fn find_task(&self, task_id: &str) -> Option<TaskPos> {
        self.days.iter().enumerate().find_map(|(day, d)| {
            d.tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|task| TaskPos { day, task })
        })
    }

    pub fn task(&self, pos: TaskPos) -> Option<&Task> {
        self.days.get(pos.day).and_then(|d| d.tasks.get(pos.task))
    }

    pub fn task_count(&self) -> usize {
        self.days.iter().map(|d| d.tasks.len()).sum()
    }
}

/// Serde adapter for calendar dates.
///
/// Writes `YYYY-MM-DD`. Reads either that or an RFC 3339 timestamp, which is
/// how older data stored dates; timestamps are reduced to the local date.
pub mod calendar_date {
    use chrono::{DateTime, Local, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, FORMAT).ok().or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Local).date_naive())
        })
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| de::Error::custom(format!("invalid date '{s}'")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(s) => super::parse(&s)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid date '{s}'"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hours: f64, days: u32) -> ScheduleConfig {
        ScheduleConfig::new("Rust", hours, days, Level::Beginner, Goal::Skill, false)
    }

    #[test]
    fn test_validate_bounds() {
        assert!(config(2.0, 7).validate().is_ok());
        assert!(config(0.5, 1).validate().is_ok());
        assert!(config(12.0, 90).validate().is_ok());
        assert!(config(0.4, 7).validate().is_err());
        assert!(config(12.5, 7).validate().is_err());
        assert!(config(f64::NAN, 7).validate().is_err());
        assert!(config(2.0, 0).validate().is_err());
        assert!(config(2.0, 91).validate().is_err());

        let mut blank = config(2.0, 7);
        blank.topic = "   ".into();
        assert!(matches!(blank.validate(), Err(PlannerError::InvalidConfig(_))));
    }

    #[test]
    fn test_calendar_date_accepts_both_shapes() {
        assert_eq!(
            calendar_date::parse("2025-03-04"),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
        // Midday UTC lands on the same calendar date in every real timezone offset.
        assert_eq!(
            calendar_date::parse("2025-03-04T12:00:00.000Z"),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
        assert_eq!(calendar_date::parse("yesterday"), None);
    }

    #[test]
    fn test_older_day_shape_round_trips() {
        let json = r#"{
            "id": "day-1",
            "dayNumber": 1,
            "date": "2025-03-04T12:00:00.000Z",
            "title": "Introdução a Rust",
            "duration": 2,
            "tasks": [{"id": "task-1", "title": "Ler", "completed": false}]
        }"#;
        let day: StudyDay = serde_json::from_str(json).unwrap();
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(day.tasks.len(), 1);

        let out = serde_json::to_value(&day).unwrap();
        assert_eq!(out["date"], "2025-03-04");
        assert_eq!(out["dayNumber"], 1);
        assert!(out.get("notes").is_none());
    }
}
