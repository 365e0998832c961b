//! Terminal output for schedules, days and tasks.

use chrono::NaiveDate;
use serde_json::Value;

use crate::fields::{format_goal, format_level};
use crate::progress::{calculate_day_progress, calculate_progress};
use crate::schedule::{Schedule, StudyDay};
use crate::task::Task;

/// Format a date relative to today ("today", "tomorrow", "in 3d", "2d ago").
pub fn format_date_relative(date: NaiveDate, today: NaiveDate) -> String {
    let delta = (date - today).num_days();
    match delta {
        0 => "today".into(),
        1 => "tomorrow".into(),
        -1 => "yesterday".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d ago", -d),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Fixed-width bar such as `[######----]`.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn format_minutes(minutes: Option<u32>) -> String {
    minutes.map(|m| format!("{m}m")).unwrap_or_else(|| "-".into())
}

/// One line for a task: `[x] 2. Title (30m, spent 10m)`.
pub fn format_task_line(number: usize, task: &Task) -> String {
    let check = if task.completed { "x" } else { " " };
    let mut meta = format_minutes(task.duration_min);
    if let Some(spent) = task.time_spent_min {
        meta.push_str(&format!(", spent {spent}m"));
    }
    format!("[{check}] {number}. {} ({meta})", task.title)
}

/// One line for a suggested task, built from whichever fields it carries.
pub fn format_suggested_task(task: &Value) -> String {
    let Some(fields) = task.as_object() else {
        return match task {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    };
    let text = |key: &str| fields.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());

    let mut line = text("title").unwrap_or("(untitled)").to_string();
    if let Some(minutes) = fields.get("durationMin").and_then(Value::as_f64) {
        line.push_str(&format!(" ({minutes}m)"));
    }
    if let Some(description) = text("description") {
        line.push_str(&format!(": {description}"));
    }
    line
}

/// Table of stored schedules.
pub fn print_schedule_list(schedules: &[Schedule], active_id: Option<&str>) {
    println!(
        "{:<1} {:<8} {:<24} {:<12} {:<6} {:<8} {}",
        "", "ID", "Topic", "Level", "Days", "Goal", "Progress"
    );
    for s in schedules {
        let marker = if active_id == Some(s.id.as_str()) { "*" } else { " " };
        let progress = calculate_progress(s);
        println!(
            "{:<1} {:<8} {:<24} {:<12} {:<6} {:<8} {} {}%",
            marker,
            truncate(&s.id, 8),
            truncate(&s.config.topic, 24),
            format_level(s.config.level),
            s.days.len(),
            format_goal(s.config.goal),
            progress_bar(progress, 10),
            progress
        );
    }
}

/// Overview of every day of a schedule, marking today.
pub fn print_days(schedule: &Schedule, today_index: usize, today: NaiveDate) {
    let progress = calculate_progress(schedule);
    println!(
        "{} ({}, {}, {}h/day) {} {}%",
        schedule.config.topic,
        format_level(schedule.config.level),
        format_goal(schedule.config.goal),
        schedule.config.hours_per_day,
        progress_bar(progress, 20),
        progress
    );
    println!("{:<2} {:<4} {:<11} {:<10} {:<6} {}", "", "Day", "Date", "When", "Done", "Title");
    for (i, day) in schedule.days.iter().enumerate() {
        let marker = if i == today_index { ">" } else { " " };
        let (completed, total) = calculate_day_progress(day);
        println!(
            "{:<2} {:<4} {:<11} {:<10} {:<6} {}",
            marker,
            day.day_number,
            day.date.to_string(),
            format_date_relative(day.date, today),
            format!("{completed}/{total}"),
            day.title
        );
    }
}

/// Everything known about one day.
pub fn print_day_detail(day: &StudyDay, today: NaiveDate) {
    let (completed, total) = calculate_day_progress(day);
    println!("Day {}: {}", day.day_number, day.title);
    println!("Date:       {} ({})", day.date, format_date_relative(day.date, today));
    println!("Planned:    {}h", day.duration);
    println!("Time:       {}", day.scheduled_time.as_deref().unwrap_or("-"));
    println!("Progress:   {completed}/{total}");
    println!("Tasks:");
    for (i, task) in day.tasks.iter().enumerate() {
        println!("  {}", format_task_line(i + 1, task));
        if let Some(criteria) = task.acceptance_criteria.as_ref().filter(|c| !c.is_empty()) {
            for c in criteria {
                println!("        - {c}");
            }
        }
    }
    if let Some(notes) = &day.notes {
        println!("Notes:\n{notes}");
    }
    if let Some(content) = &day.enriched_content {
        if let Some(err) = &content.error {
            println!("Enrichment failed: {err}");
        }
        if let Some(summary) = &content.summary {
            println!("Summary:\n{summary}");
        }
        if let Some(topics) = content.key_topics.as_ref().filter(|t| !t.is_empty()) {
            println!("Key topics: {}", topics.join(", "));
        }
        if let Some(tips) = content.study_tips.as_ref().filter(|t| !t.is_empty()) {
            println!("Study tips:");
            for tip in tips {
                println!("  - {tip}");
            }
        }
        if let Some(tasks) = content.tasks.as_ref().filter(|t| !t.is_empty()) {
            println!("Suggested tasks:");
            for t in tasks {
                println!("  - {}", format_suggested_task(t));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_relative() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let d = |n: u32| NaiveDate::from_ymd_opt(2025, 1, n).unwrap();
        assert_eq!(format_date_relative(d(10), today), "today");
        assert_eq!(format_date_relative(d(11), today), "tomorrow");
        assert_eq!(format_date_relative(d(9), today), "yesterday");
        assert_eq!(format_date_relative(d(14), today), "in 4d");
        assert_eq!(format_date_relative(d(7), today), "3d ago");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Introdução a Rust", 8), "Introdu…");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[----------]");
        assert_eq!(progress_bar(50, 10), "[#####-----]");
        assert_eq!(progress_bar(100, 10), "[##########]");
        assert_eq!(progress_bar(200, 4), "[####]");
    }

    #[test]
    fn test_format_suggested_task() {
        let full = serde_json::json!({"title": "Praticar", "durationMin": 20, "description": "exercícios 1-5"});
        assert_eq!(format_suggested_task(&full), "Praticar (20m): exercícios 1-5");
        let partial = serde_json::json!({"durationMin": 12.5, "difficulty": "hard"});
        assert_eq!(format_suggested_task(&partial), "(untitled) (12.5m)");
        assert_eq!(format_suggested_task(&serde_json::json!("revisar")), "revisar");
    }

    #[test]
    fn test_task_line() {
        let mut t = Task::new("Revisar conceitos");
        assert_eq!(format_task_line(1, &t), "[ ] 1. Revisar conceitos (-)");
        t.completed = true;
        t.duration_min = Some(25);
        t.time_spent_min = Some(30);
        assert_eq!(format_task_line(3, &t), "[x] 3. Revisar conceitos (25m, spent 30m)");
    }
}
