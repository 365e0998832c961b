//! Enumerations used to configure a generated schedule.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Learner level. Selects which template set the generator cycles through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[serde(alias = "Beginner")]
    Beginner,
    #[serde(alias = "Intermediate")]
    Intermediate,
    #[serde(alias = "Advanced")]
    Advanced,
}

/// What the learner is studying for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    #[serde(alias = "Exam")]
    Exam,
    #[serde(alias = "Skill")]
    Skill,
    #[serde(alias = "Review")]
    Review,
}

/// Format a level for display.
pub fn format_level(l: Level) -> &'static str {
    match l {
        Level::Beginner => "Beginner",
        Level::Intermediate => "Intermediate",
        Level::Advanced => "Advanced",
    }
}

/// Format a goal for display.
pub fn format_goal(g: Goal) -> &'static str {
    match g {
        Goal::Exam => "Exam",
        Goal::Skill => "Skill",
        Goal::Review => "Review",
    }
}
