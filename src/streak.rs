//! Day-completion streak.
//!
//! The streak counts consecutive calendar days on which at least one task was
//! completed. It lives outside any schedule and is persisted through a
//! `StreakStore`.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::schedule::calendar_date;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    #[serde(default)]
    pub streak_count: u32,
    #[serde(default, with = "calendar_date::option")]
    pub last_completion_date: Option<NaiveDate>,
}

/// What `StreakRecord::update_streak` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    /// Nothing to record, or today was already credited.
    Unchanged(u32),
    /// Completed yesterday too; the streak grew.
    Extended(u32),
    /// First completion, or the previous streak lapsed.
    Started(u32),
}

impl StreakUpdate {
    pub fn count(self) -> u32 {
        match self {
            StreakUpdate::Unchanged(n) | StreakUpdate::Extended(n) | StreakUpdate::Started(n) => n,
        }
    }

    /// Whether the record changed and must be written back.
    pub fn is_changed(self) -> bool {
        !matches!(self, StreakUpdate::Unchanged(_))
    }
}

/// Persistence for the process-wide streak record.
pub trait StreakStore {
    fn load_streak(&self) -> Result<StreakRecord>;
    fn save_streak(&mut self, record: &StreakRecord) -> Result<()>;
}

impl StreakRecord {
    /// Apply one day's outcome to the record.
    pub fn update_streak(&mut self, completed_today: bool, today: NaiveDate) -> StreakUpdate {
        if !completed_today {
            return StreakUpdate::Unchanged(self.streak_count);
        }
        let update = match self.last_completion_date {
            Some(last) if last == today => return StreakUpdate::Unchanged(self.streak_count),
            Some(last) if last + Duration::days(1) == today => {
                StreakUpdate::Extended(self.streak_count + 1)
            }
            _ => StreakUpdate::Started(1),
        };
        self.streak_count = update.count();
        self.last_completion_date = Some(today);
        update
    }
}

/// Read the stored record, apply today's outcome and write it back if it
/// changed. Returns the resulting streak count.
pub fn update_streak<S: StreakStore + ?Sized>(
    store: &mut S,
    completed_today: bool,
    today: NaiveDate,
) -> Result<u32> {
    let mut record = store.load_streak()?;
    let update = record.update_streak(completed_today, today);
    if update.is_changed() {
        store.save_streak(&record)?;
        info!(streak = update.count(), ?update, "streak updated");
    }
    Ok(update.count())
}
