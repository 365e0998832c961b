//! Persistence for schedules, the active schedule pointer and the streak.
//!
//! `Repository` is the storage capability the command layer works against.
//! `JsonStore` keeps everything as JSON documents in a data directory;
//! `MemoryStore` keeps it in memory. Both share the same list semantics through
//! `StoreFile`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::schedule::Schedule;
use crate::streak::{StreakRecord, StreakStore};

pub const SCHEDULES_FILE: &str = "schedules.json";
pub const STREAK_FILE: &str = "streak.json";

/// Storage for schedules and the id of the one currently in use.
pub trait Repository {
    /// All schedules, most recently created first.
    fn list_all(&self) -> Result<Vec<Schedule>>;

    /// Replace the schedule with the same id, or add it at the front. The saved
    /// schedule becomes the active one.
    fn save(&mut self, schedule: &Schedule) -> Result<()>;

    /// Remove a schedule. If it was active, the first remaining one (if any)
    /// becomes active.
    fn delete(&mut self, id: &str) -> Result<()>;

    fn get_active_id(&self) -> Result<Option<String>>;

    fn set_active_id(&mut self, id: Option<&str>) -> Result<()>;

    /// The schedule with `id`, else the active one, else the first stored.
    fn load(&self, id: Option<&str>) -> Result<Option<Schedule>> {
        let mut schedules = self.list_all()?;
        if schedules.is_empty() {
            return Ok(None);
        }
        let target = match id {
            Some(id) => Some(id.to_string()),
            None => self.get_active_id()?,
        };
        if let Some(target) = target {
            if let Some(i) = schedules.iter().position(|s| s.id == target) {
                return Ok(Some(schedules.swap_remove(i)));
            }
        }
        Ok(Some(schedules.swap_remove(0)))
    }
}

/// On-disk shape of the schedule document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreFile {
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_id: Option<String>,
}

impl StoreFile {
    fn upsert(&mut self, schedule: &Schedule) {
        match self.schedules.iter_mut().find(|s| s.id == schedule.id) {
            Some(existing) => *existing = schedule.clone(),
            None => self.schedules.insert(0, schedule.clone()),
        }
        self.active_id = Some(schedule.id.clone());
    }

    fn remove(&mut self, id: &str) {
        self.schedules.retain(|s| s.id != id);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.schedules.first().map(|s| s.id.clone());
        }
    }
}

/// JSON documents in a data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(JsonStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn schedules_path(&self) -> PathBuf {
        self.dir.join(SCHEDULES_FILE)
    }

    fn streak_path(&self) -> PathBuf {
        self.dir.join(STREAK_FILE)
    }

    fn read_store(&self) -> Result<StoreFile> {
        read_json(&self.schedules_path())
    }

    fn write_store(&self, store: &StoreFile) -> Result<()> {
        write_json(&self.schedules_path(), store)
    }
}

/// Read a JSON document, yielding the default value if the file is absent.
fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!(path = %path.display(), "no file yet, using defaults");
        return Ok(T::default());
    }
    let buf = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&buf)?)
}

/// Write a JSON document atomically (temp file + rename).
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_string_pretty(value)?;
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.sync_all()?;
    fs::rename(tmp, path)?;
    Ok(())
}

impl Repository for JsonStore {
    fn list_all(&self) -> Result<Vec<Schedule>> {
        Ok(self.read_store()?.schedules)
    }

    fn save(&mut self, schedule: &Schedule) -> Result<()> {
        let mut store = self.read_store()?;
        store.upsert(schedule);
        self.write_store(&store)?;
        debug!(schedule = %schedule.id, "saved schedule");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let mut store = self.read_store()?;
        store.remove(id);
        self.write_store(&store)?;
        info!(schedule = id, "deleted schedule");
        Ok(())
    }

    fn get_active_id(&self) -> Result<Option<String>> {
        Ok(self.read_store()?.active_id)
    }

    fn set_active_id(&mut self, id: Option<&str>) -> Result<()> {
        let mut store = self.read_store()?;
        store.active_id = id.map(str::to_string);
        self.write_store(&store)
    }
}

impl StreakStore for JsonStore {
    fn load_streak(&self) -> Result<StreakRecord> {
        read_json(&self.streak_path())
    }

    fn save_streak(&mut self, record: &StreakRecord) -> Result<()> {
        write_json(&self.streak_path(), record)
    }
}

/// Store that lives only as long as the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    store: StoreFile,
    streak: StreakRecord,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryStore {
    fn list_all(&self) -> Result<Vec<Schedule>> {
        Ok(self.store.schedules.clone())
    }

    fn save(&mut self, schedule: &Schedule) -> Result<()> {
        self.store.upsert(schedule);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.store.remove(id);
        Ok(())
    }

    fn get_active_id(&self) -> Result<Option<String>> {
        Ok(self.store.active_id.clone())
    }

    fn set_active_id(&mut self, id: Option<&str>) -> Result<()> {
        self.store.active_id = id.map(str::to_string);
        Ok(())
    }
}

impl StreakStore for MemoryStore {
    fn load_streak(&self) -> Result<StreakRecord> {
        Ok(self.streak.clone())
    }

    fn save_streak(&mut self, record: &StreakRecord) -> Result<()> {
        self.streak = record.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Goal, Level};
    use crate::generator::generate_schedule_from;
    use crate::schedule::ScheduleConfig;
    use chrono::NaiveDate;

    fn schedule(topic: &str) -> Schedule {
        let config = ScheduleConfig::new(topic, 1.0, 2, Level::Beginner, Goal::Skill, false);
        generate_schedule_from(&config, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
    }

    fn exercise(repo: &mut dyn Repository) {
        assert!(repo.load(None).unwrap().is_none());

        let a = schedule("A");
        let b = schedule("B");
        repo.save(&a).unwrap();
        repo.save(&b).unwrap();
        let ids: Vec<String> = repo.list_all().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, [b.id.clone(), a.id.clone()]);
        assert_eq!(repo.get_active_id().unwrap().as_deref(), Some(b.id.as_str()));

        // Saving an existing schedule replaces it in place and activates it.
        let mut a2 = a.clone();
        a2.days[0].tasks[0].completed = true;
        repo.save(&a2).unwrap();
        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], a2);
        assert_eq!(repo.load(None).unwrap().unwrap(), a2);
        assert_eq!(repo.load(Some(&b.id)).unwrap().unwrap().id, b.id);
        // Unknown id falls back to the active schedule.
        assert_eq!(repo.load(Some("missing")).unwrap().unwrap().id, a.id);

        // Deleting the active schedule activates the first remaining one.
        repo.delete(&a.id).unwrap();
        assert_eq!(repo.get_active_id().unwrap().as_deref(), Some(b.id.as_str()));
        repo.delete(&b.id).unwrap();
        assert_eq!(repo.get_active_id().unwrap(), None);
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_semantics() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn test_json_store_semantics() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        exercise(&mut store);
        assert!(dir.path().join(SCHEDULES_FILE).exists());
        assert!(!dir.path().join("schedules.json.tmp").exists());
    }

    #[test]
    fn test_json_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let s = schedule("Persist");
        {
            let mut store = JsonStore::open(dir.path()).unwrap();
            store.save(&s).unwrap();
            store
                .save_streak(&StreakRecord {
                    streak_count: 3,
                    last_completion_date: NaiveDate::from_ymd_opt(2025, 8, 2),
                })
                .unwrap();
        }
        let store = JsonStore::open(dir.path()).unwrap();
        assert_eq!(store.load(None).unwrap().unwrap(), s);
        assert_eq!(store.load_streak().unwrap().streak_count, 3);
    }

    #[test]
    fn test_json_store_reads_older_shape() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{
            "schedules": [{
                "id": "schedule-1",
                "config": {
                    "topic": "React", "hoursPerDay": 2, "totalDays": 1,
                    "level": "beginner", "goal": "skill", "usePomodoro": false,
                    "createdAt": "2025-08-01T10:00:00.000Z"
                },
                "days": [{
                    "id": "day-1", "dayNumber": 1, "date": "2025-08-01T12:00:00.000Z",
                    "title": "Introdução a React", "duration": 2,
                    "tasks": [{"id": "task-1", "title": "Ler", "completed": true}]
                }]
            }]
        }"#;
        fs::write(dir.path().join(SCHEDULES_FILE), json).unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let s = store.load(None).unwrap().unwrap();
        assert_eq!(s.id, "schedule-1");
        assert_eq!(s.days[0].date, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert!(s.days[0].tasks[0].completed);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SCHEDULES_FILE), "{not json").unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        assert!(store.list_all().is_err());
    }
}
