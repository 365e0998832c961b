//! Optional supplementary content attached to a study day.
//!
//! Enrichment comes from an external source (typically a language model
//! service) and is stored verbatim. Nothing in the scheduler reads it back;
//! unknown fields survive a load/save cycle through `extra`.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::edit::attach_enrichment;
use crate::fields::Level;
use crate::schedule::Schedule;

/// Enrichment payload, or the error the source reported instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_tips: Option<Vec<String>>,
    /// Suggested tasks, kept exactly as the source sent them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnrichedContent {
    /// Content that only records a failure.
    pub fn failed(message: impl Into<String>) -> Self {
        EnrichedContent {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of asking an `Enricher` for content. Both arms are stored.
pub type EnrichmentOutcome = std::result::Result<EnrichedContent, String>;

/// Source of enrichment for a `(topic, subtopic, level)` triple.
pub trait Enricher {
    fn enrich(&self, topic: &str, subtopic: &str, level: Level) -> EnrichmentOutcome;
}

/// Reads a prepared payload from a JSON file.
pub struct FileEnricher {
    pub path: PathBuf,
}

impl FileEnricher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileEnricher { path: path.into() }
    }
}

impl Enricher for FileEnricher {
    fn enrich(&self, topic: &str, subtopic: &str, _level: Level) -> EnrichmentOutcome {
        debug!(path = %self.path.display(), topic, subtopic, "reading enrichment payload");
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| format!("failed to read {}: {e}", self.path.display()))?;
        serde_json::from_str(&raw).map_err(|e| format!("invalid enrichment payload: {e}"))
    }
}

/// Ask `enricher` about a day and store whatever comes back on that day.
///
/// The day's title is used as the subtopic. Unknown day ids leave the schedule
/// unchanged and the enricher is not consulted.
pub fn enrich_day(schedule: &Schedule, day_id: &str, enricher: &dyn Enricher) -> Schedule {
    let Some(idx) = schedule.locate_day(day_id) else {
        return schedule.clone();
    };
    let day = &schedule.days[idx];
    let outcome = enricher.enrich(&schedule.config.topic, &day.title, schedule.config.level);
    if let Err(e) = &outcome {
        warn!(day = day.day_number, error = %e, "enrichment failed");
    }
    attach_enrichment(schedule, day_id, outcome)
}
