//! Onset timeline of a reveal run, with JSON persistence.
//!
//! Each display change is stamped with wall-clock time and the offset from the
//! start key so word onsets can be aligned with scanner acquisition.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sequencer::Sequencer;

/// What caused a display change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnsetKind {
    /// The start key was pressed.
    Start,
    /// The words of the active experiment arrived after the start key.
    WordsLoaded,
    /// A timer tick revealed the next word.
    Advance,
    /// The participant moved on to the next seed word.
    NextSeedWord,
}

/// A single display change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Onset {
    pub at: DateTime<Utc>,
    /// Milliseconds since the start key.
    pub offset_ms: u64,
    pub kind: OnsetKind,
    pub experiment_id: String,
    pub word_index: usize,
    pub prev: Option<String>,
    pub curr: Option<String>,
    /// Whether navigation became available with this change.
    pub completed: bool,
}

/// All onsets of one reveal run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealTimeline {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub experiments: Vec<String>,
    pub interval_ms: u64,
    pub onsets: Vec<Onset>,
}

impl RevealTimeline {
    pub fn new(experiments: Vec<String>, interval: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            experiments,
            interval_ms: interval.as_millis() as u64,
            onsets: Vec::new(),
        }
    }

    /// Record the sequencer's current display.
    pub fn record(&mut self, kind: OnsetKind, sequencer: &Sequencer, offset: Duration) {
        let state = sequencer.snapshot();
        self.onsets.push(Onset {
            at: Utc::now(),
            offset_ms: offset.as_millis() as u64,
            kind,
            experiment_id: sequencer.active_experiment().unwrap_or_default().to_string(),
            word_index: state.word_index,
            prev: state.display_pair.prev,
            curr: state.display_pair.curr,
            completed: state.completed,
        });
    }

    /// Onsets that showed a word of `experiment_id`.
    pub fn onsets_for<'a>(&'a self, experiment_id: &'a str) -> impl Iterator<Item = &'a Onset> {
        self.onsets
            .iter()
            .filter(move |o| o.experiment_id == experiment_id && o.curr.is_some())
    }

    /// Save the timeline as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize timeline")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write timeline to {}", path.display()))?;
        Ok(())
    }

    /// Load a timeline from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read timeline from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse timeline JSON")
    }
}
