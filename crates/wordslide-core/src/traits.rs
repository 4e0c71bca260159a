//! Core trait definitions for the experiment backend.
//!
//! Implemented by `wordslide-client` over HTTP and by its in-memory mock.

use async_trait::async_trait;

use crate::model::{ExperimentWords, RatingRecord};

/// Source of experiment words and sink for ratings.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Human-readable source name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch the seed word and associated words of an experiment.
    async fn fetch_experiment(&self, experiment_id: &str) -> anyhow::Result<ExperimentWords>;

    /// Store one rating for an experiment.
    async fn submit_rating(&self, experiment_id: &str, record: &RatingRecord)
        -> anyhow::Result<()>;
}
