//! Mock word source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::model::{ExperimentWords, RatingRecord, Word};
use crate::traits::WordSource;

/// An in-memory word source for exercising sessions without a backend.
///
/// Unknown experiments fail with [`SourceError::NotFound`].
#[derive(Default)]
pub struct MockWordSource {
    experiments: HashMap<String, ExperimentWords>,
    /// Number of upcoming submissions that will fail.
    failing_submissions: AtomicU32,
    /// Artificial latency for each submission.
    submit_delay: Duration,
    /// Artificial latency for each fetch.
    fetch_delay: Duration,
    fetches_in_flight: AtomicUsize,
    max_fetches_in_flight: AtomicUsize,
    fetch_log: Mutex<Vec<String>>,
    ratings: Mutex<Vec<(String, RatingRecord)>>,
}

impl MockWordSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an experiment with its seed word and associated words.
    pub fn with_experiment(mut self, experiment_id: &str, seed_word: &str, words: &[&str]) -> Self {
        let words = words
            .iter()
            .enumerate()
            .map(|(i, w)| Word {
                id: (i + 1).to_string(),
                word: w.to_string(),
            })
            .collect();
        self.experiments.insert(
            experiment_id.to_string(),
            ExperimentWords {
                seed_word: seed_word.to_string(),
                words,
            },
        );
        self
    }

    /// Make the next `count` submissions fail.
    pub fn with_failing_submissions(self, count: u32) -> Self {
        self.failing_submissions.store(count, Ordering::Relaxed);
        self
    }

    /// Delay every submission by `delay`.
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Delay every fetch by `delay`.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Highest number of fetches that were running at the same time.
    pub fn max_fetches_in_flight(&self) -> usize {
        self.max_fetches_in_flight.load(Ordering::SeqCst)
    }

    /// Experiment ids in the order they were fetched.
    pub fn fetch_log(&self) -> Vec<String> {
        self.fetch_log.lock().unwrap().clone()
    }

    /// Accepted ratings, with the experiment they were posted to.
    pub fn ratings(&self) -> Vec<(String, RatingRecord)> {
        self.ratings.lock().unwrap().clone()
    }
}

#[async_trait]
impl WordSource for MockWordSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_experiment(&self, experiment_id: &str) -> anyhow::Result<ExperimentWords> {
        self.fetch_log
            .lock()
            .unwrap()
            .push(experiment_id.to_string());
        let running = self.fetches_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_fetches_in_flight.fetch_max(running, Ordering::SeqCst);
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        self.fetches_in_flight.fetch_sub(1, Ordering::SeqCst);
        self.experiments
            .get(experiment_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(experiment_id.to_string()).into())
    }

    async fn submit_rating(
        &self,
        experiment_id: &str,
        record: &RatingRecord,
    ) -> anyhow::Result<()> {
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        let failing = self
            .failing_submissions
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SourceError::Api {
                status: 500,
                message: "rating rejected".into(),
            }
            .into());
        }
        self.ratings
            .lock()
            .unwrap()
            .push((experiment_id.to_string(), record.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SliderValues;

    #[tokio::test]
    async fn serves_registered_experiments() {
        let source = MockWordSource::new().with_experiment("e1", "tree", &["forest", "leaf"]);
        let words = source.fetch_experiment("e1").await.unwrap();
        assert_eq!(words.word_list().len(), 3);

        let err = source.fetch_experiment("e2").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert_eq!(source.fetch_log(), vec!["e1", "e2"]);
        assert_eq!(source.max_fetches_in_flight(), 1);
    }

    #[tokio::test]
    async fn failing_submissions_then_success() {
        let source = MockWordSource::new().with_failing_submissions(1);
        let record = RatingRecord::new("", "forest", &SliderValues::default());
        assert!(source.submit_rating("e1", &record).await.is_err());
        assert!(source.submit_rating("e1", &record).await.is_ok());
        assert_eq!(source.ratings().len(), 1);
    }
}
