//! Rating session state.
//!
//! Steps through an experiment's words on explicit submission. Each submission
//! produces one [`RatingRecord`]; the session only moves on once the record has
//! been accepted by the backend.

use crate::model::{RatingRecord, Slider, SliderValues, Word};

/// Result of finishing a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Moved to the next word; sliders were reset.
    Advanced,
    /// The last word was rated.
    Finished,
    /// The submission failed; position and sliders are unchanged.
    Held,
}

/// State of one rating screen.
#[derive(Debug, Clone)]
pub struct RatingSession {
    experiment_id: String,
    words: Vec<Word>,
    index: usize,
    prev_word: String,
    sliders: SliderValues,
    pending: bool,
}

impl RatingSession {
    pub fn new(experiment_id: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            words,
            index: 0,
            prev_word: String::new(),
            sliders: SliderValues::default(),
            pending: false,
        }
    }

    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    pub fn current(&self) -> Option<&Word> {
        self.words.get(self.index)
    }

    /// Text of the previously rated word; empty before the first submission.
    pub fn prev_word(&self) -> &str {
        &self.prev_word
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn sliders(&self) -> &SliderValues {
        &self.sliders
    }

    pub fn set_slider(&mut self, slider: Slider, value: f64) {
        self.sliders.set(slider, value);
    }

    pub fn nudge_slider(&mut self, slider: Slider, delta: f64) {
        self.sliders.nudge(slider, delta);
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Build the record for the current word and mark a submission in flight.
    ///
    /// Returns `None` while another submission is pending or when there is no
    /// word to rate.
    pub fn begin_submit(&mut self) -> Option<RatingRecord> {
        if self.pending {
            return None;
        }
        let current = self.current()?;
        let record = RatingRecord::new(&self.prev_word, &current.word, &self.sliders);
        self.pending = true;
        Some(record)
    }

    /// Settle the in-flight submission.
    pub fn finish_submit(&mut self, accepted: bool) -> SubmitOutcome {
        self.pending = false;
        if !accepted {
            return SubmitOutcome::Held;
        }
        let next = self.index + 1;
        if next >= self.words.len() {
            return SubmitOutcome::Finished;
        }
        self.prev_word = self.words[self.index].word.clone();
        self.index = next;
        self.sliders.reset();
        SubmitOutcome::Advanced
    }
}
