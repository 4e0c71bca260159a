//! Reveal sequencer over one or more experiments.
//!
//! [`Sequencer::single`] reveals a single experiment's list. [`Sequencer::chained`]
//! walks several experiments in order, moving to the next seed word when the
//! participant asks for it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Route, WordList};
use crate::reveal::{DisplayPair, RevealEvent, RevealState};

/// Events accepted by a [`Sequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    Start,
    Tick,
    /// Move on to the next experiment's seed word.
    AdvanceExperiment,
}

/// Navigation offered once the active experiment is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Go to the rating screen for the given experiment.
    Rate(String),
    /// Return to the experiment list.
    BackToList,
    /// Continue with the next experiment's seed word.
    NextSeedWord,
}

impl NavAction {
    /// Button caption.
    pub fn label(&self) -> &'static str {
        match self {
            NavAction::Rate(_) => "Start rating",
            NavAction::BackToList => "Back to list",
            NavAction::NextSeedWord => "Next seed word",
        }
    }

    /// Route this action leads to; `None` for actions that stay on screen.
    pub fn route(&self) -> Option<Route> {
        match self {
            NavAction::Rate(id) => Some(Route::Rating(id.clone())),
            NavAction::BackToList => Some(Route::ExperimentList),
            NavAction::NextSeedWord => None,
        }
    }
}

/// Observable state of a sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerState {
    pub current_experiment_index: usize,
    pub word_index: usize,
    pub started: bool,
    pub display_pair: DisplayPair,
    pub completed: bool,
}

/// Word-reveal sequencer.
#[derive(Debug, Clone)]
pub struct Sequencer {
    experiments: Vec<String>,
    lists: HashMap<String, WordList>,
    active: usize,
    reveal: RevealState,
    chained: bool,
}

impl Sequencer {
    /// Sequencer for one experiment.
    pub fn single(experiment_id: impl Into<String>) -> Self {
        Self::build(vec![experiment_id.into()], false)
    }

    /// Sequencer that chains several experiments in the given order.
    pub fn chained(experiment_ids: Vec<String>) -> Self {
        Self::build(experiment_ids, true)
    }

    fn build(experiments: Vec<String>, chained: bool) -> Self {
        Self {
            experiments,
            lists: HashMap::new(),
            active: 0,
            reveal: RevealState::NotStarted,
            chained,
        }
    }

    pub fn experiment_ids(&self) -> &[String] {
        &self.experiments
    }

    /// Identifier of the experiment being revealed.
    pub fn active_experiment(&self) -> Option<&str> {
        self.experiments.get(self.active).map(String::as_str)
    }

    pub fn reveal_state(&self) -> RevealState {
        self.reveal
    }

    fn active_list(&self) -> Option<&WordList> {
        self.active_experiment().and_then(|id| self.lists.get(id))
    }

    /// Store the fetched list for `experiment_id`.
    ///
    /// Returns `true` when the active display may have changed.
    pub fn load(&mut self, experiment_id: &str, list: WordList) -> bool {
        self.lists.insert(experiment_id.to_string(), list);
        if self.active_experiment() != Some(experiment_id) {
            return false;
        }
        self.reveal = self
            .reveal
            .transition(RevealEvent::WordsLoaded, self.active_list());
        true
    }

    pub fn has_words(&self, experiment_id: &str) -> bool {
        self.lists.contains_key(experiment_id)
    }

    /// Apply an event. Returns `true` when the observable state changed.
    pub fn apply(&mut self, event: SequencerEvent) -> bool {
        let before = self.snapshot();
        match event {
            SequencerEvent::Start => {
                self.reveal = self
                    .reveal
                    .transition(RevealEvent::Start, self.active_list());
            }
            SequencerEvent::Tick => {
                self.reveal = self.reveal.transition(RevealEvent::Tick, self.active_list());
            }
            SequencerEvent::AdvanceExperiment => {
                if !self.can_advance_experiment() {
                    return false;
                }
                self.active += 1;
                self.reveal = RevealState::NotStarted
                    .transition(RevealEvent::Start, self.active_list());
            }
        }
        self.snapshot() != before
    }

    fn can_advance_experiment(&self) -> bool {
        self.chained && self.reveal.is_completed() && self.active + 1 < self.experiments.len()
    }

    /// Whether the reveal timer should be running.
    pub fn timer_armed(&self) -> bool {
        self.reveal.can_advance(self.active_list())
    }

    pub fn display(&self) -> DisplayPair {
        self.reveal.display(self.active_list())
    }

    /// Navigation currently offered. Empty until the active list is exhausted.
    pub fn actions(&self) -> Vec<NavAction> {
        let Some(id) = self.active_experiment() else {
            return Vec::new();
        };
        if !self.reveal.is_completed() {
            return Vec::new();
        }
        let mut actions = vec![NavAction::Rate(id.to_string()), NavAction::BackToList];
        if self.can_advance_experiment() {
            actions.push(NavAction::NextSeedWord);
        }
        actions
    }

    pub fn snapshot(&self) -> SequencerState {
        SequencerState {
            current_experiment_index: self.active,
            word_index: self.reveal.index().unwrap_or(0),
            started: self.reveal.is_started(),
            display_pair: self.display(),
            completed: self.reveal.is_completed(),
        }
    }
}
