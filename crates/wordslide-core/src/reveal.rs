//! Reveal state machine for a single word list.
//!
//! A reveal run waits for the start key, shows the seed word, then moves one
//! word forward on every timer tick until the last word is on screen.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::WordList;

/// Time each word stays on screen before the next one is revealed.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_secs(15);

/// Returns `true` for keys that start a reveal run.
///
/// `ㄴ` is what the `s` key produces on a Korean 2-set keyboard.
pub fn is_start_key(key: char) -> bool {
    matches!(key, 's' | 'S' | 'ㄴ')
}

/// Where a reveal run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RevealState {
    /// Waiting for the start key. Only the fixation placeholder is shown.
    NotStarted,
    /// Started; `index` is the word currently shown.
    Advancing { index: usize },
    /// The last word is on screen and navigation is offered.
    Completed { index: usize },
}

/// Inputs that drive a [`RevealState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// The start key was pressed.
    Start,
    /// The reveal interval elapsed.
    Tick,
    /// The word list became available.
    WordsLoaded,
}

/// The two words on screen: the previous one (dimmed) and the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPair {
    pub prev: Option<String>,
    pub curr: Option<String>,
}

impl DisplayPair {
    pub fn new(prev: Option<&str>, curr: Option<&str>) -> Self {
        Self {
            prev: prev.map(str::to_string),
            curr: curr.map(str::to_string),
        }
    }
}

impl RevealState {
    /// Compute the next state. `list` is `None` while the words are unavailable.
    pub fn transition(self, event: RevealEvent, list: Option<&WordList>) -> RevealState {
        let last = list.and_then(WordList::last_index);
        match (self, event) {
            (RevealState::NotStarted, RevealEvent::Start) => settle(0, last),
            (RevealState::Advancing { index }, RevealEvent::Tick) => match last {
                Some(last) => settle((index + 1).min(last), Some(last)),
                None => self,
            },
            (RevealState::Advancing { index }, RevealEvent::WordsLoaded) => settle(index, last),
            _ => self,
        }
    }

    pub fn is_started(self) -> bool {
        !matches!(self, RevealState::NotStarted)
    }

    pub fn is_completed(self) -> bool {
        matches!(self, RevealState::Completed { .. })
    }

    /// Index of the word on screen, `None` before the start key.
    pub fn index(self) -> Option<usize> {
        match self {
            RevealState::NotStarted => None,
            RevealState::Advancing { index } | RevealState::Completed { index } => Some(index),
        }
    }

    /// Whether a tick could change this state given `list`.
    pub fn can_advance(self, list: Option<&WordList>) -> bool {
        matches!(self, RevealState::Advancing { .. }) && list.is_some_and(|l| !l.is_empty())
    }

    /// Words to show for this state.
    pub fn display(self, list: Option<&WordList>) -> DisplayPair {
        let (Some(index), Some(list)) = (self.index(), list) else {
            return DisplayPair::default();
        };
        let prev = index.checked_sub(1).and_then(|i| list.get(i));
        DisplayPair::new(prev, list.get(index))
    }
}

fn settle(index: usize, last: Option<usize>) -> RevealState {
    match last {
        Some(last) if index >= last => RevealState::Completed { index },
        _ => RevealState::Advancing { index },
    }
}
