//! Core data model types for wordslide.
//!
//! Word lists as served by the experiment backend, the three rating sliders,
//! and the rating record posted after each judgment.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};

/// A word to be rated, as returned by the experiment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Unique identifier. The backend may send it as a string or a number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display text.
    pub word: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Payload of `GET /api/experiments/{experimentId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentWords {
    /// The seed word shown first in a reveal run.
    pub seed_word: String,
    /// Associated words, in the order they must be shown.
    #[serde(default)]
    pub words: Vec<Word>,
}

impl ExperimentWords {
    /// Build the reveal list: the seed word followed by every associated word.
    pub fn word_list(&self) -> WordList {
        let mut words = Vec::with_capacity(self.words.len() + 1);
        words.push(self.seed_word.clone());
        words.extend(self.words.iter().map(|w| w.word.clone()));
        WordList(words)
    }
}

/// Ordered words of one experiment. Index 0 is the seed word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordList(Vec<String>);

impl WordList {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the final word, or `None` for an empty list.
    pub fn last_index(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for WordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Granularity of slider input.
pub const SLIDER_STEP: f64 = 0.001;

const STEPS_PER_UNIT: f64 = 1000.0;

/// The three judgments collected for every word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    NegativePositive,
    Relevance,
    TimePerspective,
}

impl Slider {
    pub const ALL: [Slider; 3] = [
        Slider::NegativePositive,
        Slider::Relevance,
        Slider::TimePerspective,
    ];

    /// Closed range of accepted values.
    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Slider::NegativePositive | Slider::TimePerspective => -1.0..=1.0,
            Slider::Relevance => 0.0..=1.0,
        }
    }

    /// Question shown above the slider.
    pub fn prompt(self) -> &'static str {
        match self {
            Slider::NegativePositive => "When you think of the word, the feeling is",
            Slider::Relevance => "How related the word is to yourself",
            Slider::TimePerspective => "The point in your life the word relates to most",
        }
    }

    /// Labels placed along the slider, left to right.
    pub fn anchors(self) -> &'static [&'static str] {
        match self {
            Slider::NegativePositive => &["negative", "neutral", "positive"],
            Slider::Relevance => &["not related at all", "very related"],
            Slider::TimePerspective => &["past", "present", "future"],
        }
    }

    /// Cycle to the next slider, wrapping around.
    pub fn next(self) -> Slider {
        match self {
            Slider::NegativePositive => Slider::Relevance,
            Slider::Relevance => Slider::TimePerspective,
            Slider::TimePerspective => Slider::NegativePositive,
        }
    }

    /// Cycle to the previous slider, wrapping around.
    pub fn prev(self) -> Slider {
        match self {
            Slider::NegativePositive => Slider::TimePerspective,
            Slider::Relevance => Slider::NegativePositive,
            Slider::TimePerspective => Slider::Relevance,
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slider::NegativePositive => write!(f, "negative-positive"),
            Slider::Relevance => write!(f, "relevance"),
            Slider::TimePerspective => write!(f, "time-perspective"),
        }
    }
}

/// Current position of the three sliders.
///
/// Every write is clamped to the slider's range and snapped to
/// [`SLIDER_STEP`], so stored values are always valid payload values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliderValues {
    negative_positive: f64,
    relevance: f64,
    time_perspective: f64,
}

impl SliderValues {
    pub fn get(&self, slider: Slider) -> f64 {
        match slider {
            Slider::NegativePositive => self.negative_positive,
            Slider::Relevance => self.relevance,
            Slider::TimePerspective => self.time_perspective,
        }
    }

    /// Set a slider. Non-finite values are ignored.
    pub fn set(&mut self, slider: Slider, value: f64) {
        if !value.is_finite() {
            return;
        }
        let range = slider.range();
        let snapped = (value * STEPS_PER_UNIT).round() / STEPS_PER_UNIT;
        let clamped = snapped.clamp(*range.start(), *range.end());
        // -0.0 would serialize as "-0.0"
        let clamped = if clamped == 0.0 { 0.0 } else { clamped };
        match slider {
            Slider::NegativePositive => self.negative_positive = clamped,
            Slider::Relevance => self.relevance = clamped,
            Slider::TimePerspective => self.time_perspective = clamped,
        }
    }

    /// Move a slider by `delta`, saturating at the range bounds.
    pub fn nudge(&mut self, slider: Slider, delta: f64) {
        self.set(slider, self.get(slider) + delta);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One rating, as posted to `POST /api/experiments/ratings/{experimentId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    /// Text of the previously rated word; empty for the first word.
    pub prev_word: String,
    pub current_word: String,
    pub negative_positive: f64,
    pub relevance: f64,
    pub time_perspective: f64,
}

impl RatingRecord {
    pub fn new(prev_word: &str, current_word: &str, values: &SliderValues) -> Self {
        Self {
            prev_word: prev_word.to_string(),
            current_word: current_word.to_string(),
            negative_positive: values.get(Slider::NegativePositive),
            relevance: values.get(Slider::Relevance),
            time_perspective: values.get(Slider::TimePerspective),
        }
    }
}

/// Navigation targets a screen can hand control to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The list of experiments.
    ExperimentList,
    /// The rating screen for one experiment.
    Rating(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::ExperimentList => write!(f, "/experiments"),
            Route::Rating(id) => write!(f, "/experiments/rating/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_list_starts_with_seed_word() {
        let json = serde_json::json!({
            "seedWord": "tree",
            "words": [{"id": 1, "word": "forest"}, {"id": "2", "word": "leaf"}]
        });
        let experiment: ExperimentWords = serde_json::from_value(json).unwrap();
        assert_eq!(experiment.words[0].id, "1");
        assert_eq!(experiment.words[1].id, "2");

        let list = experiment.word_list();
        assert_eq!(list.iter().collect::<Vec<_>>(), ["tree", "forest", "leaf"]);
        assert_eq!(list.last_index(), Some(2));
    }

    #[test]
    fn missing_words_field_yields_seed_only() {
        let experiment: ExperimentWords =
            serde_json::from_str(r#"{"seedWord": "sun"}"#).unwrap();
        assert_eq!(experiment.word_list().len(), 1);
        assert_eq!(WordList::default().last_index(), None);
    }

    #[test]
    fn sliders_clamp_to_their_ranges() {
        let mut values = SliderValues::default();
        values.set(Slider::Relevance, 1.5);
        values.set(Slider::NegativePositive, -3.0);
        values.set(Slider::TimePerspective, 0.4);
        assert_eq!(values.get(Slider::Relevance), 1.0);
        assert_eq!(values.get(Slider::NegativePositive), -1.0);
        assert!((values.get(Slider::TimePerspective) - 0.4).abs() < 1e-9);

        values.set(Slider::Relevance, -0.2);
        assert_eq!(values.get(Slider::Relevance), 0.0);
    }

    #[test]
    fn slider_ignores_non_finite_and_snaps_to_step() {
        let mut values = SliderValues::default();
        values.set(Slider::NegativePositive, 0.12345);
        assert!((values.get(Slider::NegativePositive) - 0.123).abs() < 1e-9);
        values.set(Slider::NegativePositive, f64::NAN);
        assert!((values.get(Slider::NegativePositive) - 0.123).abs() < 1e-9);
        values.nudge(Slider::NegativePositive, 5.0);
        assert_eq!(values.get(Slider::NegativePositive), 1.0);
        values.reset();
        assert_eq!(values, SliderValues::default());
    }

    #[test]
    fn rating_record_uses_camel_case_payload() {
        let mut values = SliderValues::default();
        values.set(Slider::Relevance, 0.5);
        let record = RatingRecord::new("", "forest", &values);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prevWord": "",
                "currentWord": "forest",
                "negativePositive": 0.0,
                "relevance": 0.5,
                "timePerspective": 0.0
            })
        );
    }

    #[test]
    fn slider_cycle_and_routes() {
        for slider in Slider::ALL {
            assert_eq!(slider.next().prev(), slider);
        }
        assert_eq!(Route::Rating("e1".into()).to_string(), "/experiments/rating/e1");
        assert_eq!(Route::ExperimentList.to_string(), "/experiments");
    }
}
