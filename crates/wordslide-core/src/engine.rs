//! Session drivers.
//!
//! Bind the reveal sequencer and the rating session to a word source, a
//! stream of user input, a timer and a view. All state changes happen on the
//! driver task; the view only renders.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, Sleep};
use tracing::{debug, error, info, warn};

use crate::error::classify;
use crate::model::{ExperimentWords, Route, Slider};
use crate::rating::{RatingSession, SubmitOutcome};
use crate::reveal::DisplayPair;
use crate::sequencer::{NavAction, Sequencer, SequencerEvent, SequencerState};
use crate::timeline::{OnsetKind, RevealTimeline};
use crate::traits::WordSource;

/// Message shown when every word of an experiment has been rated.
pub const RATINGS_COMPLETE_NOTICE: &str = "All ratings are complete!";

/// Await the future in `slot`, or never resolve if the slot is empty.
async fn next_of<F: Future + Unpin>(slot: &mut Option<F>) -> F::Output {
    match slot {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

// ---------------------------------------------------------------------------
// Reveal sequencer driver
// ---------------------------------------------------------------------------

/// User input on the slide screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideInput {
    /// The start key was pressed.
    Start,
    /// A navigation button was chosen.
    Choose(NavAction),
    /// Leave the screen without navigating.
    Quit,
}

/// Renders the slide screen.
pub trait SlideView: Send {
    /// Fixation placeholder shown before the start key.
    fn placeholder(&mut self);
    /// The word pair on screen and the navigation currently offered.
    fn show(&mut self, pair: &DisplayPair, actions: &[NavAction]);
}

/// How a reveal run ended.
#[derive(Debug, Clone)]
pub struct SequencerOutcome {
    /// Where the participant navigated to; `None` if they quit.
    pub route: Option<Route>,
    /// Final sequencer state.
    pub state: SequencerState,
    pub timeline: RevealTimeline,
}

struct SlideRun<'v> {
    sequencer: Sequencer,
    interval: Duration,
    timer: Option<Pin<Box<Sleep>>>,
    started_at: Option<Instant>,
    timeline: RevealTimeline,
    view: &'v mut dyn SlideView,
}

impl SlideRun<'_> {
    /// Drop any scheduled tick and schedule a fresh one if the active list
    /// can still advance.
    fn rearm(&mut self) {
        self.timer = self
            .sequencer
            .timer_armed()
            .then(|| Box::pin(tokio::time::sleep(self.interval)));
    }

    fn render(&mut self) {
        if self.sequencer.reveal_state().is_started() {
            let actions = self.sequencer.actions();
            self.view.show(&self.sequencer.display(), &actions);
        } else {
            self.view.placeholder();
        }
    }

    fn changed(&mut self, kind: OnsetKind) {
        self.rearm();
        if self.sequencer.reveal_state().is_started() {
            let started_at = *self.started_at.get_or_insert_with(Instant::now);
            self.timeline
                .record(kind, &self.sequencer, started_at.elapsed());
        }
        self.render();
    }

    fn loaded(&mut self, experiment_id: &str, words: ExperimentWords) {
        let list = words.word_list();
        info!(experiment = %experiment_id, words = list.len(), "word list loaded");
        if self.sequencer.load(experiment_id, list) {
            self.changed(OnsetKind::WordsLoaded);
        }
    }

    fn finish(self, route: Option<Route>) -> SequencerOutcome {
        SequencerOutcome {
            route,
            state: self.sequencer.snapshot(),
            timeline: self.timeline,
        }
    }
}

/// Run a reveal sequencer until the participant navigates away or quits.
///
/// Word lists are fetched once, one experiment at a time in list order. A
/// failed fetch is logged and leaves that experiment without words. The
/// reveal timer only runs while the active list can advance and is replaced
/// on every state change.
pub async fn run_sequencer(
    source: Arc<dyn WordSource>,
    sequencer: Sequencer,
    interval: Duration,
    mut inputs: mpsc::Receiver<SlideInput>,
    view: &mut dyn SlideView,
) -> SequencerOutcome {
    let ids = sequencer.experiment_ids().to_vec();
    let mut fetches = stream::iter(ids.clone())
        .then(move |id| {
            let source = Arc::clone(&source);
            async move {
                let result = source.fetch_experiment(&id).await;
                (id, result)
            }
        })
        .boxed();
    let mut fetching = true;

    let mut run = SlideRun {
        sequencer,
        interval,
        timer: None,
        started_at: None,
        timeline: RevealTimeline::new(ids, interval),
        view,
    };
    run.render();

    loop {
        tokio::select! {
            fetched = fetches.next(), if fetching => match fetched {
                Some((id, Ok(words))) => run.loaded(&id, words),
                Some((id, Err(e))) => {
                    error!(experiment = %id, kind = classify(&e), "failed to fetch words: {e:#}");
                }
                None => fetching = false,
            },
            () = next_of(&mut run.timer) => {
                run.timer = None;
                if run.sequencer.apply(SequencerEvent::Tick) {
                    run.changed(OnsetKind::Advance);
                } else {
                    run.rearm();
                }
            }
            input = inputs.recv() => match input {
                Some(SlideInput::Start) => {
                    if run.sequencer.apply(SequencerEvent::Start) {
                        run.started_at = Some(Instant::now());
                        info!(experiment = ?run.sequencer.active_experiment(), "reveal started");
                        run.changed(OnsetKind::Start);
                    } else {
                        debug!("start key ignored");
                    }
                }
                Some(SlideInput::Choose(action)) => {
                    if !run.sequencer.actions().contains(&action) {
                        debug!(?action, "navigation not available");
                        continue;
                    }
                    if let Some(route) = action.route() {
                        info!(%route, "leaving slide screen");
                        return run.finish(Some(route));
                    }
                    if run.sequencer.apply(SequencerEvent::AdvanceExperiment) {
                        let experiment = run.sequencer.active_experiment().unwrap_or_default();
                        if !run.sequencer.has_words(experiment) {
                            warn!(%experiment, "next seed word has no words yet");
                        }
                        info!(%experiment, "next seed word");
                        run.changed(OnsetKind::NextSeedWord);
                    }
                }
                Some(SlideInput::Quit) | None => return run.finish(None),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Rating collector driver
// ---------------------------------------------------------------------------

/// User input on the rating screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingInput {
    /// Put a slider at an absolute value.
    Set(Slider, f64),
    /// Move a slider by a delta.
    Nudge(Slider, f64),
    Submit,
    /// Render again without changing the session, e.g. after a focus change.
    Redraw,
    Quit,
}

/// Renders the rating screen.
pub trait RatingView: Send {
    fn show(&mut self, session: &RatingSession);
    /// Blocking notice to the participant.
    fn notify(&mut self, message: &str);
}

/// How a rating session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingOutcome {
    /// Where the participant was sent; `None` if they quit.
    pub route: Option<Route>,
    /// Ratings accepted by the backend during this session.
    pub submitted: usize,
}

/// Run the rating screen for one experiment.
///
/// At most one submission is in flight; submit input is ignored while one is
/// pending. A failed submission keeps the current word and slider values so
/// the participant can submit again.
pub async fn run_rating(
    source: Arc<dyn WordSource>,
    experiment_id: &str,
    mut inputs: mpsc::Receiver<RatingInput>,
    view: &mut dyn RatingView,
) -> RatingOutcome {
    let mut session = RatingSession::new(experiment_id, Vec::new());
    let mut submitted = 0usize;

    let mut fetch: Option<BoxFuture<'static, anyhow::Result<ExperimentWords>>> = {
        let source = Arc::clone(&source);
        let id = experiment_id.to_string();
        Some(async move { source.fetch_experiment(&id).await }.boxed())
    };
    let mut in_flight: Option<BoxFuture<'static, anyhow::Result<()>>> = None;

    view.show(&session);

    loop {
        tokio::select! {
            fetched = next_of(&mut fetch) => {
                fetch = None;
                match fetched {
                    Ok(experiment) => {
                        info!(
                            experiment = %experiment_id,
                            words = experiment.words.len(),
                            "rating words loaded"
                        );
                        session = RatingSession::new(experiment_id, experiment.words);
                        view.show(&session);
                    }
                    Err(e) => {
                        error!(
                            experiment = %experiment_id,
                            kind = classify(&e),
                            "failed to fetch words: {e:#}"
                        );
                    }
                }
            }
            result = next_of(&mut in_flight) => {
                in_flight = None;
                let accepted = match result {
                    Ok(()) => true,
                    Err(e) => {
                        error!(
                            experiment = %experiment_id,
                            kind = classify(&e),
                            "failed to save rating: {e:#}"
                        );
                        false
                    }
                };
                match session.finish_submit(accepted) {
                    SubmitOutcome::Advanced => submitted += 1,
                    SubmitOutcome::Finished => {
                        submitted += 1;
                        info!(experiment = %experiment_id, submitted, "all ratings complete");
                        view.notify(RATINGS_COMPLETE_NOTICE);
                        return RatingOutcome {
                            route: Some(Route::ExperimentList),
                            submitted,
                        };
                    }
                    SubmitOutcome::Held => {}
                }
                view.show(&session);
            }
            input = inputs.recv() => match input {
                Some(RatingInput::Set(slider, value)) => {
                    session.set_slider(slider, value);
                    view.show(&session);
                }
                Some(RatingInput::Nudge(slider, delta)) => {
                    session.nudge_slider(slider, delta);
                    view.show(&session);
                }
                Some(RatingInput::Redraw) => view.show(&session),
                Some(RatingInput::Submit) => {
                    let Some(record) = session.begin_submit() else {
                        debug!(pending = session.is_pending(), "submit ignored");
                        continue;
                    };
                    debug!(word = %record.current_word, "submitting rating");
                    let source = Arc::clone(&source);
                    let id = experiment_id.to_string();
                    in_flight = Some(
                        async move { source.submit_rating(&id, &record).await }.boxed(),
                    );
                    view.show(&session);
                }
                Some(RatingInput::Quit) | None => {
                    return RatingOutcome { route: None, submitted };
                }
            },
        }
    }
}
