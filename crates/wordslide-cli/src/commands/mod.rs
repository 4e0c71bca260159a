pub mod init;
pub mod list;
pub mod rate;
pub mod reveal;
pub mod sequence;
pub mod words;

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use wordslide_client::{create_source, load_config_from, WordslideConfig};
use wordslide_core::engine::{run_rating, run_sequencer, RatingOutcome, SequencerOutcome};
use wordslide_core::model::{Route, Slider};
use wordslide_core::sequencer::Sequencer;
use wordslide_core::timeline::RevealTimeline;
use wordslide_core::traits::WordSource;

use crate::terminal::{self, Buttons, RatingKeys, TerminalSession};
use crate::view::{TerminalRatingView, TerminalSlideView};
use crate::{BackendArgs, SlideArgs};

const INPUT_BUFFER: usize = 32;

/// Load the config and apply command-line overrides.
pub(crate) fn resolve_config(backend: &BackendArgs) -> Result<WordslideConfig> {
    let mut config = load_config_from(backend.config.as_deref())?;
    if let Some(url) = &backend.base_url {
        config.base_url = url.clone();
        config.validate()?;
    }
    Ok(config)
}

fn reveal_interval(slides: &SlideArgs, config: &WordslideConfig) -> Result<Duration> {
    match slides.interval_secs {
        Some(secs) => {
            anyhow::ensure!(secs >= 1, "--interval-secs must be at least 1");
            Ok(Duration::from_secs(secs))
        }
        None => Ok(config.reveal_interval()),
    }
}

/// Show the slide screen for `sequencer`, then follow the chosen navigation.
pub(crate) async fn reveal_flow(
    sequencer: Sequencer,
    slides: &SlideArgs,
    backend: &BackendArgs,
) -> Result<()> {
    let config = resolve_config(backend)?;
    let interval = reveal_interval(slides, &config)?;
    let source = create_source(&config)?;

    let outcome = slide_screen(Arc::clone(&source), sequencer, interval).await?;
    tracing::info!(
        experiment = outcome.state.current_experiment_index,
        word = outcome.state.word_index,
        completed = outcome.state.completed,
        "slide screen closed"
    );

    if slides.timeline {
        let path = save_timeline(&config.timeline_dir, &outcome.timeline)?;
        println!("Timeline saved to {}", path.display());
    }

    navigate(outcome.route, source, &config).await
}

async fn slide_screen(
    source: Arc<dyn WordSource>,
    sequencer: Sequencer,
    interval: Duration,
) -> Result<SequencerOutcome> {
    let buttons: Buttons = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);

    let session = TerminalSession::enter()?;
    let keys = Arc::clone(&buttons);
    let listener = terminal::spawn_key_listener(tx, move |key| terminal::slide_key(key, &keys));

    let mut view = TerminalSlideView::new(io::stdout(), buttons);
    let outcome = run_sequencer(source, sequencer, interval, rx, &mut view).await;

    // The receiver is gone, so the listener exits on its next poll.
    join_listener(listener).await;
    drop(session);
    Ok(outcome)
}

async fn join_listener(listener: std::thread::JoinHandle<()>) {
    match tokio::task::spawn_blocking(move || listener.join()).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => tracing::warn!("key listener thread panicked"),
        Err(e) => tracing::warn!("failed to join key listener: {e}"),
    }
}

/// Show the rating screen, then print any notice it raised.
pub(crate) async fn rating_screen(
    source: Arc<dyn WordSource>,
    experiment_id: &str,
) -> Result<RatingOutcome> {
    let focus = Arc::new(Mutex::new(Slider::NegativePositive));
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);

    let session = TerminalSession::enter()?;
    let mut keys = RatingKeys::new(Arc::clone(&focus));
    let listener = terminal::spawn_key_listener(tx, move |key| keys.map(key));

    let mut view = TerminalRatingView::new(io::stdout(), focus);
    let outcome = run_rating(source, experiment_id, rx, &mut view).await;

    join_listener(listener).await;
    drop(session);

    for notice in view.notices() {
        println!("{notice}");
    }
    println!("{} rating(s) saved for {experiment_id}", outcome.submitted);
    Ok(outcome)
}

/// Write `timeline` under `dir` with a timestamped file name.
pub(crate) fn save_timeline(dir: &std::path::Path, timeline: &RevealTimeline) -> Result<PathBuf> {
    let name = format!(
        "timeline-{}.json",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    let path = dir.join(name);
    timeline
        .save_json(&path)
        .with_context(|| format!("failed to save timeline {}", timeline.id))?;
    Ok(path)
}

/// Hand control to the screen named by `route`.
pub(crate) async fn navigate(
    route: Option<Route>,
    source: Arc<dyn WordSource>,
    config: &WordslideConfig,
) -> Result<()> {
    match route {
        None => Ok(()),
        Some(Route::ExperimentList) => {
            list::print_experiments(config);
            Ok(())
        }
        Some(Route::Rating(experiment_id)) => {
            tracing::info!(route = %Route::Rating(experiment_id.clone()), "navigating");
            let outcome = rating_screen(Arc::clone(&source), &experiment_id).await?;
            if outcome.route == Some(Route::ExperimentList) {
                list::print_experiments(config);
            }
            Ok(())
        }
    }
}
