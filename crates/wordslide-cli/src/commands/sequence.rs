//! The `wordslide sequence` command.

use anyhow::Result;

use wordslide_core::sequencer::Sequencer;

use crate::{BackendArgs, SlideArgs};

pub async fn execute(
    experiments: Vec<String>,
    slides: SlideArgs,
    backend: BackendArgs,
) -> Result<()> {
    let experiments: Vec<String> = experiments
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    anyhow::ensure!(!experiments.is_empty(), "no experiment ids given");

    super::reveal_flow(Sequencer::chained(experiments), &slides, &backend).await
}
