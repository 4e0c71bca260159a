//! The `wordslide reveal` command.

use anyhow::Result;

use wordslide_core::sequencer::Sequencer;

use crate::{BackendArgs, SlideArgs};

pub async fn execute(experiment: String, slides: SlideArgs, backend: BackendArgs) -> Result<()> {
    anyhow::ensure!(!experiment.is_empty(), "experiment id must not be empty");
    super::reveal_flow(Sequencer::single(experiment), &slides, &backend).await
}
