//! The `wordslide rate` command.

use anyhow::Result;

use wordslide_client::create_source;
use wordslide_core::model::Route;

use crate::BackendArgs;

pub async fn execute(experiment: String, backend: BackendArgs) -> Result<()> {
    anyhow::ensure!(!experiment.is_empty(), "experiment id must not be empty");
    let config = super::resolve_config(&backend)?;
    let source = create_source(&config)?;

    let outcome = super::rating_screen(source, &experiment).await?;
    if outcome.route == Some(Route::ExperimentList) {
        super::list::print_experiments(&config);
    }
    Ok(())
}
