//! The `wordslide list` command.

use std::path::PathBuf;

use anyhow::Result;

use wordslide_client::{load_config_from, WordslideConfig};
use wordslide_core::model::Route;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    print_experiments(&config);
    Ok(())
}

/// Print the experiment list screen.
pub(crate) fn print_experiments(config: &WordslideConfig) {
    if config.experiments.is_empty() {
        println!("No experiments configured. Run `wordslide init` to create a config file.");
        return;
    }

    println!("Experiments ({}):", Route::ExperimentList);
    for id in &config.experiments {
        println!("  {id}");
    }
    println!();
    println!("Start one with: wordslide reveal --experiment <id>");
}
