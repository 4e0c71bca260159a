//! The `wordslide words` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use wordslide_client::create_source;
use wordslide_core::model::ExperimentWords;

use crate::BackendArgs;

pub async fn execute(experiment: String, json: bool, backend: BackendArgs) -> Result<()> {
    let config = super::resolve_config(&backend)?;
    let source = create_source(&config)?;

    let words = source
        .fetch_experiment(&experiment)
        .await
        .with_context(|| format!("failed to fetch experiment '{experiment}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&words)?);
    } else {
        println!("{}", word_table(&words));
    }
    Ok(())
}

/// Reveal order: the seed word, then each associated word with its id.
fn word_table(words: &ExperimentWords) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Word", "Id"]);
    table.add_row(vec![
        Cell::new(0),
        Cell::new(&words.seed_word),
        Cell::new("(seed)"),
    ]);
    for (i, word) in words.words.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(&word.word), Cell::new(&word.id)]);
    }
    table
}
