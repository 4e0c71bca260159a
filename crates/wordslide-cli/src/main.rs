//! wordslide CLI: terminal front end for word-reveal and rating experiments.

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;
mod view;

#[derive(Parser)]
#[command(
    name = "wordslide",
    version,
    about = "Word-reveal slides and rating screens for association experiments"
)]
struct Cli {
    /// Write logs to this file instead of stderr. The full-screen commands
    /// (reveal, sequence, rate) log to ./wordslide.log when this is not given.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that talks to the backend.
#[derive(Args, Clone, Debug)]
pub struct BackendArgs {
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Options for slide screens.
#[derive(Args, Clone, Debug)]
pub struct SlideArgs {
    /// Seconds each word stays on screen (overrides config)
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Save the onset timeline as JSON when the screen closes
    #[arg(long)]
    pub timeline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reveal one experiment's words, then offer rating or the experiment list
    Reveal {
        /// Experiment identifier
        #[arg(long)]
        experiment: String,

        #[command(flatten)]
        slides: SlideArgs,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Reveal several experiments in a row, one seed word after another
    Sequence {
        /// Experiment identifiers, comma-separated, in presentation order
        #[arg(long, value_delimiter = ',', required = true)]
        experiments: Vec<String>,

        #[command(flatten)]
        slides: SlideArgs,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Rate an experiment's words on three sliders
    Rate {
        /// Experiment identifier
        #[arg(long)]
        experiment: String,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Print an experiment's reveal word list
    Words {
        /// Experiment identifier
        #[arg(long)]
        experiment: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Show the experiment list
    List {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter wordslide.toml
    Init,
}

/// Log file for full-screen commands run without `--log-file`.
const DEFAULT_SCREEN_LOG: &str = "wordslide.log";

impl Commands {
    /// Whether the command takes over the terminal in raw mode.
    fn is_full_screen(&self) -> bool {
        matches!(
            self,
            Commands::Reveal { .. } | Commands::Sequence { .. } | Commands::Rate { .. }
        )
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wordslide=info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_file = cli.log_file.clone().or_else(|| {
        cli.command
            .is_full_screen()
            .then(|| PathBuf::from(DEFAULT_SCREEN_LOG))
    });
    if let Err(e) = init_tracing(log_file.as_ref()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Reveal {
            experiment,
            slides,
            backend,
        } => commands::reveal::execute(experiment, slides, backend).await,
        Commands::Sequence {
            experiments,
            slides,
            backend,
        } => commands::sequence::execute(experiments, slides, backend).await,
        Commands::Rate {
            experiment,
            backend,
        } => commands::rate::execute(experiment, backend).await,
        Commands::Words {
            experiment,
            json,
            backend,
        } => commands::words::execute(experiment, json, backend).await,
        Commands::List { config } => commands::list::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
