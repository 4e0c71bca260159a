//! The `wordslide init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("wordslide.toml").exists() {
        println!("wordslide.toml already exists, skipping.");
    } else {
        std::fs::write("wordslide.toml", SAMPLE_CONFIG)?;
        println!("Created wordslide.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit wordslide.toml with your backend URL and experiment ids");
    println!("  2. Run: wordslide words --experiment <id>");
    println!("  3. Run: wordslide reveal --experiment <id>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# wordslide configuration

# Experiment backend. ${VAR} references are read from the environment.
base_url = "http://localhost:3000"

# Seconds each word stays on screen.
reveal_interval_secs = 15

# Uncomment to give up on slow requests.
# request_timeout_secs = 30

# Shown by `wordslide list`.
experiments = []

# Where `--timeline` writes onset logs.
timeline_dir = "./wordslide-timelines"
"#;
