//! Client configuration and source factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wordslide_core::reveal::DEFAULT_REVEAL_INTERVAL;
use wordslide_core::traits::WordSource;

use crate::http::HttpWordSource;

/// Top-level wordslide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordslideConfig {
    /// Base URL of the experiment backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds each word stays on screen during a reveal run.
    #[serde(default = "default_reveal_interval")]
    pub reveal_interval_secs: u64,
    /// Optional request timeout. Requests wait indefinitely when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Experiment identifiers shown on the experiment list.
    #[serde(default)]
    pub experiments: Vec<String>,
    /// Directory for saved reveal timelines.
    #[serde(default = "default_timeline_dir")]
    pub timeline_dir: PathBuf,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_reveal_interval() -> u64 {
    DEFAULT_REVEAL_INTERVAL.as_secs()
}
fn default_timeline_dir() -> PathBuf {
    PathBuf::from("./wordslide-timelines")
}

impl Default for WordslideConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            reveal_interval_secs: default_reveal_interval(),
            request_timeout_secs: None,
            experiments: Vec::new(),
            timeline_dir: default_timeline_dir(),
        }
    }
}

impl WordslideConfig {
    pub fn reveal_interval(&self) -> Duration {
        Duration::from_secs(self.reveal_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Check values that would make a session unusable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.base_url.is_empty(), "base_url must not be empty");
        anyhow::ensure!(
            self.reveal_interval_secs >= 1,
            "reveal_interval_secs must be at least 1"
        );
        if let Some(secs) = self.request_timeout_secs {
            anyhow::ensure!(secs >= 1, "request_timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order without a path:
/// 1. `wordslide.toml` in the current directory
/// 2. `~/.config/wordslide/config.toml`
///
/// Environment variable override: `WORDSLIDE_BASE_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<WordslideConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("wordslide.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => WordslideConfig::default(),
    };

    if let Ok(url) = std::env::var("WORDSLIDE_BASE_URL") {
        config.base_url = url;
    }
    config.base_url = resolve_env_vars(&config.base_url);

    config.validate()?;
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<WordslideConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<WordslideConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("wordslide"))
}

/// Create the HTTP word source described by `config`.
pub fn create_source(config: &WordslideConfig) -> Result<Arc<dyn WordSource>> {
    let source = HttpWordSource::new(&config.base_url, config.request_timeout())?;
    tracing::debug!(base_url = %source.base_url(), "using HTTP word source");
    Ok(Arc::new(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_WORDSLIDE_TEST_HOST", "lab.example");
        assert_eq!(
            resolve_env_vars("https://${_WORDSLIDE_TEST_HOST}/"),
            "https://lab.example/"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_WORDSLIDE_TEST_HOST");
    }

    #[test]
    fn default_config() {
        let config = WordslideConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.reveal_interval(), DEFAULT_REVEAL_INTERVAL);
        assert_eq!(config.request_timeout(), None);
        assert!(config.experiments.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_config_with_defaults() {
        let toml_str = r#"
base_url = "http://lab.local:8080"
experiments = ["e1", "e2"]
request_timeout_secs = 10
"#;
        let config: WordslideConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "http://lab.local:8080");
        assert_eq!(config.experiments, vec!["e1", "e2"]);
        assert_eq!(config.reveal_interval_secs, 15);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordslide.toml");
        std::fs::write(&path, "reveal_interval_secs = 5\nexperiments = [\"a\"]\n").unwrap();

        let config = parse_config_file(&path).unwrap();
        assert_eq!(config.reveal_interval(), Duration::from_secs(5));
        assert_eq!(config.experiments, vec!["a"]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Some(Path::new("/no/such/wordslide.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "reveal_interval_secs = 0\n").unwrap();
        let config = parse_config_file(&path).unwrap();
        assert!(config.validate().is_err());

        std::fs::write(&path, "reveal_interval_secs = \"soon\"\n").unwrap();
        let err = parse_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }

    #[test]
    fn creates_http_source() {
        let source = create_source(&WordslideConfig::default()).unwrap();
        assert_eq!(source.name(), "http");

        let config = WordslideConfig {
            base_url: "::".into(),
            ..Default::default()
        };
        assert!(create_source(&config).is_err());
    }
}
