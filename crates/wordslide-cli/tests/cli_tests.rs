//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A `wordslide` command isolated from the caller's config and environment.
fn wordslide(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("wordslide").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("WORDSLIDE_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_describes_the_tool() {
    let dir = TempDir::new().unwrap();
    wordslide(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Word-reveal slides"))
        .stdout(predicate::str::contains("reveal"))
        .stdout(predicate::str::contains("sequence"))
        .stdout(predicate::str::contains("rate"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    wordslide(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wordslide"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    wordslide(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created wordslide.toml"));

    assert!(dir.path().join("wordslide.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("wordslide.toml"), "experiments = [\"keep\"]\n").unwrap();

    wordslide(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(dir.path().join("wordslide.toml")).unwrap();
    assert!(content.contains("keep"));
}

#[test]
fn list_without_experiments_suggests_init() {
    let dir = TempDir::new().unwrap();
    wordslide(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("wordslide init"));
}

#[test]
fn list_shows_configured_experiments() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lab.toml");
    std::fs::write(&config, "experiments = [\"pilot\", \"main-study\"]\n").unwrap();

    wordslide(&dir)
        .arg("list")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("pilot"))
        .stdout(predicate::str::contains("main-study"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    wordslide(&dir)
        .arg("list")
        .arg("--config")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn zero_interval_is_rejected() {
    let dir = TempDir::new().unwrap();
    wordslide(&dir)
        .args(["reveal", "--experiment", "e1", "--interval-secs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--interval-secs"));

    // Full-screen commands keep logs off the terminal.
    assert!(dir.path().join("wordslide.log").exists());
}

#[test]
fn one_shot_commands_log_to_stderr() {
    let dir = TempDir::new().unwrap();
    wordslide(&dir).arg("list").assert().success();
    assert!(!dir.path().join("wordslide.log").exists());
}

#[test]
fn explicit_log_file_is_used() {
    let dir = TempDir::new().unwrap();
    wordslide(&dir)
        .args(["--log-file", "run.log", "reveal", "--experiment", "e1", "--interval-secs", "0"])
        .assert()
        .failure();
    assert!(dir.path().join("run.log").exists());
    assert!(!dir.path().join("wordslide.log").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn words_prints_reveal_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/experiments/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "seedWord": "tree",
            "words": [{"id": 1, "word": "forest"}, {"id": 2, "word": "leaf"}]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    wordslide(&dir)
        .args(["words", "--experiment", "e1", "--base-url", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("forest"))
        .stdout(predicate::str::contains("leaf"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn words_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/experiments/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "seedWord": "tree",
            "words": [{"id": "a", "word": "forest"}]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = wordslide(&dir)
        .env("WORDSLIDE_BASE_URL", server.uri())
        .args(["words", "--experiment", "e1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["seedWord"], "tree");
    assert_eq!(json["words"][0]["word"], "forest");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn words_for_unknown_experiment_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/experiments/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    wordslide(&dir)
        .args(["words", "--experiment", "nope", "--base-url", &server.uri()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}
