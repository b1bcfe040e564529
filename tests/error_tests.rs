//! Failure-path integration tests
//!
//! The media tool is pointed at a binary that does not exist, so every
//! probe fails fast and no network access happens.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MISSING_TOOL: &str = "/nonexistent/ffmpeg-for-tests";

/// Temp XDG config home with a config file and an output dir
struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    fn new(candidates: &[&str]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let config_dir = root.path().join("stream-capture");
        fs::create_dir_all(&config_dir).unwrap();

        let list = candidates
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");
        let toml = format!(
            "ffmpeg_path = \"{}\"\nprobe_pause_ms = 0\noutput_dir = \"{}\"\ncandidates = [{}]\n",
            MISSING_TOOL,
            root.path().join("out").display(),
            list
        );
        fs::write(config_dir.join("config.toml"), toml).unwrap();
        Self { root }
    }

    fn out_dir(&self) -> PathBuf {
        self.root.path().join("out")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stream-capture").unwrap();
        cmd.env_remove("STREAM_URL")
            .env_remove("RUST_LOG")
            .env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.root.path());
        cmd
    }
}

fn only_entry(dir: &Path) -> PathBuf {
    let entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected one artifact, found {:?}", entries);
    entries.into_iter().next().unwrap()
}

#[test]
fn unreachable_candidates_exit_zero_with_diagnostic() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a", "http://127.0.0.1:9/b"]);

    sandbox
        .cmd()
        .arg("-d")
        .arg("5s")
        .assert()
        .success()
        .stderr(predicate::str::contains("No working stream found"));

    let report = only_entry(&sandbox.out_dir());
    let name = report.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("eu_stream_failed_"), "got {}", name);
    assert!(name.ends_with(".txt"));

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.contains("http://127.0.0.1:9/a"));
    assert!(text.contains("http://127.0.0.1:9/b"));
}

#[test]
fn strict_exit_reports_failure() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    sandbox.cmd().arg("--strict-exit").assert().code(1);

    assert!(only_entry(&sandbox.out_dir())
        .to_string_lossy()
        .contains("eu_stream_failed_"));
}

#[test]
fn single_mode_records_directly_and_reports_failure() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    sandbox
        .cmd()
        .args(["--single", "-u", "http://127.0.0.1:9/live"])
        .assert()
        .success();

    let text = fs::read_to_string(only_entry(&sandbox.out_dir())).unwrap();
    assert!(text.contains("Stream URL: http://127.0.0.1:9/live"));
    assert!(text.contains("not found"));
}

#[test]
fn stream_url_env_is_used_in_single_mode() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    sandbox
        .cmd()
        .env("STREAM_URL", "http://127.0.0.1:9/from-env")
        .arg("--single")
        .assert()
        .success();

    let text = fs::read_to_string(only_entry(&sandbox.out_dir())).unwrap();
    assert!(text.contains("http://127.0.0.1:9/from-env"));
}

#[test]
fn json_outcome_on_stdout() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    let output = sandbox.cmd().arg("--json").output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "not_found");
    assert!(value["report_path"]
        .as_str()
        .unwrap()
        .contains("eu_stream_failed_"));
}

#[test]
fn probe_command_fails_when_nothing_answers() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    sandbox
        .cmd()
        .arg("probe")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No working stream endpoint found"));

    // Probing alone leaves no artifacts
    assert!(!sandbox.out_dir().exists());
}

#[test]
fn config_set_unknown_key() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    sandbox
        .cmd()
        .args(["config", "set", "api_key", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_values() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    sandbox
        .cmd()
        .args(["config", "set", "duration", "soon"])
        .assert()
        .failure();
    sandbox
        .cmd()
        .args(["config", "set", "stream_url", "not-a-url"])
        .assert()
        .failure();
    sandbox
        .cmd()
        .args(["config", "set", "encoding.channels", "0"])
        .assert()
        .failure();
}

#[test]
fn malformed_stream_url_env_is_skipped_while_probing() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    sandbox
        .cmd()
        .env("STREAM_URL", "example.com/live")
        .assert()
        .success();

    let text = fs::read_to_string(only_entry(&sandbox.out_dir())).unwrap();
    assert!(text.contains("http://127.0.0.1:9/a"));
    assert!(!text.contains("example.com/live"));
}

#[test]
fn malformed_stream_url_env_in_single_mode_still_leaves_diagnostic() {
    let sandbox = Sandbox::new(&["http://127.0.0.1:9/a"]);

    sandbox
        .cmd()
        .env("STREAM_URL", "example.com/live")
        .arg("--single")
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid stream URL"));

    let report = only_entry(&sandbox.out_dir());
    assert!(report.to_string_lossy().contains("eu_stream_failed_"));
    let text = fs::read_to_string(report).unwrap();
    assert!(text.contains("Stream URL: example.com/live"));
}
