use std::fs;
use std::path::Path;
use std::process::Command as ProcessCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TS: &str = "2025-01-01, 10:00:00";

fn codestamp() -> Command {
    let mut cmd = Command::cargo_bin("codestamp").unwrap();
    cmd.env("CODESTAMP_DEBUG", "0");
    cmd
}

fn git(dir: &Path, args: &[&str]) {
    let status = ProcessCommand::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_CONFIG_SYSTEM", "/dev/null")
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
}

#[test]
fn single_line_change_round_trip() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.c");
    fs::write(&file, "a=1\n").unwrap();

    codestamp()
        .args(["stamp", file.to_str().unwrap()])
        .args(["--author", "Eve", "--timestamp", TS, "--no-revert-detection"])
        .write_stdin("a=2\n")
        .assert()
        .success()
        .stdout("a=2 // Eve | 2025-01-01, 10:00:00\n");
}

#[test]
fn unchanged_buffer_passes_through() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.c");
    fs::write(&file, "a=1\nb=2\n").unwrap();

    codestamp()
        .args(["stamp", file.to_str().unwrap()])
        .args(["--author", "Eve", "--timestamp", TS, "--no-revert-detection"])
        .write_stdin("a=1\nb=2\n")
        .assert()
        .success()
        .stdout("a=1\nb=2\n");
}

#[test]
fn python_file_is_stamped_above_the_line() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("script.py");
    fs::write(&file, "x = 1\n").unwrap();

    codestamp()
        .args(["stamp", file.to_str().unwrap()])
        .args(["--author", "Eve", "--timestamp", TS, "--no-revert-detection"])
        .write_stdin("x = 2\n")
        .assert()
        .success()
        .stdout("# Eve | 2025-01-01, 10:00:00\nx = 2\n");
}

#[test]
fn json_files_pass_through_untouched() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("package.json");
    fs::write(&file, "{\n}\n").unwrap();

    codestamp()
        .args(["stamp", file.to_str().unwrap()])
        .args(["--author", "Eve", "--timestamp", TS, "--no-revert-detection"])
        .write_stdin("{\n  \"name\": \"x\"\n}\n")
        .assert()
        .success()
        .stdout("{\n  \"name\": \"x\"\n}\n");
}

#[test]
fn new_file_gets_a_block_stamp() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("fresh.c");

    codestamp()
        .args(["stamp", file.to_str().unwrap()])
        .args(["--author", "Eve", "--timestamp", TS, "--no-revert-detection"])
        .write_stdin("line one\nline two\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("// Start Eve | 2025-01-01, 10:00:00"))
        .stdout(predicate::str::contains("// End Eve | 2025-01-01, 10:00:00"));
}

#[test]
fn write_flag_rewrites_the_file_in_place() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.c");
    fs::write(&file, "a=1\n").unwrap();

    codestamp()
        .args(["stamp", file.to_str().unwrap(), "--write"])
        .args(["--author", "Eve", "--timestamp", TS, "--no-revert-detection"])
        .write_stdin("a=2\n")
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "a=2 // Eve | 2025-01-01, 10:00:00\n"
    );
}

#[test]
fn invalid_timestamp_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.c");
    fs::write(&file, "a=1\n").unwrap();

    codestamp()
        .args(["stamp", file.to_str().unwrap()])
        .args(["--author", "Eve", "--timestamp", "yesterday-ish"])
        .write_stdin("a=2\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --timestamp"));
}

#[test]
fn reverted_content_is_restored_instead_of_restamped() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.c");
    fs::write(&file, "x=1\n").unwrap();
    init_repo(dir.path());
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "initial"]);

    // The buffer differs from HEAD only by a stale stamp: the engine must
    // strip it rather than refresh it.
    codestamp()
        .args(["stamp", file.to_str().unwrap()])
        .args(["--author", "Eve", "--timestamp", TS])
        .write_stdin("x=1 // Eve | 2024-12-31, 09:00:00\n")
        .assert()
        .success()
        .stdout("x=1\n");
}

#[test]
fn revert_detection_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.c");
    fs::write(&file, "x=1\n").unwrap();
    init_repo(dir.path());
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "initial"]);

    codestamp()
        .args(["stamp", file.to_str().unwrap(), "--no-revert-detection"])
        .args(["--author", "Eve", "--timestamp", TS])
        .write_stdin("x=1 // Eve | 2024-12-31, 09:00:00\n")
        .assert()
        .success()
        .stdout("x=1 // Eve | 2025-01-01, 10:00:00\n");
}

#[test]
fn outside_a_repository_stamping_still_works() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.c");
    fs::write(&file, "a=1\n").unwrap();

    // revert detection enabled but no repository: fail-open
    codestamp()
        .args(["stamp", file.to_str().unwrap()])
        .args(["--author", "Eve", "--timestamp", TS])
        .env("CODESTAMP_GIT_PATH", "/nonexistent/git")
        .write_stdin("a=2\n")
        .assert()
        .success()
        .stdout("a=2 // Eve | 2025-01-01, 10:00:00\n");
}

#[test]
fn author_name_is_persisted_and_read_back() {
    let home = TempDir::new().unwrap();

    codestamp()
        .env("HOME", home.path())
        .args(["author", "Prince Garg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Prince Garg"));

    codestamp()
        .env("HOME", home.path())
        .env_remove("CODESTAMP_AUTHOR")
        .args(["author"])
        .assert()
        .success()
        .stdout("Prince Garg\n");
}

#[test]
fn configured_author_is_used_for_stamps() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.c");
    fs::write(&file, "a=1\n").unwrap();

    codestamp()
        .env("HOME", home.path())
        .args(["author", "Prince Garg"])
        .assert()
        .success();

    codestamp()
        .env("HOME", home.path())
        .args(["stamp", file.to_str().unwrap()])
        .args(["--timestamp", TS, "--no-revert-detection"])
        .write_stdin("a=2\n")
        .assert()
        .success()
        .stdout("a=2 // Prince Garg | 2025-01-01, 10:00:00\n");
}

#[test]
fn config_command_prints_resolved_json() {
    let home = TempDir::new().unwrap();

    codestamp()
        .env("HOME", home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"author_name\""))
        .stdout(predicate::str::contains("\"revert_detection\": true"));
}
