//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bandmark() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("bandmark").unwrap()
}

#[test]
fn validate_example_test_set() {
    bandmark()
        .arg("validate")
        .arg("--test")
        .arg("../../testsets/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("13 questions"))
        .stdout(predicate::str::contains("All test sets valid"));
}

#[test]
fn validate_directory() {
    bandmark()
        .arg("validate")
        .arg("--test")
        .arg("../../testsets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coastal Archaeology"));
}

#[test]
fn validate_nonexistent_file() {
    bandmark()
        .arg("validate")
        .arg("--test")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_example_per_question() {
    let dir = TempDir::new().unwrap();

    bandmark()
        .arg("score")
        .arg("--test")
        .arg("../../testsets/example.toml")
        .arg("--answers")
        .arg("../../testsets/example-answers.json")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("54%"))
        .stderr(predicate::str::contains("Results saved to:"));

    let saved: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].extension().unwrap(), "json");
}

#[test]
fn score_example_partial_credit() {
    let dir = TempDir::new().unwrap();

    bandmark()
        .arg("score")
        .arg("--test")
        .arg("../../testsets/example.toml")
        .arg("--answers")
        .arg("../../testsets/example-answers.json")
        .arg("--partial-credit")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("70%"));
}

#[test]
fn score_writes_all_formats() {
    let dir = TempDir::new().unwrap();

    bandmark()
        .arg("score")
        .arg("--test")
        .arg("../../testsets/example.toml")
        .arg("--answers")
        .arg("../../testsets/example-answers.json")
        .arg("--format")
        .arg("all")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success();

    let mut extensions: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| {
            e.unwrap()
                .path()
                .extension()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    extensions.sort();
    assert_eq!(extensions, vec!["csv", "html", "json"]);
}

#[test]
fn score_missing_answers_file() {
    bandmark()
        .arg("score")
        .arg("--test")
        .arg("../../testsets/example.toml")
        .arg("--answers")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    bandmark()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created bandmark.toml"))
        .stdout(predicate::str::contains("Created testsets/example.toml"))
        .stdout(predicate::str::contains(
            "Created testsets/example-answers.json",
        ));

    // The generated starter files must validate cleanly.
    bandmark()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--test")
        .arg("testsets/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All test sets valid"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    bandmark()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    bandmark()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
