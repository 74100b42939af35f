use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Command with plain output, an isolated config home and the given database
fn tb_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tb").expect("Failed to find tb binary");
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env("XDG_DATA_HOME", temp_dir.path().join("data"))
        .arg("--no-color")
        .arg("--database-file")
        .arg(temp_dir.path().join("cli_test.db"));
    cmd
}

fn add(temp_dir: &TempDir, description: &str, date: &str, start: &str, end: &str) {
    tb_cmd(temp_dir)
        .args(["add", description, "--date", date, "--start", start, "--end", end])
        .assert()
        .success();
}

fn write_config(dir: &Path, contents: &str) -> String {
    let path = dir.join("timeblock.toml");
    std::fs::write(&path, contents).expect("Failed to write config");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_add_task() {
    let temp_dir = create_cli_test_environment();

    tb_cmd(&temp_dir)
        .args([
            "add",
            "Write report",
            "--category",
            "deep",
            "--date",
            "2025-01-20",
            "--start",
            "09:00",
            "--end",
            "10:30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task with ID: 1"))
        .stdout(predicate::str::contains("Write report"));
}

#[test]
fn test_cli_add_rejects_invalid_fields() {
    let temp_dir = create_cli_test_environment();

    tb_cmd(&temp_dir)
        .args(["add", "Write", "-c", "medium", "-s", "09:00", "-e", "10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid category 'medium'"));

    tb_cmd(&temp_dir)
        .args(["add", "Write", "-s", "10:00", "-e", "09:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be after start time"));
}

#[test]
fn test_cli_add_rejects_overlap() {
    let temp_dir = create_cli_test_environment();
    add(&temp_dir, "Standup", "2025-01-20", "09:00", "10:00");

    tb_cmd(&temp_dir)
        .args(["add", "Write", "-d", "2025-01-20", "-s", "09:30", "-e", "10:30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlaps 'Standup'"));
}

#[test]
fn test_cli_day_view() {
    let temp_dir = create_cli_test_environment();
    add(&temp_dir, "Email", "2025-01-20", "13:00", "13:30");
    add(&temp_dir, "Write", "2025-01-20", "09:00", "11:00");

    tb_cmd(&temp_dir)
        .args(["day", "--date", "2025-01-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Monday 2025-01-20"))
        .stdout(predicate::str::is_match("(?s)09:00-11:00.*13:00-13:30").unwrap());
}

#[test]
fn test_cli_empty_day() {
    let temp_dir = create_cli_test_environment();

    tb_cmd(&temp_dir)
        .args(["day", "--date", "2025-01-21"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks scheduled."));

    tb_cmd(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks scheduled."));
}

#[test]
fn test_cli_week_and_window() {
    let temp_dir = create_cli_test_environment();
    add(&temp_dir, "Write", "2025-01-22", "09:00", "11:00");
    add(&temp_dir, "Earlier", "2025-01-14", "09:00", "10:00");

    tb_cmd(&temp_dir)
        .args(["week", "--date", "2025-01-22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Week of 2025-01-20 to 2025-01-26"))
        .stdout(predicate::str::contains("Most deep work: **wednesday**"))
        .stdout(predicate::str::contains("Earlier").not());

    tb_cmd(&temp_dir)
        .args(["week", "--date", "2025-01-22", "--window"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Previous: week of 2025-01-13 (1 task(s)",
        ))
        .stdout(predicate::str::contains("Next: week of 2025-01-27 (0 task(s)"));
}

#[test]
fn test_cli_cancel_and_postpone() {
    let temp_dir = create_cli_test_environment();
    add(&temp_dir, "Write", "2025-01-20", "09:00", "10:00");
    add(&temp_dir, "Review", "2025-01-20", "11:00", "12:00");

    tb_cmd(&temp_dir)
        .args(["cancel", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status: cancelled"));

    tb_cmd(&temp_dir)
        .args(["cancel", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot cancel task 1"));

    tb_cmd(&temp_dir)
        .args([
            "postpone", "2", "--date", "2025-01-21", "--start", "14:00", "--end", "15:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Postponed task 2 to 2025-01-21 14:00-15:00 as task 3"));

    tb_cmd(&temp_dir)
        .args(["day", "--date", "2025-01-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("~~Write~~"))
        .stdout(predicate::str::contains("~~Review~~"));
}

#[test]
fn test_cli_outcome() {
    let temp_dir = create_cli_test_environment();
    add(&temp_dir, "Old block", "2020-01-06", "09:00", "10:00");
    add(&temp_dir, "Future block", "2099-01-05", "09:00", "10:00");

    tb_cmd(&temp_dir)
        .args(["outcome", "1", "over"])
        .assert()
        .success()
        .stdout(predicate::str::contains("outcome: over"));

    tb_cmd(&temp_dir)
        .args(["outcome", "2", "on_time"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("before it has ended"));
}

#[test]
fn test_cli_edit_and_move() {
    let temp_dir = create_cli_test_environment();
    add(&temp_dir, "Write", "2025-01-20", "09:00", "10:00");
    add(&temp_dir, "Email", "2025-01-20", "10:00", "10:30");

    tb_cmd(&temp_dir)
        .args(["edit", "1", "Write chapter two"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write chapter two"));

    tb_cmd(&temp_dir)
        .args(["move", "1", "--start", "09:30", "--end", "10:15"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlaps 'Email'"));

    tb_cmd(&temp_dir)
        .args(["move", "1", "--start", "08:00", "--end", "09:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("time: 08:00-09:30"));

    tb_cmd(&temp_dir)
        .args(["edit", "9", "Nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task with ID 9 not found"));
}

#[test]
fn test_cli_next_slot() {
    let temp_dir = create_cli_test_environment();

    tb_cmd(&temp_dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Next available slot:"));
}

#[test]
fn test_cli_config_file() {
    let temp_dir = create_cli_test_environment();
    let config = write_config(
        temp_dir.path(),
        "workdays = [\"saturday\"]\nday_start = \"10:00\"\nday_end = \"14:00\"\n",
    );

    tb_cmd(&temp_dir)
        .args(["--config", &config, "next"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saturday"))
        .stdout(predicate::str::contains("working day ends 14:00"));

    let broken = write_config(temp_dir.path(), "workdays = [\"someday\"]\n");
    tb_cmd(&temp_dir)
        .args(["--config", &broken, "next"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid workday configuration"));
}

#[test]
fn test_cli_plan_requires_api_key() {
    let temp_dir = create_cli_test_environment();
    let config = write_config(
        temp_dir.path(),
        "[llm]\napi_key_env = \"TIMEBLOCK_TEST_MISSING_KEY\"\n",
    );

    tb_cmd(&temp_dir)
        .env_remove("TIMEBLOCK_TEST_MISSING_KEY")
        .args(["--config", &config, "plan", "Two hours of writing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TIMEBLOCK_TEST_MISSING_KEY"));
}
