//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a temporary data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `MINDGARDEN_HOME` pointed at `home`.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_mindgarden"))
        .env("MINDGARDEN_HOME", home)
        .env_remove("MINDGARDEN_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn add_habit(home: &Path, name: &str) -> String {
    let habit = run_json(home, &["habit", "add", name]);
    habit["id"].as_str().unwrap().to_string()
}

#[test]
fn test_habit_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    let id = add_habit(home.path(), "Meditate");

    let list = run_json(home.path(), &["habit", "list"]);
    let habits = list.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["id"], id.as_str());
    assert_eq!(habits[0]["name"], "Meditate");
}

#[test]
fn test_streak_skips_unlogged_today() {
    let home = tempfile::tempdir().unwrap();
    let id = add_habit(home.path(), "Run");

    for date in ["2024-01-01", "2024-01-02"] {
        run_json(home.path(), &["habit", "done", &id, "--date", date]);
    }

    let streak = run_json(home.path(), &["stats", "streak", &id, "--today", "2024-01-03"]);
    assert_eq!(streak["streak"], 2);
    assert_eq!(streak["completed_today"], false);
}

#[test]
fn test_rate_over_february() {
    let home = tempfile::tempdir().unwrap();
    let id = add_habit(home.path(), "Read");
    run_json(home.path(), &["habit", "done", &id, "--date", "2024-02-01"]);

    let rate = run_json(
        home.path(),
        &["stats", "rate", &id, "--from", "2024-02-01", "--to", "2024-02-29"],
    );
    assert_eq!(rate["completed"], 1);
    assert_eq!(rate["total"], 29);
    assert_eq!(rate["percentage"], 3);
}

#[test]
fn test_reversed_range_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let id = add_habit(home.path(), "Read");

    let (code, _, stderr) = run_cli(
        home.path(),
        &["stats", "rate", &id, "--from", "2024-02-10", "--to", "2024-02-01"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid date range"), "stderr: {stderr}");
}

#[test]
fn test_undo_compacts_entry() {
    let home = tempfile::tempdir().unwrap();
    let id = add_habit(home.path(), "Floss");

    let done = run_json(home.path(), &["habit", "done", &id, "--date", "2024-03-01"]);
    assert_eq!(done["entry"]["completed"], true);

    let undone = run_json(home.path(), &["habit", "undo", &id, "--date", "2024-03-01"]);
    assert!(undone["entry"].is_null());
}

#[test]
fn test_dashboard_excludes_archived() {
    let home = tempfile::tempdir().unwrap();
    let kept = add_habit(home.path(), "Walk");
    let archived = add_habit(home.path(), "Swim");
    run_json(home.path(), &["habit", "done", &kept, "--date", "2024-04-10"]);
    let (code, _, _) = run_cli(home.path(), &["habit", "archive", &archived]);
    assert_eq!(code, 0);

    let dashboard = run_json(home.path(), &["stats", "dashboard", "--today", "2024-04-10"]);
    let habits = dashboard["habits"].as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(dashboard["ranking"]["best"]["habit_id"], kept.as_str());
}

#[test]
fn test_dashboard_rates_match_week_and_month_with_short_history() {
    let home = tempfile::tempdir().unwrap();
    let id = add_habit(home.path(), "Journal");
    for d in 1..=10 {
        let date = format!("2024-04-{d:02}");
        run_json(home.path(), &["habit", "done", &id, "--date", &date]);
    }
    let (code, _, _) = run_cli(home.path(), &["config", "set", "dashboard.history_days", "3"]);
    assert_eq!(code, 0);

    let today = ["--today", "2024-04-10"];
    let month = run_json(home.path(), &["stats", "month", &id, today[0], today[1]]);
    let week = run_json(home.path(), &["stats", "week", &id, today[0], today[1]]);
    let dashboard = run_json(home.path(), &["stats", "dashboard", today[0], today[1]]);
    let summary = &dashboard["habits"][0];

    assert_eq!(month["completed"], 10);
    assert_eq!(summary["month"]["completed"], month["completed"]);
    assert_eq!(summary["month"]["total"], month["total"]);
    assert_eq!(summary["week"]["completed"], week["completed"]);
    assert_eq!(summary["week"]["percentage"], 100);
    assert_eq!(summary["streak"], 10);
}

#[test]
fn test_unknown_habit_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["stats", "streak", "missing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Habit not found"), "stderr: {stderr}");
}

#[test]
fn test_config_get_and_set() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "engine.streak_cap"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "365");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "engine.streak_cap", "30"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "engine.streak_cap"]);
    assert_eq!(stdout.trim(), "30");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "engine.streak_cap", "0"]);
    assert_ne!(code, 0);
}
