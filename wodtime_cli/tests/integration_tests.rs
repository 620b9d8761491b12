//! Integration tests for the wodtime binary.
//!
//! These tests verify end-to-end behavior including:
//! - Library validation
//! - Workout and exercise duration output
//! - Settings precedence between config file and library
//! - Writing durations back to the library

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LIBRARY: &str = r#"{
    "equipment": [
        { "id": "bench", "key_title": "bench", "priority": 1,
          "setup_duration": 5, "removal_duration": 3, "adjustment_duration": 0 },
        { "id": "strap_high", "key_title": "strap", "priority": 1,
          "setup_duration": 4, "removal_duration": 2, "adjustment_duration": 3 },
        { "id": "strap_low", "key_title": "strap", "priority": 2,
          "setup_duration": 4, "removal_duration": 2, "adjustment_duration": 3 }
    ],
    "exercises": [
        { "id": "bench_press", "name": "Bench Press", "secs_per_quantity_unit": 10,
          "effort_level": "low", "equipment": ["bench"] },
        { "id": "split_squat", "name": "Split Squat", "secs_per_quantity_unit": 10,
          "effort_level": "low", "right_left_separately": true },
        { "id": "strap_row", "name": "Strap Row", "secs_per_quantity_unit": 2,
          "effort_level": "medium", "equipment": ["strap_low"] },
        { "id": "strap_press", "name": "Strap Press", "secs_per_quantity_unit": 2,
          "effort_level": "medium", "equipment": ["strap_high"] }
    ],
    "workouts": [
        { "id": "full_body", "name": "Full Body", "exercises": [
            { "ordinal_number": 1, "circuit": "A", "primary_exercise": "bench_press",
              "quantity": 3, "sets": 1 },
            { "ordinal_number": 2, "circuit": "A", "primary_exercise": "split_squat",
              "quantity": 3, "sets": 1 }
        ] },
        { "id": "straps", "name": "Strap Circuit", "exercises": [
            { "ordinal_number": 1, "circuit": "A", "primary_exercise": "strap_row",
              "quantity": 10, "sets": 1 },
            { "ordinal_number": 2, "circuit": "A", "primary_exercise": "strap_press",
              "quantity": 10, "sets": 1 }
        ] }
    ]
}"#;

/// Helper to create a test directory with a library and an empty config
fn setup_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let library_path = temp_dir.path().join("library.json");
    fs::write(&library_path, LIBRARY).expect("Failed to write library");
    fs::write(temp_dir.path().join("config.toml"), "").expect("Failed to write config");
    (temp_dir, library_path)
}

/// Helper to get the path to the CLI binary
fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("wodtime"))
}

/// Helper to get the CLI with an isolated config file
fn cli(dir: &Path) -> Command {
    let mut cmd = bin();
    cmd.arg("--config").arg(dir.join("config.toml"));
    cmd
}

#[test]
fn test_cli_help() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout duration calculator"));
}

#[test]
fn test_check_valid_library() {
    let (temp_dir, library) = setup_test_dir();

    cli(temp_dir.path())
        .arg("check")
        .arg(&library)
        .assert()
        .success()
        .stdout(predicate::str::contains("Library is valid"))
        .stdout(predicate::str::contains("2 workouts"));
}

#[test]
fn test_check_reports_dangling_reference() {
    let (temp_dir, library) = setup_test_dir();
    let broken = LIBRARY.replace(
        r#""primary_exercise": "split_squat""#,
        r#""primary_exercise": "deadlift""#,
    );
    fs::write(&library, broken).unwrap();

    cli(temp_dir.path())
        .arg("check")
        .arg(&library)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown exercise 'deadlift'"));
}

#[test]
fn test_calc_prints_workout_totals() {
    let (temp_dir, library) = setup_test_dir();

    // 40 + 80 exercise time, 5 bench setup, 3 bench removal
    cli(temp_dir.path())
        .arg("calc")
        .arg(&library)
        .assert()
        .success()
        .stdout(predicate::str::contains("Full Body"))
        .stdout(predicate::str::contains("Total:     128.00s (2m 8s)"))
        .stdout(predicate::str::contains("Strap Circuit"));
}

#[test]
fn test_calc_explain_lists_transitions() {
    let (temp_dir, library) = setup_test_dir();

    cli(temp_dir.path())
        .arg("calc")
        .arg(&library)
        .arg("--explain")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup bench (+5.00s)"))
        .stdout(predicate::str::contains("remove bench (+3.00s)"))
        .stdout(predicate::str::contains("adjust strap_high (+3.00s)"));
}

#[test]
fn test_calc_single_workout() {
    let (temp_dir, library) = setup_test_dir();

    // (2 * 10 + 15) per exercise, 4 strap setup, 3 adjustment from low to high
    cli(temp_dir.path())
        .arg("calc")
        .arg(&library)
        .arg("--workout")
        .arg("straps")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:     77.00s"))
        .stdout(predicate::str::contains("Full Body").not());
}

#[test]
fn test_calc_unknown_workout_fails() {
    let (temp_dir, library) = setup_test_dir();

    cli(temp_dir.path())
        .arg("calc")
        .arg(&library)
        .arg("--workout")
        .arg("leg_day")
        .assert()
        .failure();
}

#[test]
fn test_calc_without_write_leaves_library_untouched() {
    let (temp_dir, library) = setup_test_dir();

    cli(temp_dir.path()).arg("calc").arg(&library).assert().success();

    assert_eq!(fs::read_to_string(&library).unwrap(), LIBRARY);
}

#[test]
fn test_calc_write_persists_durations() {
    let (temp_dir, library) = setup_test_dir();

    cli(temp_dir.path())
        .arg("calc")
        .arg(&library)
        .arg("--write")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved durations"));

    let content = fs::read_to_string(&library).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(json["workouts"][0]["duration"], 128.0);
    assert_eq!(json["workouts"][0]["exercises"][1]["duration"], 80.0);
    assert_eq!(json["workouts"][1]["duration"], 77.0);
    assert!(json["recalculated_at"].is_string());
}

#[test]
fn test_calc_write_runs_after_earlier_writer() {
    let (temp_dir, library) = setup_test_dir();

    for _ in 0..2 {
        cli(temp_dir.path())
            .arg("calc")
            .arg(&library)
            .arg("--write")
            .assert()
            .success();
    }

    assert!(temp_dir.path().join("library.json.lock").exists());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&library).unwrap()).unwrap();
    assert_eq!(json["workouts"][1]["duration"], 77.0);
}

#[test]
fn test_config_rest_override() {
    let (temp_dir, library) = setup_test_dir();
    fs::write(temp_dir.path().join("config.toml"), "[rest]\nlow = 0\n").unwrap();

    // 30 + 60 exercise time, 8 equipment
    cli(temp_dir.path())
        .arg("calc")
        .arg(&library)
        .arg("--workout")
        .arg("full_body")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:     98.00s"));
}

#[test]
fn test_library_settings_win_over_config() {
    let (temp_dir, library) = setup_test_dir();
    fs::write(temp_dir.path().join("config.toml"), "[rest]\nlow = 0\n").unwrap();
    let with_settings = LIBRARY.replacen('{', r#"{ "settings": { "low": 5 },"#, 1);
    fs::write(&library, with_settings).unwrap();

    // 35 + 70 exercise time, 8 equipment
    cli(temp_dir.path())
        .arg("calc")
        .arg(&library)
        .arg("--workout")
        .arg("full_body")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:     113.00s"));
}

#[test]
fn test_exercise_duration() {
    let (temp_dir, library) = setup_test_dir();

    cli(temp_dir.path())
        .arg("exercise")
        .arg(&library)
        .arg("split_squat")
        .arg("--quantity")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::contains("Split Squat"))
        .stdout(predicate::str::contains("80.00s"));
}

#[test]
fn test_exercise_unknown_fails() {
    let (temp_dir, library) = setup_test_dir();

    cli(temp_dir.path())
        .arg("exercise")
        .arg(&library)
        .arg("deadlift")
        .assert()
        .failure();
}

#[test]
fn test_missing_library_fails() {
    let (temp_dir, _) = setup_test_dir();

    cli(temp_dir.path())
        .arg("check")
        .arg(temp_dir.path().join("missing.json"))
        .assert()
        .failure();
}
