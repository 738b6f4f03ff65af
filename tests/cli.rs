//! End-to-end tests for the bugbench binary.
//!
//! Spawns the binary, captures stdout, and checks the JSON it prints.

use std::fs;
use std::process::{Command, Output};

use serde_json::Value;

fn run_bugbench(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_bugbench");
    Command::new(exe)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to start bugbench")
}

fn run_json(args: &[&str]) -> Value {
    let output = run_bugbench(args);
    assert!(
        output.status.success(),
        "bugbench {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn marathon_with_zero_trials_reports_zeroes() {
    let v = run_json(&["marathon", "--trials", "0", "--seed", "1"]);
    assert_eq!(v["seed"], 1);
    assert_eq!(v["result"]["total_trials"], 0);
    assert_eq!(v["result"]["completed"], 0);
    assert_eq!(v["result"]["terminated"], 0);
    assert_eq!(v["average_steps"], 0.0);
    assert_eq!(v["efficiency"], 0.0);
    assert_eq!(v["bug"], "bug2");
    assert!(v["rival"].is_null());
}

#[test]
fn entropy_seeded_marathon_reports_its_seed() {
    let first = run_json(&["marathon", "--trials", "3", "--seed", "0", "--step-cap", "300"]);
    let seed = first["seed"].as_u64().expect("report should carry the seed");
    let replay = run_json(&[
        "marathon", "--trials", "3", "--seed", &seed.to_string(), "--step-cap", "300",
    ]);
    assert_eq!(replay["seed"], seed);
    assert_eq!(first["result"], replay["result"]);
}

#[test]
fn single_run_reports_scenario_and_stats() {
    let v = run_json(&["single", "--bug", "bug1", "--seed", "7", "--step-cap", "500"]);
    assert_eq!(v["seed"], 7);
    let optimal = v["scenario"]["optimal_len"].as_u64().unwrap();
    assert!(optimal >= 10);

    let bugs = v["bugs"].as_array().unwrap();
    assert_eq!(bugs.len(), 1);
    assert_eq!(bugs[0]["kind"], "bug1");
    let stats = &bugs[0]["stats"];
    assert_eq!(stats["optimal_len"].as_u64(), Some(optimal));
    assert!(stats["path_len"].as_u64().unwrap() >= 1);
    let state = stats["state"].as_str().unwrap();
    assert!(state == "FINISHED" || state == "RUNNING", "state {}", state);
}

#[test]
fn single_run_is_reproducible() {
    let a = run_json(&["single", "--seed", "99", "--step-cap", "300"]);
    let b = run_json(&["single", "--seed", "99", "--step-cap", "300"]);
    assert_eq!(a, b);
}

#[test]
fn compare_reports_two_bugs_on_one_scenario() {
    let v = run_json(&["compare", "--seed", "3", "--step-cap", "400"]);
    let bugs = v["bugs"].as_array().unwrap();
    assert_eq!(bugs.len(), 2);
    assert_eq!(bugs[0]["kind"], "bug2");
    assert_eq!(bugs[1]["kind"], "bug1");
    assert!(v["ticks"].as_u64().unwrap() <= 400);
}

#[test]
fn marathon_writes_one_record_per_trial() {
    let path = std::env::temp_dir().join(format!("bugbench-cli-{}.jsonl", std::process::id()));
    let path_str = path.to_str().unwrap();
    let v = run_json(&[
        "marathon", "--trials", "4", "--seed", "5", "--bug", "bug1", "--rival", "bug2",
        "--threads", "2", "--output", path_str,
    ]);
    assert_eq!(v["result"]["total_trials"], 4);
    assert_eq!(v["rival"], "bug2");

    let text = fs::read_to_string(&path).unwrap();
    let _ = fs::remove_file(&path);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    for line in lines {
        let record: Value = serde_json::from_str(line).unwrap();
        assert!(record["optimal_len"].as_u64().unwrap() >= 10);
        assert_eq!(record["bug"]["kind"], "bug1");
        assert_eq!(record["rival"]["kind"], "bug2");
    }
}

#[test]
fn unknown_bug_is_rejected() {
    let output = run_bugbench(&["single", "--bug", "bug9"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bug9"));
}

#[test]
fn invalid_config_fails_cleanly() {
    let output = run_bugbench(&["marathon", "--trials", "1", "--threads", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("threads"));
}
