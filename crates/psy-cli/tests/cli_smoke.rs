use std::process::Command;

use psy_ledger::{tags, Ledger};

fn psy_run() -> Command {
    Command::new(env!("CARGO_BIN_EXE_psy-run"))
}

#[test]
fn sequence_prints_every_repetition() {
    let output = psy_run()
        .args(["sequence", "--conditions", "a,b,c", "--reps", "4", "--seed", "3"])
        .output()
        .expect("run psy-run sequence");
    assert!(output.status.success(), "sequence command failed");
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 12);
    for name in ["a", "b", "c"] {
        assert_eq!(lines.iter().filter(|line| **line == name).count(), 4);
    }
    assert!(lines.windows(2).all(|pair| pair[0] != pair[1]));
}

#[test]
fn staircase_emits_summary_json() {
    let output = psy_run()
        .args(["staircase", "--threshold", "4", "--seed", "8", "--preset", "practice"])
        .output()
        .expect("run psy-run staircase");
    assert!(output.status.success(), "staircase command failed");
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(summary["finished"], serde_json::Value::Bool(true));
    assert!(summary["reversals"].as_array().map_or(0, Vec::len) >= 5);
}

#[test]
fn ledger_dump_filters_by_tag() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut ledger = Ledger::open(dir.path(), "cli01").expect("ledger");
    ledger.write("room jnd:", tags::TIME).expect("write");
    ledger.write(&3.5, "jnd room").expect("write");
    drop(ledger);

    let output = psy_run()
        .args(["ledger", "--subject", "cli01", "--tag", "jnd room", "--results"])
        .arg(dir.path())
        .output()
        .expect("run psy-run ledger");
    assert!(output.status.success(), "ledger command failed");
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let entry: serde_json::Value = serde_json::from_str(lines[0]).expect("json");
    assert_eq!(entry["payload"], serde_json::json!(3.5));
    assert_eq!(entry["seq"], serde_json::json!(1));
}

#[test]
fn invalid_subject_fails() {
    let output = psy_run()
        .args(["ledger", "--subject", "../etc"])
        .output()
        .expect("run psy-run ledger");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("error: invalid configuration:"), "stderr: {stderr}");
    assert!(stderr.contains("(code: subject-invalid)"), "stderr: {stderr}");
    assert!(stderr.contains("subject=../etc"), "stderr: {stderr}");
    assert!(!stderr.contains("ErrorInfo {"), "stderr: {stderr}");
}
