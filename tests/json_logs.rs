//! `--json` console logs are one JSON object per line on stderr.

mod common;

use assert_cmd::Command;
use common::{roots, write_file};
use serde_json::Value;

#[test]
fn debug_json_logs_carry_structured_fields() {
    let (td, src, dst) = roots();
    write_file(&src.join("a.txt"), "a");
    let log_file = td.path().join("logs/merge.log");

    let out = Command::new(assert_cmd::cargo::cargo_bin!("merge_move"))
        .env("HOME", td.path())
        .env("XDG_CONFIG_HOME", td.path().join(".config"))
        .env_remove("MERGE_MOVE_CONFIG")
        .args(["--json", "--log-level", "debug", "--log-file"])
        .arg(&log_file)
        .arg(&src)
        .arg(&dst)
        .output()
        .unwrap();
    assert!(out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    let events: Vec<Value> = stderr
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("not json ({e}): {l}")))
        .collect();

    let started = events
        .iter()
        .find(|e| e["fields"]["message"] == "merge started")
        .expect("merge started event");
    assert_eq!(started["level"], "INFO");
    assert!(started["fields"]["workers"].as_u64().unwrap() >= 1);

    let moved = events
        .iter()
        .find(|e| e["fields"]["message"] == "moved")
        .expect("per-entry moved event");
    assert_eq!(moved["fields"]["kind"], "file");

    // The file layer received the same events.
    let file_contents = std::fs::read_to_string(&log_file).unwrap();
    assert!(file_contents.contains("merge finished"));
}
