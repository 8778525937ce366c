use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn test_rules_lists_request_limit_rule() {
    Command::cargo_bin("compliance-ctl")
        .unwrap()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("request_limit_validation"))
        .stdout(predicate::str::contains("Deployment, ReplicaSet"));
}

#[test]
fn test_missing_config_file_fails() {
    Command::cargo_bin("compliance-ctl")
        .unwrap()
        .args(["--config", "/nonexistent/.compliance.toml", "rules"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_invalid_config_value_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"[sweep]\nlist_timeout_secs = 0\n").unwrap();

    Command::cargo_bin("compliance-ctl")
        .unwrap()
        .arg("--config")
        .arg(file.path())
        .arg("rules")
        .assert()
        .failure()
        .stderr(predicate::str::contains("list_timeout_secs"));
}

#[test]
fn test_zero_interval_override_rejected() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("compliance-ctl")
        .unwrap()
        .current_dir(dir.path())
        .env("HOME", "/nonexistent")
        .args(["run", "--sweep-interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval_secs"));
}
