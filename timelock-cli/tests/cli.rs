use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn timelock(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("timelock").unwrap();
    cmd.current_dir(dir).env_remove("TIMELOCK_CONFIG").env("RUST_LOG", "warn");
    cmd
}

fn solved_puzzle(dir: &Path, t: &str) {
    timelock(dir).args(["setup", "--bits", "64"]).assert().success();
    timelock(dir).args(["generate", "-t", t]).assert().success();
    timelock(dir).arg("solve").assert().success();
}

#[test]
fn setup_generate_solve_verify() {
    let dir = TempDir::new().unwrap();
    timelock(dir.path())
        .args(["setup", "--bits", "64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("64 bits"));
    assert!(dir.path().join("modulus.json").exists());

    timelock(dir.path())
        .args(["generate", "-t", "64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T = 64"));

    timelock(dir.path())
        .arg("verify")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("not been solved"));

    timelock(dir.path())
        .arg("solve")
        .assert()
        .success()
        .stdout(predicate::str::contains("6 checkpoints"));

    timelock(dir.path()).arg("verify").assert().success().stdout(predicate::str::contains("valid"));
}

#[test]
fn tampered_delay_is_rejected() {
    let dir = TempDir::new().unwrap();
    solved_puzzle(dir.path(), "32");

    let path = dir.path().join("puzzle.json");
    let mut puzzle: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    puzzle["delay"] = serde_json::json!(64);
    fs::write(&path, serde_json::to_vec(&puzzle).unwrap()).unwrap();

    timelock(dir.path())
        .arg("verify")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("rejected"));
}

#[test]
fn non_power_of_two_delay_fails() {
    let dir = TempDir::new().unwrap();
    timelock(dir.path()).args(["setup", "--bits", "64"]).assert().success();
    timelock(dir.path())
        .args(["generate", "-t", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("power of two"));
}

#[test]
fn missing_modulus_file_fails() {
    let dir = TempDir::new().unwrap();
    timelock(dir.path())
        .args(["generate", "--modulus", "absent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn config_supplies_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = dir.path().join("timelock.toml");
    fs::write(&cfg, "security_bits = 48\ndelay = 16\nlog_level = \"warn\"\n").unwrap();

    timelock(dir.path())
        .arg("--config")
        .arg(&cfg)
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains("48 bits"));
    timelock(dir.path())
        .arg("--config")
        .arg(&cfg)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("T = 16"));
    timelock(dir.path()).arg("solve").assert().success();
    timelock(dir.path()).arg("verify").assert().success();
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "delay = 3\n").unwrap();
    timelock(dir.path())
        .arg("--config")
        .arg(&cfg)
        .arg("setup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("power of two"));
}

#[test]
fn calibrate_prints_power_of_two() {
    let dir = TempDir::new().unwrap();
    timelock(dir.path()).args(["setup", "--bits", "64"]).assert().success();
    let out = timelock(dir.path())
        .args(["calibrate", "--target-ms", "5"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let t: u64 = String::from_utf8(out).unwrap().trim().parse().unwrap();
    assert_eq!(t.count_ones(), 1);
    assert!(t >= 1 << 10);
}
