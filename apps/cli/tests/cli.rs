//! ikarm-cli 端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("ikarm-cli").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// 写入配置文件，避免读到用户目录下的配置
fn config_file(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_show_merges_defaults() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "[controller]\nik_step_size = 4\n");
    cli()
        .args(["config", "show", "--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("ik_step_size = 4"))
        .stdout(predicate::str::contains("target_def = \"TARGET\""));
}

#[test]
fn test_config_init_then_refuse() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sub").join("config.toml");
    let path = path.to_string_lossy().into_owned();

    cli().args(["config", "init", "--config", &path]).assert().success();
    cli()
        .args(["config", "init", "--config", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_devices_lists_arm_motors() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "");
    cli()
        .args(["devices", "--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("shoulder_pan"))
        .stdout(predicate::str::contains("6 motors"));
}

#[test]
fn test_run_prints_json_stats() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "[world.motion]\nenabled = false\n");
    let output = cli()
        .args(["run", "--duration", "1", "--stats-json", "--config", &path])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["ticks"], 7);
    assert_eq!(stats["skipped"], 6);
}

#[test]
fn test_run_without_target_spawns_one() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "");
    cli()
        .args(["run", "--duration", "0.5", "--no-target", "--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("ticks"))
        .stderr(predicate::str::contains("No TARGET defined. Spawning TARGET sphere"));
}

#[test]
fn test_run_fails_on_outdated_solver() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "[controller]\nmin_solver_version = \"99.0\"\n");
    cli()
        .args(["run", "--duration", "1", "--config", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IK solver check failed"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    cli()
        .args(["run", "--config", &path.to_string_lossy()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
