//! Integration tests for the gymcfg CLI against the bundled task documents.
//!
//! Each test runs the real binary from a scratch directory so no user
//! settings leak in.

use std::process::{Command, Output};

const CONFIG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/task");
const TASK: &str = "FactoryTaskNutBoltPick_MARL2";

fn run_gymcfg(args: &[&str]) -> Output {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    Command::new(env!("CARGO_BIN_EXE_gymcfg"))
        .current_dir(home.path())
        .env("HOME", home.path())
        .args(["-C", CONFIG_DIR])
        .args(args)
        .output()
        .expect("Failed to execute gymcfg")
}

fn run_task(cmd: &str, extra: &[&str]) -> Output {
    let mut args = vec![cmd, TASK, "--scope", "physics_engine=physx"];
    args.extend_from_slice(extra);
    run_gymcfg(&args)
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "gymcfg failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_resolve_prints_yaml() {
    let output = run_task("resolve", &[]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let tree: serde_yaml::Value = serde_yaml::from_str(&stdout).expect("stdout should be valid YAML");
    assert_eq!(tree["env"]["numEnvs"].as_i64(), Some(128));
    assert_eq!(tree["env"]["numActions"].as_i64(), Some(24));
    assert_eq!(tree["physics_engine"].as_str(), Some("physx"));
    assert!(tree.get("defaults").is_none());
}

#[test]
fn test_resolve_json_with_scope_and_override() {
    let output = run_task(
        "resolve",
        &["--scope", "num_envs=64", "--set", "rl.max_episode_length=200", "--format", "json"],
    );
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let tree: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(tree["env"]["numEnvs"], 64);
    assert_eq!(tree["rl"]["max_episode_length"], 200);
}

#[test]
fn test_resolve_without_scope_fails() {
    let output = run_gymcfg(&["resolve", TASK]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to resolve"),
        "Expected resolve failure in stderr, got: {}",
        stderr
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_validate_clean_task() {
    let output = run_task("validate", &[]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("is valid"), "got: {}", stdout);
}

#[test]
fn test_validate_bad_override_fails() {
    let output = run_task("validate", &["--set", "ctrl.joint_space_id.joint_prop_gains=[40, 40]"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ctrl.joint_space_id.joint_prop_gains"),
        "Expected the failing path in stderr, got: {}",
        stderr
    );
}

#[test]
fn test_validate_json_reports_findings() {
    let output = run_task("validate", &["--json", "--set", "ctrl.ctrl_type=pid"]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(report["valid"], false);

    let findings = report["findings"].as_array().expect("findings should be an array");
    assert!(
        findings
            .iter()
            .any(|f| f["path"] == "ctrl.ctrl_type" && f["kind"] == "invalid_enum"),
        "got: {}",
        stdout
    );
}

#[test]
fn test_validate_json_lists_layers() {
    let output = run_task("validate", &["--json"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(report["valid"], true);
    assert_eq!(report["layers"], serde_json::json!(["FactoryBase", TASK]));
}

#[test]
fn test_controller_prints_selected_branch() {
    let output = run_task("controller", &["--format", "json"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let controller: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(controller["ctrl_type"], "joint_space_id");
    assert_eq!(controller["do_inertial_comp"], true);
    assert_eq!(controller["num_envs"], 128);
}

#[test]
fn test_schema_section() {
    let output = run_gymcfg(&["schema", "ctrl"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("joint_space_id"), "got: {}", stdout);
}

#[test]
fn test_schema_unknown_section_fails() {
    let output = run_gymcfg(&["schema", "no_such_section"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no_such_section"), "got: {}", stderr);
}

#[test]
fn test_unknown_task_fails() {
    let output = run_gymcfg(&["resolve", "FactoryTaskMissing"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FactoryTaskMissing"), "got: {}", stderr);
}
