//! Integration tests for settings loading from the CLI.

use std::fs;
use std::process::Command;

const TASK_DOC: &str = r#"
name: Tiny
physics_engine: physx
env:
  numEnvs: 4
"#;

fn write_settings(dir: &std::path::Path, contents: &str) {
    let settings_dir = dir.join(".gymcfg");
    fs::create_dir_all(&settings_dir).expect("Failed to create .gymcfg dir");
    fs::write(settings_dir.join("config.toml"), contents).expect("Failed to write settings");
}

#[test]
fn test_warning_on_invalid_settings() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_settings(temp_dir.path(), "invalid toml [[[");

    let output = Command::new(env!("CARGO_BIN_EXE_gymcfg"))
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .args(["resolve", "Tiny", "--no-validate"])
        .output()
        .expect("Failed to execute gymcfg");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Warning: Could not load settings"),
        "Expected warning in stderr, got: {}",
        stderr
    );
    assert!(
        stderr.contains("Tip: Check"),
        "Expected tip about settings files in stderr, got: {}",
        stderr
    );
}

#[test]
fn test_search_paths_from_settings() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tasks = temp_dir.path().join("tasks");
    fs::create_dir_all(&tasks).expect("Failed to create task dir");
    fs::write(tasks.join("Tiny.yaml"), TASK_DOC).expect("Failed to write task");
    write_settings(
        temp_dir.path(),
        &format!("[search]\npaths = [{:?}]\n", tasks.display().to_string()),
    );

    let output = Command::new(env!("CARGO_BIN_EXE_gymcfg"))
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .args(["resolve", "Tiny", "--no-validate", "--format", "json"])
        .output()
        .expect("Failed to execute gymcfg");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(
        !stderr.contains("Warning: Could not load settings"),
        "Unexpected settings warning in stderr: {}",
        stderr
    );

    let tree: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("stdout should be valid JSON");
    assert_eq!(tree["env"]["numEnvs"], 4);
}
