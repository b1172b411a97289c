// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::process::Command as StdCommand;
use tempfile::tempdir;
use yare::parameterized;

#[parameterized(
    simple = { "fix the login bug", "fix-the-login-bug" },
    punctuation = { "Add OAuth2.0 support!!", "add-oauth2-0-support" },
    collapses_repeats = { "too   many    spaces", "too-many-spaces" },
    leading_trailing = { "--weird--task--", "weird-task" },
)]
fn slugify_cases(input: &str, expected: &str) {
    assert_eq!(slugify(input), expected);
}

#[test]
fn slugify_caps_length() {
    let long = "x".repeat(200);
    assert!(slugify(&long).len() <= 60);
}

#[test]
fn branch_name_has_expected_shape() {
    assert_eq!(
        branch_name("agent", "a1b2c3", "Fix the thing"),
        "agent/a1b2c3/fix-the-thing"
    );
}

fn init_repo(dir: &Path) {
    let run = |args: &[&str]| {
        let status = StdCommand::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .status()
            .expect("git available");
        assert!(status.success());
    };
    run(&["init", "-q", "-b", "main"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "test"]);
    fs::write(dir.join("README.md"), "hello").unwrap();
    run(&["add", "."]);
    run(&["commit", "-q", "-m", "init"]);
}

#[tokio::test]
async fn provision_creates_worktree_and_scaffold_dirs() {
    let repo = tempdir().unwrap();
    init_repo(repo.path());
    let workspaces_root = tempdir().unwrap();
    let workspace = workspaces_root.path().join("workspace-provision-test");

    provision(repo.path(), &workspace, "agent/x1/test-task", "main")
        .await
        .unwrap();

    assert!(workspace.join(".claude").is_dir());
    assert!(workspace.join(".media").is_dir());
    assert!(workspace.join("README.md").is_file());

    teardown(repo.path(), &workspace, "agent/x1/test-task")
        .await
        .unwrap();
    assert!(!workspace.exists());
}

#[tokio::test]
async fn provision_is_idempotent_against_partial_workspace() {
    let repo = tempdir().unwrap();
    init_repo(repo.path());
    let workspace = repo.path().join("partial-ws");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(workspace.join("stale.txt"), "leftover").unwrap();

    provision(repo.path(), &workspace, "agent/x2/test-task", "main")
        .await
        .unwrap();

    assert!(!workspace.join("stale.txt").exists());
    assert!(workspace.join("README.md").is_file());

    teardown(repo.path(), &workspace, "agent/x2/test-task")
        .await
        .unwrap();
}

#[tokio::test]
async fn teardown_on_missing_workspace_does_not_error() {
    let repo = tempdir().unwrap();
    init_repo(repo.path());
    let workspace = repo.path().join("never-created");

    teardown(repo.path(), &workspace, "agent/x3/test-task")
        .await
        .unwrap();
}

#[test]
fn write_instructions_includes_defaults_project_and_capped_context_files() {
    let dir = tempdir().unwrap();
    let files: Vec<String> = (0..25).map(|i| format!("file{i}.rs")).collect();

    let path = write_instructions(dir.path(), "Global rules.", "Project-specific notes.", &files)
        .unwrap();

    let content = fs::read_to_string(path).unwrap();
    assert!(content.contains("Global rules."));
    assert!(content.contains("Project-specific notes."));
    assert!(content.contains("file0.rs"));
    assert!(content.contains("and 5 more"));
}

#[test]
fn write_hook_settings_registers_start_and_stop_callbacks() {
    let dir = tempdir().unwrap();
    let path = write_hook_settings(dir.path(), "a1b2c3", "http://127.0.0.1:8080/hooks").unwrap();

    let content = fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(value["hooks"]["SubagentStart"].is_array());
    assert!(value["hooks"]["SubagentStop"].is_array());
    assert!(content.contains("subagent_start"));
    assert!(content.contains("subagent_stop"));
    assert!(content.contains("a1b2c3"));
}

#[test]
fn ensure_media_dir_creates_directory() {
    let dir = tempdir().unwrap();
    let media = ensure_media_dir(dir.path()).unwrap();
    assert!(media.is_dir());
}

#[test]
fn copy_catalog_dir_replicates_whole_directory() {
    let src = tempdir().unwrap();
    fs::create_dir_all(src.path().join("nested")).unwrap();
    fs::write(src.path().join("a.md"), "a").unwrap();
    fs::write(src.path().join("nested/b.md"), "b").unwrap();

    let dest_root = tempdir().unwrap();
    let dest = copy_catalog_dir(src.path(), dest_root.path(), "catalog").unwrap();

    assert!(dest.join("a.md").is_file());
    assert!(dest.join("nested/b.md").is_file());
}
