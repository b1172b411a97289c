// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace Provisioner: isolates each agent in its own git worktree and
//! writes the pre-spawn files every agent workspace needs before the
//! session starts.

use crate::subprocess::{run_with_timeout, GIT_WORKTREE_TIMEOUT};
use serde_json::json;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("git worktree command failed: {0}")]
    GitFailed(String),
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
}

/// Cap on the number of context files listed in the synthesized
/// instructions document.
const CONTEXT_FILE_LISTING_CAP: usize = 20;

/// Build `{prefix}/{id}/{slug(task)}`.
pub fn branch_name(prefix: &str, id: &str, task: &str) -> String {
    format!("{prefix}/{id}/{}", slugify(task))
}

/// Lower-case, replace non-alphanumerics with `-`, collapse repeats, cap
/// length at 60 characters.
pub fn slugify(text: &str) -> String {
    const MAX_LEN: usize = 60;
    let mut out = String::new();
    let mut last_was_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }
    let trimmed = out.trim_matches('-');
    let capped: String = trimmed.chars().take(MAX_LEN).collect();
    capped.trim_matches('-').to_string()
}

async fn run_git(repo_path: &Path, args: &[&str], description: &str) -> Result<(), ProvisionError> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(repo_path).args(args);
    let output = run_with_timeout(cmd, GIT_WORKTREE_TIMEOUT, description)
        .await
        .map_err(ProvisionError::GitFailed)?;
    if !output.status.success() {
        return Err(ProvisionError::GitFailed(format!(
            "{}: {}",
            description,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(())
}

/// Provision an isolated working copy at `workspace_path`, on a new branch
/// `branch` forked from `default_branch`. Idempotent: a previously
/// partially created workspace at the same path is cleaned up before retry.
pub async fn provision(
    repo_path: &Path,
    workspace_path: &Path,
    branch: &str,
    default_branch: &str,
) -> Result<(), ProvisionError> {
    if workspace_path.exists() {
        let _ = teardown(repo_path, workspace_path, branch).await;
    }

    if let Some(parent) = workspace_path.parent() {
        fs::create_dir_all(parent)?;
    }

    run_git(
        repo_path,
        &[
            "worktree",
            "add",
            "-b",
            branch,
            &workspace_path.to_string_lossy(),
            default_branch,
        ],
        "git worktree add",
    )
    .await?;

    fs::create_dir_all(workspace_path.join(".claude"))?;
    fs::create_dir_all(workspace_path.join(".media"))?;

    Ok(())
}

/// Remove the isolated working copy, then prune its branch metadata.
/// Best-effort: a missing worktree or branch is not an error (supports
/// idempotent retry and repeat teardown calls).
pub async fn teardown(
    repo_path: &Path,
    workspace_path: &Path,
    branch: &str,
) -> Result<(), ProvisionError> {
    let _ = run_git(
        repo_path,
        &["worktree", "remove", &workspace_path.to_string_lossy(), "--force"],
        "git worktree remove",
    )
    .await;
    if workspace_path.exists() {
        fs::remove_dir_all(workspace_path)?;
    }
    let _ = run_git(repo_path, &["worktree", "prune"], "git worktree prune").await;
    let _ = run_git(repo_path, &["branch", "-D", branch], "git branch -D").await;
    Ok(())
}

/// Synthesize the project-level instructions document from global defaults,
/// project-specific text, and a capped listing of declared context files.
pub fn write_instructions(
    workspace_path: &Path,
    defaults_text: &str,
    project_text: &str,
    context_files: &[String],
) -> io::Result<PathBuf> {
    let mut doc = String::new();
    if !defaults_text.trim().is_empty() {
        doc.push_str(defaults_text.trim());
        doc.push_str("\n\n");
    }
    if !project_text.trim().is_empty() {
        doc.push_str(project_text.trim());
        doc.push_str("\n\n");
    }
    if !context_files.is_empty() {
        doc.push_str("## Context files\n\n");
        for file in context_files.iter().take(CONTEXT_FILE_LISTING_CAP) {
            doc.push_str(&format!("- {file}\n"));
        }
        if context_files.len() > CONTEXT_FILE_LISTING_CAP {
            doc.push_str(&format!(
                "- ... and {} more\n",
                context_files.len() - CONTEXT_FILE_LISTING_CAP
            ));
        }
    }

    let path = workspace_path.join("AGENT_INSTRUCTIONS.md");
    fs::write(&path, doc)?;
    Ok(path)
}

/// Write `.claude/settings.local.json` registering the sub-agent start/stop
/// hooks, each POSTing `{agent_id, event}` to `hook_endpoint`.
pub fn write_hook_settings(
    workspace_path: &Path,
    agent_id: &str,
    hook_endpoint: &str,
) -> io::Result<PathBuf> {
    let settings = json!({
        "hooks": {
            "SubagentStart": [{
                "matcher": "",
                "hooks": [{
                    "type": "command",
                    "command": format!(
                        "curl -s -X POST {hook_endpoint} -H 'content-type: application/json' -d '{{\"agent_id\":\"{agent_id}\",\"event\":\"subagent_start\"}}'"
                    ),
                }],
            }],
            "SubagentStop": [{
                "matcher": "",
                "hooks": [{
                    "type": "command",
                    "command": format!(
                        "curl -s -X POST {hook_endpoint} -H 'content-type: application/json' -d '{{\"agent_id\":\"{agent_id}\",\"event\":\"subagent_stop\"}}'"
                    ),
                }],
            }],
        }
    });

    let dir = workspace_path.join(".claude");
    fs::create_dir_all(&dir)?;
    let path = dir.join("settings.local.json");
    fs::write(
        &path,
        serde_json::to_string_pretty(&settings).unwrap_or_else(|_| "{}".to_string()),
    )?;
    Ok(path)
}

/// Ensure the staged-inbound-media directory exists.
pub fn ensure_media_dir(workspace_path: &Path) -> io::Result<PathBuf> {
    let path = workspace_path.join(".media");
    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Replicate a catalog/skill directory into the workspace, whole-directory.
pub fn copy_catalog_dir(src: &Path, workspace_path: &Path, dest_name: &str) -> io::Result<PathBuf> {
    let dest = workspace_path.join(dest_name);
    copy_dir_recursive(src, &dest)?;
    Ok(dest)
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let dest_path = dest.join(entry.file_name());
        if ty.is_dir() {
            copy_dir_recursive(&entry.path(), &dest_path)?;
        } else {
            fs::copy(entry.path(), &dest_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
