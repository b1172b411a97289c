// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux-backed `SessionAdapter`. Every subprocess call is wrapped in
//! `tokio::time::timeout` so a wedged tmux server degrades into a timed-out
//! result instead of hanging the caller.

use super::{ControlKey, SessionAdapter, SessionError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Tmux-based session adapter.
#[derive(Clone)]
pub struct TmuxAdapter {
    timeout: Duration,
}

impl Default for TmuxAdapter {
    fn default() -> Self {
        Self {
            timeout: super::DEFAULT_TIMEOUT,
        }
    }
}

impl TmuxAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an adapter with a non-default subprocess timeout, mainly for
    /// tests that want to exercise the timeout path quickly.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn run(&self, id: &str, mut cmd: Command) -> Result<std::process::Output, SessionError> {
        match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(SessionError::CommandFailed(e.to_string())),
            Err(_) => Err(SessionError::Timeout(id.to_string())),
        }
    }
}

fn key_name(key: ControlKey) -> &'static str {
    match key {
        ControlKey::Up => "Up",
        ControlKey::Down => "Down",
        ControlKey::Left => "Left",
        ControlKey::Right => "Right",
        ControlKey::Enter => "Enter",
        ControlKey::CtrlC => "C-c",
        ControlKey::CtrlD => "C-d",
        ControlKey::CtrlT => "C-t",
        ControlKey::Escape => "Escape",
        ControlKey::Tab => "Tab",
    }
}

#[async_trait]
impl SessionAdapter for TmuxAdapter {
    async fn create(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
        cols: u32,
        rows: u32,
    ) -> Result<(), SessionError> {
        if !cwd.exists() {
            return Err(SessionError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        let existing = self
            .run(name, {
                let mut c = Command::new("tmux");
                c.args(["has-session", "-t", name]);
                c
            })
            .await;
        if matches!(existing, Ok(ref o) if o.status.success()) {
            return Err(SessionError::AlreadyExists(name.to_string()));
        }

        let mut tmux_cmd = Command::new("tmux");
        tmux_cmd
            .arg("new-session")
            .arg("-d")
            .arg("-s")
            .arg(name)
            .arg("-x")
            .arg(cols.to_string())
            .arg("-y")
            .arg(rows.to_string())
            .arg("-c")
            .arg(cwd);

        for (key, value) in env {
            tmux_cmd.arg("-e").arg(format!("{}={}", key, value));
        }

        tmux_cmd.arg(cmd);

        let output = self.run(name, tmux_cmd).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session = name, stderr = %stderr, "tmux new-session failed");
            return Err(SessionError::SpawnFailed(stderr.to_string()));
        }

        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(session = name, stderr = %stderr, "tmux new-session stderr (non-fatal)");
        }

        Ok(())
    }

    async fn send_text(&self, id: &str, text: &str) -> Result<(), SessionError> {
        // -l = literal mode (no key name interpretation); -- ends option parsing
        // so text starting with `-` isn't mistaken for a flag.
        let mut cmd = Command::new("tmux");
        cmd.args(["send-keys", "-t", id, "-l", "--", text]);
        let output = self.run(id, cmd).await?;

        if !output.status.success() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn send_control(&self, id: &str, key: ControlKey) -> Result<(), SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["send-keys", "-t", id, key_name(key)]);
        let output = self.run(id, cmd).await?;

        if !output.status.success() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn resize(&self, id: &str, cols: u32, rows: u32) -> Result<(), SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args([
            "resize-window",
            "-t",
            id,
            "-x",
            &cols.to_string(),
            "-y",
            &rows.to_string(),
        ]);
        let output = self.run(id, cmd).await?;

        if !output.status.success() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn capture(&self, id: &str, rows: Option<u32>) -> Result<String, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.arg("capture-pane").arg("-t").arg(id).arg("-p");
        if let Some(rows) = rows {
            cmd.arg("-S").arg(format!("-{}", rows));
        } else {
            cmd.arg("-S").arg("-");
        }
        let output = self.run(id, cmd).await?;

        if !output.status.success() {
            return Err(SessionError::NotFound(id.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn exists(&self, id: &str) -> Result<bool, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["has-session", "-t", id]);
        let output = self.run(id, cmd).await?;
        Ok(output.status.success())
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", id]);
        // Killing an already-dead session is not an error; ignore the result
        // beyond subprocess-level failures.
        let _ = self.run(id, cmd).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
