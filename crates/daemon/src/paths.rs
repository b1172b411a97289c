// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the daemon's on-disk layout: one state directory holding the
//! single-instance lock, the log file, and the SQLite store, following
//! the same `OJ_STATE_DIR` / `XDG_STATE_HOME` / `~/.local/state` priority
//! chain the teacher's daemon used, renamed to this project's own
//! environment variable.

use std::path::PathBuf;

/// On-disk paths the daemon process owns, rooted at one state directory.
#[derive(Debug, Clone)]
pub struct Paths {
    pub state_dir: PathBuf,
    pub lock_path: PathBuf,
    pub log_path: PathBuf,
    pub db_path: PathBuf,
    pub socket_path: PathBuf,
}

impl Paths {
    /// Resolve the state directory: `AGENT_FORGE_STATE_DIR` >
    /// `XDG_STATE_HOME/agent-forge` > `~/.local/state/agent-forge`.
    pub fn resolve() -> Result<Self, crate::error::DaemonError> {
        let state_dir = state_dir()?;
        Ok(Self {
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            db_path: state_dir.join("forge.sqlite3"),
            socket_path: state_dir.join("daemon.sock"),
            state_dir,
        })
    }

    /// A `Paths` rooted at an arbitrary directory, for tests.
    pub fn under(dir: &std::path::Path) -> Self {
        Self {
            state_dir: dir.to_path_buf(),
            lock_path: dir.join("daemon.pid"),
            log_path: dir.join("daemon.log"),
            db_path: dir.join("forge.sqlite3"),
            socket_path: dir.join("daemon.sock"),
        }
    }
}

fn state_dir() -> Result<PathBuf, crate::error::DaemonError> {
    if let Ok(dir) = std::env::var("AGENT_FORGE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("agent-forge"));
    }
    let home = std::env::var("HOME").map_err(|_| crate::error::DaemonError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/agent-forge"))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
