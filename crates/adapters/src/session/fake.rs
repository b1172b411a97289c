// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ControlKey, SessionAdapter, SessionError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded session call.
#[derive(Debug, Clone)]
pub enum SessionCall {
    Create {
        name: String,
        cwd: PathBuf,
        cmd: String,
        env: Vec<(String, String)>,
        cols: u32,
        rows: u32,
    },
    SendText {
        id: String,
        text: String,
    },
    SendControl {
        id: String,
        key: ControlKey,
    },
    Resize {
        id: String,
        cols: u32,
        rows: u32,
    },
    Capture {
        id: String,
        rows: Option<u32>,
    },
    Exists {
        id: String,
    },
    Kill {
        id: String,
    },
}

/// Fake session state.
#[derive(Debug, Clone)]
pub struct FakeSession {
    pub name: String,
    pub cwd: PathBuf,
    pub cmd: String,
    pub env: Vec<(String, String)>,
    pub cols: u32,
    pub rows: u32,
    pub output: Vec<String>,
    pub alive: bool,
}

struct FakeSessionState {
    sessions: HashMap<String, FakeSession>,
    calls: Vec<SessionCall>,
}

/// Fake session adapter for testing. Session IDs are the names passed to
/// `create` — unlike tmux, there's no indirection to fake here.
#[derive(Clone)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl Default for FakeSessionAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSessionState {
                sessions: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    /// Get a session by ID.
    pub fn get_session(&self, id: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(id).cloned()
    }

    /// Set session output, as if the agent had printed these lines.
    pub fn set_output(&self, id: &str, output: Vec<String>) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.output = output;
        }
    }

    /// Mark session as exited.
    pub fn set_exited(&self, id: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.alive = false;
        }
    }

    /// Add a pre-existing session by ID, for testing liveness checks without
    /// going through `create`.
    pub fn add_session(&self, id: &str, alive: bool) {
        self.inner.lock().sessions.insert(
            id.to_string(),
            FakeSession {
                name: id.to_string(),
                cwd: PathBuf::new(),
                cmd: String::new(),
                env: Vec::new(),
                cols: 80,
                rows: 24,
                output: Vec::new(),
                alive,
            },
        );
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn create(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
        cols: u32,
        rows: u32,
    ) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();

        if inner.sessions.contains_key(name) {
            return Err(SessionError::AlreadyExists(name.to_string()));
        }

        inner.calls.push(SessionCall::Create {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            cmd: cmd.to_string(),
            env: env.to_vec(),
            cols,
            rows,
        });

        inner.sessions.insert(
            name.to_string(),
            FakeSession {
                name: name.to_string(),
                cwd: cwd.to_path_buf(),
                cmd: cmd.to_string(),
                env: env.to_vec(),
                cols,
                rows,
                output: Vec::new(),
                alive: true,
            },
        );

        Ok(())
    }

    async fn send_text(&self, id: &str, text: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();

        inner.calls.push(SessionCall::SendText {
            id: id.to_string(),
            text: text.to_string(),
        });

        if !inner.sessions.contains_key(id) {
            return Err(SessionError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn send_control(&self, id: &str, key: ControlKey) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();

        inner.calls.push(SessionCall::SendControl {
            id: id.to_string(),
            key,
        });

        if !inner.sessions.contains_key(id) {
            return Err(SessionError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn resize(&self, id: &str, cols: u32, rows: u32) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();

        inner.calls.push(SessionCall::Resize {
            id: id.to_string(),
            cols,
            rows,
        });

        match inner.sessions.get_mut(id) {
            Some(session) => {
                session.cols = cols;
                session.rows = rows;
                Ok(())
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    async fn capture(&self, id: &str, rows: Option<u32>) -> Result<String, SessionError> {
        let mut inner = self.inner.lock();

        inner.calls.push(SessionCall::Capture {
            id: id.to_string(),
            rows,
        });

        match inner.sessions.get(id) {
            Some(session) => {
                let text = match rows {
                    Some(rows) => {
                        let start = session.output.len().saturating_sub(rows as usize);
                        session.output[start..].join("\n")
                    }
                    None => session.output.join("\n"),
                };
                Ok(text)
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    async fn exists(&self, id: &str) -> Result<bool, SessionError> {
        let mut inner = self.inner.lock();

        inner.calls.push(SessionCall::Exists { id: id.to_string() });

        match inner.sessions.get(id) {
            Some(session) => Ok(session.alive),
            None => Ok(false),
        }
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();

        inner.calls.push(SessionCall::Kill { id: id.to_string() });

        if let Some(session) = inner.sessions.get_mut(id) {
            session.alive = false;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
