// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal Multiplexer Adapter: a thin wrapper over the OS terminal-session
//! tool (tmux). Every operation is an async wrapper over a subprocess
//! invocation and must time out rather than hang.

mod noop;
mod tmux;

pub use noop::NoOpSessionAdapter;
pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, SessionCall};

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default timeout applied to every subprocess invocation (spec §4.1: "≤5s
/// default").
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("session already exists: {0}")]
    AlreadyExists(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("operation on session {0} timed out")]
    Timeout(String),
}

/// A single control character/key the multiplexer can inject, per spec
/// §4.1's closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    CtrlC,
    CtrlD,
    CtrlT,
    Escape,
    Tab,
}

/// Adapter for managing terminal sessions (tmux, etc).
///
/// Session names passed to every method MUST match
/// `forge__{project}__{6-hex}` — other components parse this shape, so the
/// adapter itself does not validate it (that's `Agent::parse_session_name`'s
/// job at the call site).
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    /// Create a session running `cmd` in `cwd` with `cols`x`rows` and the
    /// given environment.
    async fn create(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
        cols: u32,
        rows: u32,
    ) -> Result<(), SessionError>;

    /// Transmit literal characters with no key-name interpretation. Large
    /// payloads may be split by the implementation.
    async fn send_text(&self, id: &str, text: &str) -> Result<(), SessionError>;

    /// Inject a single control sequence.
    async fn send_control(&self, id: &str, key: ControlKey) -> Result<(), SessionError>;

    /// Resize an existing session's grid.
    async fn resize(&self, id: &str, cols: u32, rows: u32) -> Result<(), SessionError>;

    /// Return the current visible-pane string. `rows = None` captures all
    /// visible rows.
    async fn capture(&self, id: &str, rows: Option<u32>) -> Result<String, SessionError>;

    /// Whether the session currently exists.
    async fn exists(&self, id: &str) -> Result<bool, SessionError>;

    /// Terminate the session. Idempotent: killing a session that does not
    /// exist is not an error.
    async fn kill(&self, id: &str) -> Result<(), SessionError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
