// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op session adapter for when session management is disabled.

use super::{ControlKey, SessionAdapter, SessionError};
use async_trait::async_trait;
use std::path::Path;

/// Session adapter that does nothing.
///
/// Used when agent spawning is disabled or in minimal deployments.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpSessionAdapter;

impl NoOpSessionAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionAdapter for NoOpSessionAdapter {
    async fn create(
        &self,
        _name: &str,
        _cwd: &Path,
        _cmd: &str,
        _env: &[(String, String)],
        _cols: u32,
        _rows: u32,
    ) -> Result<(), SessionError> {
        Ok(())
    }

    async fn send_text(&self, _id: &str, _text: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn send_control(&self, _id: &str, _key: ControlKey) -> Result<(), SessionError> {
        Ok(())
    }

    async fn resize(&self, _id: &str, _cols: u32, _rows: u32) -> Result<(), SessionError> {
        Ok(())
    }

    async fn capture(&self, _id: &str, _rows: Option<u32>) -> Result<String, SessionError> {
        Ok(String::new())
    }

    async fn exists(&self, _id: &str) -> Result<bool, SessionError> {
        Ok(false)
    }

    async fn kill(&self, _id: &str) -> Result<(), SessionError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
