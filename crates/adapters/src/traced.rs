// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability across session
//! backends.

use crate::session::{ControlKey, SessionAdapter, SessionError};
use async_trait::async_trait;
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any `SessionAdapter`.
#[derive(Clone)]
pub struct TracedSession<S> {
    inner: S,
}

impl<S> TracedSession<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SessionAdapter> SessionAdapter for TracedSession<S> {
    async fn create(
        &self,
        name: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
        cols: u32,
        rows: u32,
    ) -> Result<(), SessionError> {
        async {
            tracing::info!(cmd, env_count = env.len(), cols, rows, "starting");
            let start = std::time::Instant::now();
            let result = self.inner.create(name, cwd, cmd, env, cols, rows).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "session created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(tracing::info_span!("session.create", name, cwd = %cwd.display()))
        .await
    }

    async fn send_text(&self, id: &str, text: &str) -> Result<(), SessionError> {
        tracing::info_span!("session.send_text", id)
            .in_scope(|| tracing::debug!(text_len = text.len(), "sending"));
        let result = self.inner.send_text(id, text).await;
        if let Err(ref e) = result {
            tracing::error!(id, error = %e, "send_text failed");
        }
        result
    }

    async fn send_control(&self, id: &str, key: ControlKey) -> Result<(), SessionError> {
        let result = self.inner.send_control(id, key).await;
        if let Err(ref e) = result {
            tracing::error!(id, ?key, error = %e, "send_control failed");
        }
        result
    }

    async fn resize(&self, id: &str, cols: u32, rows: u32) -> Result<(), SessionError> {
        let result = self.inner.resize(id, cols, rows).await;
        if let Err(ref e) = result {
            tracing::error!(id, cols, rows, error = %e, "resize failed");
        }
        result
    }

    async fn capture(&self, id: &str, rows: Option<u32>) -> Result<String, SessionError> {
        let result = self.inner.capture(id, rows).await;
        tracing::info_span!("session.capture", id, ?rows).in_scope(|| {
            tracing::trace!(
                captured_len = result.as_ref().map(|s| s.len()).ok(),
                "captured"
            )
        });
        result
    }

    async fn exists(&self, id: &str) -> Result<bool, SessionError> {
        let result = self.inner.exists(id).await;
        tracing::trace!(id, exists = ?result.as_ref().ok(), "checked");
        result
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        let result = self.inner.kill(id).await;
        tracing::info_span!("session.kill", id).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed (may be expected)"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
