// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform contract every chat platform implements, per spec §4.9.

use async_trait::async_trait;
use thiserror::Error;

/// Errors a platform call can fail with. Per the error taxonomy, a send
/// failure is retried with backoff at the call site; this type only
/// distinguishes the failure modes a retry loop needs to react to.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform request failed: {0}")]
    Request(String),
    #[error("platform rejected the request: {0}")]
    Rejected(String),
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
    #[error("connector is not running")]
    NotRunning,
}

/// One action button attached to a `send_text` call, surfaced to the
/// platform's native button UI where supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyButton {
    pub label: String,
    pub callback_id: String,
}

/// The kind of attachment `send_media` delivers, per spec §4.9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Audio,
}

/// One channel a connector knows about, for binding UX (`list_channels`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    pub kind: String,
}

/// An inbound message a connector pushes into the router. Exactly one of
/// `text`, `attachments`, or `button_callback` is normally populated, but
/// the router does not assume exclusivity.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    pub connector_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
    pub button_callback: Option<String>,
}

/// A staged inbound file, read fully into memory before the router
/// writes it under the target workspace's `.media/` directory.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A uniform contract every chat platform adapter implements, per spec
/// §4.9. Object-safe so the registry can hold `Box<dyn Connector>`.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Idempotent: starting an already-running connector is a no-op.
    async fn start(&self) -> Result<(), PlatformError>;

    /// Idempotent: stopping an already-stopped connector is a no-op.
    async fn stop(&self) -> Result<(), PlatformError>;

    async fn send_text(
        &self,
        channel_id: &str,
        text: &str,
        buttons: &[ReplyButton],
    ) -> Result<(), PlatformError>;

    async fn send_media(
        &self,
        channel_id: &str,
        path: &std::path::Path,
        kind: MediaKind,
    ) -> Result<(), PlatformError>;

    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, PlatformError>;

    async fn validate_channel(&self, channel_id: &str) -> Result<bool, PlatformError>;
}

#[cfg(test)]
#[path = "connector_tests.rs"]
mod tests;
