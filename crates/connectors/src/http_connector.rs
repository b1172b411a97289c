// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single HTTP-backed `Connector` implementation shared by every
//! platform kind in the closed `ConnectorKind` set. Telegram-like and
//! Discord-like platforms both expose a bot-token REST API shaped
//! closely enough (send message, send file, list channels) that one
//! templated client covers both; only the URL shape and payload field
//! names differ per kind.

use crate::connector::{ChannelInfo, Connector, MediaKind, PlatformError, ReplyButton};
use af_core::ConnectorKind;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::time::Duration;

const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

fn base_url(kind: ConnectorKind, token: &str) -> String {
    match kind {
        ConnectorKind::TelegramLike => format!("https://api.telegram.example/bot{token}"),
        ConnectorKind::DiscordLike => "https://discord.example/api/v10".to_string(),
    }
}

/// Retry `f` up to `MAX_RETRIES` times with doubling backoff, per spec
/// §7's PlatformError policy ("retried with exponential backoff per
/// connector; after retry cap, a log entry is written and the message is
/// dropped").
async fn with_retry<T, F, Fut>(description: &str, mut f: F) -> Result<T, PlatformError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, PlatformError>>,
{
    let mut delay = RETRY_BASE_DELAY;
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < MAX_RETRIES => {
                attempt += 1;
                tracing::warn!(attempt, %description, error = %e, "connector call failed, retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => {
                tracing::error!(%description, error = %e, "connector call exhausted retries, dropping");
                return Err(e);
            }
        }
    }
}

/// One running connector instance. `running` tracks whether `start` has
/// been called, so a stopped connector rejects sends with `NotRunning`
/// instead of hitting the network.
pub struct HttpConnector {
    id: String,
    kind: ConnectorKind,
    base_url: String,
    client: reqwest::Client,
    running: Mutex<bool>,
}

impl HttpConnector {
    pub fn new(id: impl Into<String>, kind: ConnectorKind, token: &str) -> Self {
        Self {
            id: id.into(),
            base_url: base_url(kind, token),
            kind,
            client: reqwest::Client::new(),
            running: Mutex::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ConnectorKind {
        self.kind
    }

    fn require_running(&self) -> Result<(), PlatformError> {
        if *self.running.lock() {
            Ok(())
        } else {
            Err(PlatformError::NotRunning)
        }
    }

    fn send_message_url(&self) -> String {
        match self.kind {
            ConnectorKind::TelegramLike => format!("{}/sendMessage", self.base_url),
            ConnectorKind::DiscordLike => format!("{}/channels", self.base_url),
        }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn start(&self) -> Result<(), PlatformError> {
        *self.running.lock() = true;
        Ok(())
    }

    async fn stop(&self) -> Result<(), PlatformError> {
        *self.running.lock() = false;
        Ok(())
    }

    async fn send_text(
        &self,
        channel_id: &str,
        text: &str,
        buttons: &[ReplyButton],
    ) -> Result<(), PlatformError> {
        self.require_running()?;

        let keyboard: Vec<_> = buttons
            .iter()
            .map(|b| serde_json::json!({"label": b.label, "callback_id": b.callback_id}))
            .collect();
        let body = serde_json::json!({
            "chat_id": channel_id,
            "text": text,
            "reply_markup": keyboard,
        });
        let url = self.send_message_url();

        with_retry("send_text", || {
            let client = self.client.clone();
            let url = url.clone();
            let body = body.clone();
            async move {
                client
                    .post(&url)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| PlatformError::Request(e.to_string()))?
                    .error_for_status()
                    .map_err(|e| PlatformError::Rejected(e.to_string()))?;
                Ok(())
            }
        })
        .await
    }

    async fn send_media(
        &self,
        channel_id: &str,
        path: &Path,
        kind: MediaKind,
    ) -> Result<(), PlatformError> {
        self.require_running()?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;
        let field_name = match kind {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
        };
        let url = format!("{}/send{}", self.base_url, field_name);
        let channel_id = channel_id.to_string();

        with_retry("send_media", || {
            let client = self.client.clone();
            let url = url.clone();
            let channel_id = channel_id.clone();
            let bytes = bytes.clone();
            async move {
                let form = reqwest::multipart::Form::new()
                    .text("chat_id", channel_id)
                    .part(field_name, reqwest::multipart::Part::bytes(bytes));
                client
                    .post(&url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(|e| PlatformError::Request(e.to_string()))?
                    .error_for_status()
                    .map_err(|e| PlatformError::Rejected(e.to_string()))?;
                Ok(())
            }
        })
        .await
    }

    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, PlatformError> {
        self.require_running()?;
        let url = format!("{}/getChats", self.base_url);
        with_retry("list_channels", || {
            let client = self.client.clone();
            let url = url.clone();
            async move {
                let resp: Vec<ChannelJson> = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| PlatformError::Request(e.to_string()))?
                    .json()
                    .await
                    .map_err(|e| PlatformError::Request(e.to_string()))?;
                Ok(resp
                    .into_iter()
                    .map(|c| ChannelInfo {
                        id: c.id,
                        name: c.name,
                        kind: c.kind,
                    })
                    .collect())
            }
        })
        .await
    }

    async fn validate_channel(&self, channel_id: &str) -> Result<bool, PlatformError> {
        let channels = self.list_channels().await?;
        Ok(channels.iter().any(|c| c.id == channel_id))
    }
}

#[derive(serde::Deserialize)]
struct ChannelJson {
    id: String,
    name: String,
    kind: String,
}

#[cfg(test)]
#[path = "http_connector_tests.rs"]
mod tests;
