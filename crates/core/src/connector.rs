// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connector configuration entities: the typed, serializable half of the
//! Connector Router. The trait that actually talks to a chat platform
//! lives in `af-connectors`; this crate only carries the data shapes
//! every layer (config, storage, router) agrees on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A binding between one connector's channel and one project.
///
/// `(connector_id, channel_id)` is unique per project by construction:
/// callers build these from a config map keyed by that pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelBinding {
    pub connector_id: String,
    pub channel_id: String,
    pub channel_name: String,
    #[serde(default)]
    pub inbound: bool,
    #[serde(default)]
    pub outbound: bool,
}

/// The platform family a connector instance adapts. Named generically per
/// the spec's "Telegram-style, Discord-style" wording — a concrete SDK
/// integration is an external collaborator, not part of THE CORE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    TelegramLike,
    DiscordLike,
}

/// Lifecycle state machine for a connector instance, per the spec:
/// `disabled -> starting -> running <-> reconnecting -> stopping -> stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorState {
    Disabled,
    Starting,
    Running,
    Reconnecting,
    Stopping,
    Stopped,
}

impl ConnectorState {
    /// Valid direct transitions, enforced by the router rather than left
    /// implicit — see `af-connectors::router::transition`.
    pub fn can_transition_to(self, next: ConnectorState) -> bool {
        use ConnectorState::*;
        matches!(
            (self, next),
            (Disabled, Starting)
                | (Starting, Running)
                | (Starting, Stopped)
                | (Running, Reconnecting)
                | (Running, Stopping)
                | (Reconnecting, Running)
                | (Reconnecting, Stopping)
                | (Stopping, Stopped)
                | (Stopped, Starting)
        )
    }
}

/// Opaque credential bag. `Debug` is hand-written to redact values so
/// connector configs never leak secrets into logs.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials(pub IndexMap<String, String>);

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "<redacted>")))
            .finish()
    }
}

/// A configured connector instance (one Telegram-like bot, one
/// Discord-like bot, ...). `runtime_handle` is intentionally absent here —
/// it lives only in the running `af-connectors` registry.
///
/// `id` takes no value from the TOML body: like `ProjectConfig`/`Profile`,
/// a connector's identity is its `[connectors.<id>]` map key. `Config`
/// fills `id` in right after deserializing — see `Config::from_toml_str`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorInstance {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConnectorKind,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub settings: IndexMap<String, String>,
}

#[cfg(test)]
#[path = "connector_tests.rs"]
mod tests;
