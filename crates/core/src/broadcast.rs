// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared vocabulary for the Broadcast Hub (spec §4.8): the message kinds
//! it fans out, and the `UpdateSink` trait the Polling Scheduler and
//! Connector Router publish through. Keeping this in `af-core` lets
//! `af-engine` push updates without depending on `af-daemon`, which owns
//! the concrete hub.

use crate::agent::Agent;
use serde::{Deserialize, Serialize};

/// One message kind fanned out by the Broadcast Hub, per spec §4.8.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UpdateMessage {
    #[serde(rename = "agent_update")]
    AgentUpdate { agent: Agent },

    /// Legacy text relay, superseded by the binary terminal bridge but
    /// retained for clients that want a plain-text tail.
    #[serde(rename = "terminal_output")]
    TerminalOutput { agent_id: String, text: String },

    #[serde(rename = "metrics_update")]
    MetricsUpdate {
        live_agents: u32,
        needs_attention: u32,
    },

    #[serde(rename = "log_line")]
    LogLine { level: String, message: String },
}

/// Anything the Scheduler or Connector Router can publish an update
/// through, implemented by `af-daemon::hub::BroadcastHub`. Kept as a
/// trait here (rather than a concrete type) so `af-engine` doesn't need
/// to depend on `af-daemon`.
pub trait UpdateSink: Send + Sync {
    fn publish(&self, message: UpdateMessage);
}

/// A sink that discards every message, for tests and deployments that
/// don't wire a real hub.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl UpdateSink for NullSink {
    fn publish(&self, _message: UpdateMessage) {}
}

#[cfg(test)]
#[path = "broadcast_tests.rs"]
mod tests;
