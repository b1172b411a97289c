// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only event types logged by the Event & Snapshot Store.
//!
//! Serializes as `{"type": "kind", ...fields}`. Unknown type tags
//! deserialize to `Custom` so the log tolerates forward-incompatible
//! readers.

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the kinds named in the data model's Event entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "spawned")]
    Spawned {
        agent_id: AgentId,
        project: String,
        task: String,
        profile: Option<String>,
    },

    #[serde(rename = "killed")]
    Killed { agent_id: AgentId, project: String },

    #[serde(rename = "restarted")]
    Restarted {
        agent_id: AgentId,
        project: String,
        previous_agent_id: AgentId,
    },

    #[serde(rename = "status_change")]
    StatusChange {
        agent_id: AgentId,
        project: String,
        from: String,
        to: String,
    },

    #[serde(rename = "user_message")]
    UserMessage {
        agent_id: AgentId,
        project: String,
        text: String,
    },

    #[serde(rename = "agent_response")]
    AgentResponse {
        agent_id: AgentId,
        project: String,
        text: String,
    },

    #[serde(rename = "waiting_input")]
    WaitingInput { agent_id: AgentId, project: String },

    #[serde(rename = "sub_agent_start")]
    SubAgentStart { agent_id: AgentId, project: String },

    #[serde(rename = "sub_agent_stop")]
    SubAgentStop { agent_id: AgentId, project: String },

    #[serde(rename = "error")]
    Error {
        agent_id: AgentId,
        project: String,
        message: String,
    },

    /// Session ended unexpectedly between polls (crash detection on recovery
    /// or mid-run), distinct from an operator-initiated `killed`.
    #[serde(rename = "crashed")]
    Crashed { agent_id: AgentId, project: String },

    /// Forward-compatibility fallback for unrecognized event kinds.
    #[serde(other)]
    Custom,
}

impl Event {
    pub fn agent_id(&self) -> Option<&AgentId> {
        match self {
            Event::Spawned { agent_id, .. }
            | Event::Killed { agent_id, .. }
            | Event::Restarted { agent_id, .. }
            | Event::StatusChange { agent_id, .. }
            | Event::UserMessage { agent_id, .. }
            | Event::AgentResponse { agent_id, .. }
            | Event::WaitingInput { agent_id, .. }
            | Event::SubAgentStart { agent_id, .. }
            | Event::SubAgentStop { agent_id, .. }
            | Event::Error { agent_id, .. }
            | Event::Crashed { agent_id, .. } => Some(agent_id),
            Event::Custom => None,
        }
    }

    pub fn project(&self) -> Option<&str> {
        match self {
            Event::Spawned { project, .. }
            | Event::Killed { project, .. }
            | Event::Restarted { project, .. }
            | Event::StatusChange { project, .. }
            | Event::UserMessage { project, .. }
            | Event::AgentResponse { project, .. }
            | Event::WaitingInput { project, .. }
            | Event::SubAgentStart { project, .. }
            | Event::SubAgentStop { project, .. }
            | Event::Error { project, .. }
            | Event::Crashed { project, .. } => Some(project.as_str()),
            Event::Custom => None,
        }
    }

    /// The `kind` column value stored alongside the JSON payload, matching
    /// the `events(..., kind, payload JSON, ...)` schema in the external
    /// interfaces contract.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Spawned { .. } => "spawned",
            Event::Killed { .. } => "killed",
            Event::Restarted { .. } => "restarted",
            Event::StatusChange { .. } => "status_change",
            Event::UserMessage { .. } => "user_message",
            Event::AgentResponse { .. } => "agent_response",
            Event::WaitingInput { .. } => "waiting_input",
            Event::SubAgentStart { .. } => "sub_agent_start",
            Event::SubAgentStop { .. } => "sub_agent_stop",
            Event::Error { .. } => "error",
            Event::Crashed { .. } => "crashed",
            Event::Custom => "custom",
        }
    }

    pub fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
