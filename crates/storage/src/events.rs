// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event log types: the append-only half of the Event & Snapshot Store.

use af_core::AgentId;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A single row read back from the `events` table.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: i64,
    pub agent_id: AgentId,
    pub project: String,
    pub kind: String,
    pub payload: Value,
    pub ts: DateTime<Utc>,
}

/// Filter applied by `recent_events`. All fields are conjunctive
/// (AND'd); `None` means "don't filter on this field".
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub agent_id: Option<AgentId>,
    pub project: Option<String>,
    pub kind: Option<String>,
}

impl EventFilter {
    pub fn for_agent(agent_id: AgentId) -> Self {
        Self {
            agent_id: Some(agent_id),
            ..Default::default()
        }
    }

    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            ..Default::default()
        }
    }
}
