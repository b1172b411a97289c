// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent identifier, status, and the durable record of a supervised session.

use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for an agent instance: 6 lowercase hex characters.
    ///
    /// Forms the tail of the session name (`forge__{project}__{id}`) and the
    /// middle segment of the branch name (`{prefix}/{id}/{task-slug}`).
    pub struct AgentId;
}

/// Closed set of statuses an agent can occupy.
///
/// `Stopped` is the only terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Starting,
    Working,
    WaitingInput,
    Idle,
    Error,
    Stopped,
}

impl AgentStatus {
    /// Terminal status = stopped, per the data model.
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentStatus::Stopped)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentStatus::Starting => "starting",
            AgentStatus::Working => "working",
            AgentStatus::WaitingInput => "waiting_input",
            AgentStatus::Idle => "idle",
            AgentStatus::Error => "error",
            AgentStatus::Stopped => "stopped",
        };
        write!(f, "{s}")
    }
}

/// Cap on the `last_output` ring buffer kept on every agent record.
pub const LAST_OUTPUT_CAP: usize = 4000;

/// Keep only the trailing `cap` characters of `s`, on a char boundary.
pub fn bounded_tail(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        return s.to_string();
    }
    let skip = s.chars().count() - cap;
    s.chars().skip(skip).collect()
}

/// The durable record of a single supervised agent.
///
/// Doubles as the Snapshot entity from the data model: a snapshot is "the
/// latest Agent fields", so the store persists `Agent` directly rather
/// than a parallel duplicate shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub project: String,
    pub session_name: String,
    pub workspace_path: std::path::PathBuf,
    pub branch_name: String,
    pub status: AgentStatus,
    pub created_at_epoch_ms: u64,
    pub last_activity_epoch_ms: u64,
    pub task: String,
    pub profile_name: Option<String>,
    #[serde(default)]
    pub sub_agent_count: u32,
    #[serde(default)]
    pub needs_attention: bool,
    #[serde(default)]
    pub parked: bool,
    #[serde(default)]
    pub last_output: String,
    #[serde(default)]
    pub last_response: Option<String>,
    #[serde(default)]
    pub last_user_message: Option<String>,
}

impl Agent {
    pub fn session_name_for(project: &str, id: &AgentId) -> String {
        format!("forge__{project}__{id}")
    }

    /// Parse `forge__{project}__{id}` back into its parts. Other components
    /// rely on this exact shape, so parsing is centralized here.
    pub fn parse_session_name(name: &str) -> Option<(&str, &str)> {
        let rest = name.strip_prefix("forge__")?;
        let (project, id) = rest.split_once("__")?;
        if project.is_empty() || id.is_empty() {
            return None;
        }
        Some((project, id))
    }

    pub fn set_last_output(&mut self, output: &str) {
        self.last_output = bounded_tail(output, LAST_OUTPUT_CAP);
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
