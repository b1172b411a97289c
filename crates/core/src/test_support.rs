// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test builders for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::agent::{Agent, AgentId, AgentStatus};
use std::path::PathBuf;

/// Build a minimal `starting` agent for `project`, useful as a baseline
/// other tests mutate.
pub fn test_agent(id: &str, project: &str) -> Agent {
    Agent {
        id: AgentId::new(id),
        project: project.to_string(),
        session_name: Agent::session_name_for(project, &AgentId::new(id)),
        workspace_path: PathBuf::from(format!("/tmp/forge/{project}/{id}")),
        branch_name: format!("agent/{id}/test-task"),
        status: AgentStatus::Starting,
        created_at_epoch_ms: 1_000_000,
        last_activity_epoch_ms: 1_000_000,
        task: "test task".to_string(),
        profile_name: None,
        sub_agent_count: 0,
        needs_attention: false,
        parked: false,
        last_output: String::new(),
        last_response: None,
        last_user_message: None,
    }
}
