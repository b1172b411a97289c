// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project entity: a git repository agents are spawned into.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::connector::ChannelBinding;

/// A git repository registered with Agent Forge, plus the caps and default
/// instructions applied to every agent spawned into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub default_branch: String,
    pub max_agents: u32,
    #[serde(default)]
    pub agent_instructions: String,
    #[serde(default)]
    pub context_files: Vec<PathBuf>,
    #[serde(default)]
    pub channel_bindings: Vec<ChannelBinding>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sandbox: bool,
}

impl Project {
    /// A channel is "single-bound" when it is bound (inbound) to exactly
    /// this project and no other project shares the binding — callers
    /// resolve the "no other project" half by checking the full project
    /// set, this only checks this project's own binding list.
    pub fn inbound_binding(&self, connector_id: &str, channel_id: &str) -> Option<&ChannelBinding> {
        self.channel_bindings
            .iter()
            .find(|b| b.connector_id == connector_id && b.channel_id == channel_id && b.inbound)
    }

    pub fn outbound_bindings(&self) -> impl Iterator<Item = &ChannelBinding> {
        self.channel_bindings.iter().filter(|b| b.outbound)
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
