// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The hook endpoint's payload shape (spec §6: `POST /api/hooks/event`
//! with `{agent_id, event}`). The HTTP layer that binds this route is an
//! external collaborator; this module only defines the typed contract it
//! forwards into `App::handle_hook_event`.

use serde::{Deserialize, Serialize};

/// One of the two sub-agent lifecycle signals a workspace's
/// `.claude/settings.local.json` hooks POST back to the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookEvent {
    #[serde(rename = "SubagentStart")]
    SubagentStart,
    #[serde(rename = "SubagentStop")]
    SubagentStop,
}

/// The request body's on-wire shape.
#[derive(Debug, Clone, Deserialize)]
pub struct HookPayload {
    pub agent_id: String,
    pub event: HookEvent,
}

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;
