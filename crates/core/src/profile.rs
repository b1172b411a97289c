// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Profile: a reusable bundle of system prompt, instructions, and a
//! post-boot scripted start sequence.

use serde::{Deserialize, Serialize};

/// A single directive in a profile's start sequence. The action set is
/// closed — new directive kinds are a spec change, not a config change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StartDirective {
    /// Sleep for `seconds` before the next directive.
    Wait { seconds: u64 },
    /// Inject `text` followed by Enter.
    Send { text: String },
    /// Poll the Status Inference Engine until the agent reaches
    /// `idle`/`waiting_input` or `timeout_seconds` elapses.
    WaitForIdle {
        #[serde(default = "default_wait_for_idle_timeout")]
        timeout_seconds: u64,
    },
}

fn default_wait_for_idle_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub start_sequence: Vec<StartDirective>,
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
