// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent launch command composition and the `send_control` action
//! translation table, per spec §4.5.

use af_adapters::session::ControlKey;
use af_core::{DefaultsConfig, Profile, ProjectConfig};

/// One step the manager performs against a `SessionAdapter` to realize a
/// `ControlAction`.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceStep {
    Text(String),
    Control(ControlKey),
}

/// The closed set of `send_control` actions named in spec §4.5's
/// operations table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Approve,
    AlwaysAllow,
    Reject,
    Interrupt,
    Restart,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Tab,
}

impl ControlAction {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "approve" => Self::Approve,
            "always_allow" | "always-allow" => Self::AlwaysAllow,
            "reject" => Self::Reject,
            "interrupt" => Self::Interrupt,
            "restart" => Self::Restart,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "enter" => Self::Enter,
            "escape" => Self::Escape,
            "tab" => Self::Tab,
            _ => return None,
        })
    }
}

/// Translate a `ControlAction` into the key sequence sent to the
/// session, per spec §4.5 ("approve -> \"1\"+Enter, reject -> \"2\"+Enter,
/// always-allow -> \"2\"+Enter variant, interrupt -> Ctrl-C, ..."). The
/// exact digit ordering for approve/always-allow is an Open Question
/// (spec §9): it depends on the running agent's prompt version, so the
/// mapping below is the default and is expected to be overridden by a
/// configurable ruleset in front of this function at a later date.
///
/// `Restart` is not translated here — callers must special-case it as a
/// full `AgentManager::restart`, since it isn't a key sequence at all.
pub fn control_sequence(action: ControlAction) -> Vec<SequenceStep> {
    use SequenceStep::*;
    match action {
        ControlAction::Approve => vec![Text("1".to_string()), Control(ControlKey::Enter)],
        ControlAction::AlwaysAllow => vec![Text("2".to_string()), Control(ControlKey::Enter)],
        ControlAction::Reject => vec![Text("2".to_string()), Control(ControlKey::Enter)],
        ControlAction::Interrupt => vec![Control(ControlKey::CtrlC)],
        ControlAction::Restart => Vec::new(),
        ControlAction::Up => vec![Control(ControlKey::Up)],
        ControlAction::Down => vec![Control(ControlKey::Down)],
        ControlAction::Left => vec![Control(ControlKey::Left)],
        ControlAction::Right => vec![Control(ControlKey::Right)],
        ControlAction::Enter => vec![Control(ControlKey::Enter)],
        ControlAction::Escape => vec![Control(ControlKey::Escape)],
        ControlAction::Tab => vec![Control(ControlKey::Tab)],
    }
}

/// Compose the launch command from configuration defaults, an optional
/// sandbox prefix, and the profile's system prompt, per spec §4.5.
pub fn build_command(
    defaults: &DefaultsConfig,
    project: &ProjectConfig,
    profile: Option<&Profile>,
) -> String {
    let mut cmd = defaults.claude_command.clone();

    if let Some(p) = profile {
        if !p.system_prompt.trim().is_empty() {
            cmd.push_str(" --append-system-prompt ");
            cmd.push('\'');
            cmd.push_str(&p.system_prompt.replace('\'', "'\\''"));
            cmd.push('\'');
        }
    }

    let sandbox_enabled = project.sandbox.unwrap_or(defaults.sandbox);
    if sandbox_enabled {
        cmd = format!("sandbox-exec -p forge-default.sb {cmd}");
    }

    cmd
}

/// Environment variables exported for the launched process: the
/// project/profile don't override these today, only configuration
/// defaults do, per spec §4.5 ("environment variables exported from
/// configuration").
pub fn build_env(defaults: &DefaultsConfig) -> Vec<(String, String)> {
    defaults
        .claude_env
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
