// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start sequence replay: the scripted post-boot actions a profile can
//! attach to a spawn, per spec §4.5. Runs after session creation;
//! failures downgrade to logged warnings and never abort the agent.

use af_adapters::inference::{self, InferenceRuleset};
use af_adapters::session::{ControlKey, SessionAdapter};
use af_core::{AgentStatus, StartDirective};
use std::time::Duration;

/// Poll interval while waiting for idle, matching the adapters crate's
/// `FORGE_START_SEQUENCE_POLL_MS`-tunable default.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Walk `directives` in order against `session_name`, sleeping for
/// `wait`, injecting text for `send`, and polling for idle on
/// `wait_for_idle`. Every step failure is logged and skipped rather than
/// aborting the sequence.
pub async fn replay<S: SessionAdapter>(sessions: &S, session_name: &str, directives: &[StartDirective]) {
    for directive in directives {
        match directive {
            StartDirective::Wait { seconds } => {
                tokio::time::sleep(Duration::from_secs(*seconds)).await;
            }
            StartDirective::Send { text } => {
                if let Err(e) = sessions.send_text(session_name, text).await {
                    tracing::warn!(session = session_name, error = %e, "start sequence send failed");
                    continue;
                }
                if let Err(e) = sessions.send_control(session_name, ControlKey::Enter).await {
                    tracing::warn!(session = session_name, error = %e, "start sequence enter failed");
                }
            }
            StartDirective::WaitForIdle { timeout_seconds } => {
                wait_for_idle(sessions, session_name, Duration::from_secs(*timeout_seconds)).await;
            }
        }
    }
}

async fn wait_for_idle<S: SessionAdapter>(sessions: &S, session_name: &str, timeout: Duration) {
    let ruleset = InferenceRuleset::default();
    let deadline = tokio::time::Instant::now() + timeout;
    let mut prior_capture = String::new();
    let mut prior_status = AgentStatus::Starting;

    loop {
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(session = session_name, "wait_for_idle timed out");
            return;
        }

        let capture = match sessions.capture(session_name, None).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(session = session_name, error = %e, "wait_for_idle capture failed");
                tokio::time::sleep(POLL_INTERVAL).await;
                continue;
            }
        };

        let status = inference::classify(&capture, &prior_capture, prior_status, &ruleset);
        if matches!(status, AgentStatus::Idle | AgentStatus::WaitingInput) {
            return;
        }
        prior_status = status;
        prior_capture = capture;
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
#[path = "start_sequence_tests.rs"]
mod tests;
