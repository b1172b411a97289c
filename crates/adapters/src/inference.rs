// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status Inference Engine: a pure function of (current capture, prior
//! capture, prior status) that classifies a terminal pane into an
//! [`AgentStatus`]. No I/O, no clock — callers own the polling cadence and
//! decide what "recent" means.

use af_core::AgentStatus;

/// Default markers for a permission-blocking prompt, configurable per
/// deployment via [`InferenceRuleset::waiting_input_markers`].
const DEFAULT_WAITING_INPUT_MARKERS: &[&str] = &[
    "Do you want to",
    "❯ 1.",
    "Press ESC to interrupt",
];

/// Default markers for a fatal/error tail.
const DEFAULT_ERROR_MARKERS: &[&str] = &[
    "panicked at",
    "Traceback (most recent call last)",
    "FATAL",
    "Segmentation fault",
];

/// Default markers for an idle prompt (agent is done and waiting at a
/// shell-like prompt rather than blocked on a permission question).
const DEFAULT_IDLE_MARKERS: &[&str] = &["Human:", "> "];

/// Default start-of-turn marker `extract_response` scans backward for.
const DEFAULT_RESPONSE_START_MARKER: &str = "Assistant:";

/// Default end-of-turn marker, delimiting where the extracted turn stops.
const DEFAULT_RESPONSE_END_MARKER: &str = "Human:";

/// Configurable set of string markers the classifier matches against.
/// Loaded from [`af_core::Config`] so deployments can tune detection without
/// a rebuild.
#[derive(Debug, Clone)]
pub struct InferenceRuleset {
    pub waiting_input_markers: Vec<String>,
    pub error_markers: Vec<String>,
    pub idle_markers: Vec<String>,
    /// Start-of-turn marker `extract_response` scans backward for.
    pub response_start_marker: String,
    /// End-of-turn marker bounding the extracted turn.
    pub response_end_marker: String,
}

impl Default for InferenceRuleset {
    fn default() -> Self {
        Self {
            waiting_input_markers: DEFAULT_WAITING_INPUT_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            error_markers: DEFAULT_ERROR_MARKERS.iter().map(|s| s.to_string()).collect(),
            idle_markers: DEFAULT_IDLE_MARKERS.iter().map(|s| s.to_string()).collect(),
            response_start_marker: DEFAULT_RESPONSE_START_MARKER.to_string(),
            response_end_marker: DEFAULT_RESPONSE_END_MARKER.to_string(),
        }
    }
}

/// Strip trailing blank lines so captures that differ only by a trailing
/// newline count as unchanged.
fn normalize(capture: &str) -> &str {
    capture.trim_end_matches(['\n', '\r', ' '])
}

fn tail_contains_any(capture: &str, markers: &[String], tail_lines: usize) -> bool {
    let tail: Vec<&str> = capture.lines().rev().take(tail_lines).collect();
    let tail_joined = tail.into_iter().rev().collect::<Vec<_>>().join("\n");
    markers.iter().any(|m| tail_joined.contains(m.as_str()))
}

/// Classify the current pane capture into a status, given the prior capture
/// and the agent's prior status. Rules are applied in order; first match
/// wins. See module docs for the rule order.
pub fn classify(
    current: &str,
    prior: &str,
    prior_status: AgentStatus,
    ruleset: &InferenceRuleset,
) -> AgentStatus {
    if tail_contains_any(current, &ruleset.waiting_input_markers, 5) {
        return AgentStatus::WaitingInput;
    }
    if tail_contains_any(current, &ruleset.error_markers, 20) {
        return AgentStatus::Error;
    }
    if normalize(current) != normalize(prior) {
        return AgentStatus::Working;
    }
    if tail_contains_any(current, &ruleset.idle_markers, 3) {
        return AgentStatus::Idle;
    }
    prior_status
}

/// When transitioning working -> idle, extract the agent's most recent turn
/// from the tail of the capture. Scans backward for the last pair of
/// `ruleset`'s start/end markers delimiting a turn (excluding echoed user
/// input). Falls back to the largest non-blank tail block.
pub fn extract_response(capture: &str, max_len: usize, ruleset: &InferenceRuleset) -> Option<String> {
    let turn_start = ruleset.response_start_marker.as_str();
    let turn_end = ruleset.response_end_marker.as_str();

    let start = capture.rfind(turn_start);
    let text = match start {
        Some(idx) => {
            let after_start = &capture[idx + turn_start.len()..];
            match after_start.find(turn_end) {
                Some(end_idx) => &after_start[..end_idx],
                None => after_start,
            }
        }
        None => {
            // No markers: use the largest non-blank block, where a block is
            // a maximal run of non-empty lines.
            capture
                .split("\n\n")
                .filter(|b| !b.trim().is_empty())
                .max_by_key(|b| b.len())
                .unwrap_or("")
        }
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(bounded_tail(trimmed, max_len))
}

fn bounded_tail(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        return s.to_string();
    }
    let skip = s.chars().count() - cap;
    s.chars().skip(skip).collect()
}

#[cfg(test)]
#[path = "inference_tests.rs"]
mod tests;
