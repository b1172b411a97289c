// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn ruleset() -> InferenceRuleset {
    InferenceRuleset::default()
}

#[test]
fn waiting_input_marker_wins_even_if_capture_is_unchanged() {
    let capture = "some tool output\nDo you want to proceed?\n❯ 1. Yes\n";
    let status = classify(capture, capture, AgentStatus::Working, &ruleset());
    assert_eq!(status, AgentStatus::WaitingInput);
}

#[test]
fn error_marker_beats_working_detection() {
    let prior = "running tests...\n";
    let current = "running tests...\nthread 'main' panicked at src/main.rs:10\n";
    let status = classify(current, prior, AgentStatus::Working, &ruleset());
    assert_eq!(status, AgentStatus::Error);
}

#[test]
fn changed_capture_without_markers_is_working() {
    let prior = "step 1 done\n";
    let current = "step 1 done\nstep 2 in progress\n";
    let status = classify(current, prior, AgentStatus::Idle, &ruleset());
    assert_eq!(status, AgentStatus::Working);
}

#[test]
fn trailing_blank_lines_do_not_count_as_a_change() {
    let prior = "output here";
    let current = "output here\n\n\n";
    let status = classify(current, prior, AgentStatus::Working, &ruleset());
    // Unchanged after normalization, no idle marker present, retains prior.
    assert_eq!(status, AgentStatus::Working);
}

#[test]
fn unchanged_capture_with_idle_marker_is_idle() {
    let capture = "final output\nHuman:";
    let status = classify(capture, capture, AgentStatus::Working, &ruleset());
    assert_eq!(status, AgentStatus::Idle);
}

#[test]
fn unchanged_capture_without_markers_retains_prior_status() {
    let capture = "nothing interesting here";
    let status = classify(capture, capture, AgentStatus::Error, &ruleset());
    assert_eq!(status, AgentStatus::Error);
}

#[parameterized(
    working = { AgentStatus::Working },
    idle = { AgentStatus::Idle },
    starting = { AgentStatus::Starting },
)]
fn retains_every_non_terminal_prior_status_when_nothing_changes(prior_status: AgentStatus) {
    let capture = "steady state output";
    assert_eq!(
        classify(capture, capture, prior_status, &ruleset()),
        prior_status
    );
}

#[test]
fn custom_ruleset_markers_are_honored() {
    let mut rs = ruleset();
    rs.waiting_input_markers = vec!["CONFIRM?".to_string()];
    let capture = "CONFIRM? [y/n]";
    assert_eq!(
        classify(capture, "", AgentStatus::Working, &rs),
        AgentStatus::WaitingInput
    );
}

#[test]
fn extract_response_returns_text_between_last_turn_markers() {
    let capture = "Human: do the thing\nAssistant: done, here's the summary.\n";
    let extracted = extract_response(capture, 4000, &ruleset()).unwrap();
    assert_eq!(extracted, "done, here's the summary.");
}

#[test]
fn extract_response_excludes_echoed_user_input_after_the_turn() {
    let capture =
        "Assistant: first reply\nHuman: follow up question\nAssistant: second reply\n";
    let extracted = extract_response(capture, 4000, &ruleset()).unwrap();
    assert_eq!(extracted, "second reply");
}

#[test]
fn extract_response_falls_back_to_largest_block_without_markers() {
    let capture = "short\n\nthis is the largest non-blank block of text here\n\ntiny";
    let extracted = extract_response(capture, 4000, &ruleset()).unwrap();
    assert_eq!(extracted, "this is the largest non-blank block of text here");
}

#[test]
fn extract_response_truncates_to_max_len() {
    let capture = format!("Assistant: {}", "x".repeat(5000));
    let extracted = extract_response(&capture, 100, &ruleset()).unwrap();
    assert_eq!(extracted.chars().count(), 100);
}

#[test]
fn extract_response_none_for_blank_capture() {
    assert!(extract_response("   \n\n  ", 4000, &ruleset()).is_none());
}

#[test]
fn extract_response_honors_configured_markers() {
    let mut rs = ruleset();
    rs.response_start_marker = "AI:".to_string();
    rs.response_end_marker = "User:".to_string();
    let capture = "User: do the thing\nAI: done, here's the summary.\n";
    let extracted = extract_response(capture, 4000, &rs).unwrap();
    assert_eq!(extracted, "done, here's the summary.");
}
