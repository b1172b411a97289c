// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn control_keys_are_distinct() {
    assert_ne!(ControlKey::Enter, ControlKey::Escape);
    assert_eq!(ControlKey::CtrlC, ControlKey::CtrlC);
}

#[test]
fn session_error_messages_name_the_session() {
    let err = SessionError::NotFound("forge__api__a1b2c3".to_string());
    assert!(err.to_string().contains("forge__api__a1b2c3"));
}

#[test]
fn default_timeout_matches_spec_default() {
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(5));
}
