// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn lifecycle_allows_documented_transitions() {
    assert!(ConnectorState::Disabled.can_transition_to(ConnectorState::Starting));
    assert!(ConnectorState::Starting.can_transition_to(ConnectorState::Running));
    assert!(ConnectorState::Running.can_transition_to(ConnectorState::Reconnecting));
    assert!(ConnectorState::Reconnecting.can_transition_to(ConnectorState::Running));
    assert!(ConnectorState::Running.can_transition_to(ConnectorState::Stopping));
    assert!(ConnectorState::Stopping.can_transition_to(ConnectorState::Stopped));
    assert!(ConnectorState::Stopped.can_transition_to(ConnectorState::Starting));
}

#[test]
fn lifecycle_rejects_skipped_states() {
    assert!(!ConnectorState::Disabled.can_transition_to(ConnectorState::Running));
    assert!(!ConnectorState::Stopped.can_transition_to(ConnectorState::Running));
    assert!(!ConnectorState::Starting.can_transition_to(ConnectorState::Reconnecting));
}

#[test]
fn credentials_debug_redacts_values() {
    let mut map = IndexMap::new();
    map.insert("token".to_string(), "super-secret".to_string());
    let creds = Credentials(map);
    let rendered = format!("{creds:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("redacted"));
}
