// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn spawned() -> Event {
    Event::Spawned {
        agent_id: AgentId::new("a1b2c3"),
        project: "api".to_string(),
        task: "fix bug".to_string(),
        profile: None,
    }
}

#[test]
fn serializes_with_type_tag() {
    let json = serde_json::to_value(spawned()).unwrap();
    assert_eq!(json["type"], "spawned");
    assert_eq!(json["agent_id"], "a1b2c3");
}

#[test]
fn unknown_type_tag_deserializes_to_custom() {
    let json = serde_json::json!({"type": "some_future_kind", "foo": "bar"});
    let event: Event = serde_json::from_value(json).unwrap();
    assert_eq!(event, Event::Custom);
}

#[test]
fn accessors_extract_agent_and_project() {
    let e = spawned();
    assert_eq!(e.agent_id().unwrap().as_str(), "a1b2c3");
    assert_eq!(e.project(), Some("api"));
    assert_eq!(e.kind(), "spawned");
}

#[test]
fn custom_has_no_agent_or_project() {
    assert_eq!(Event::Custom.agent_id(), None);
    assert_eq!(Event::Custom.project(), None);
}

#[test]
fn round_trips_through_json() {
    let e = Event::StatusChange {
        agent_id: AgentId::new("deadbe"),
        project: "web".to_string(),
        from: "working".to_string(),
        to: "idle".to_string(),
    };
    let json = e.to_payload();
    let back: Event = serde_json::from_value(json).unwrap();
    assert_eq!(back, e);
}
