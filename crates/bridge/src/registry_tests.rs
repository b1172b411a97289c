// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use af_adapters::FakeSessionAdapter;
use std::time::Duration;

#[test]
fn diff_suffix_trims_the_common_prefix() {
    assert_eq!(diff_suffix("hello", "hello world"), " world");
}

#[test]
fn diff_suffix_forwards_the_whole_frame_on_a_redraw() {
    assert_eq!(diff_suffix("hello world", "cleared screen"), "cleared screen");
}

#[tokio::test(start_paused = true)]
async fn first_subscriber_creates_a_bridge_and_receives_new_output() {
    let sessions = FakeSessionAdapter::new();
    sessions.add_session("forge__demo__a1b2c3", true);
    let registry = BridgeRegistry::new(sessions.clone(), Duration::from_millis(10), Duration::from_millis(50));

    let mut sub = registry.subscribe("forge__demo__a1b2c3");
    assert!(registry.has_bridge("forge__demo__a1b2c3"));

    sessions.set_output("forge__demo__a1b2c3", vec!["hello".to_string()]);
    tokio::time::advance(Duration::from_millis(20)).await;

    let chunk = sub.receiver.recv().await.expect("frame delivered");
    assert_eq!(chunk.as_ref(), b"hello");
}

#[tokio::test(start_paused = true)]
async fn two_subscribers_to_the_same_session_both_see_the_frame() {
    let sessions = FakeSessionAdapter::new();
    sessions.add_session("forge__demo__a1b2c3", true);
    let registry = BridgeRegistry::new(sessions.clone(), Duration::from_millis(10), Duration::from_millis(50));

    let mut sub_a = registry.subscribe("forge__demo__a1b2c3");
    let mut sub_b = registry.subscribe("forge__demo__a1b2c3");

    sessions.set_output("forge__demo__a1b2c3", vec!["hi".to_string()]);
    tokio::time::advance(Duration::from_millis(20)).await;

    assert_eq!(sub_a.receiver.recv().await.expect("a gets it").as_ref(), b"hi");
    assert_eq!(sub_b.receiver.recv().await.expect("b gets it").as_ref(), b"hi");
}

#[tokio::test(start_paused = true)]
async fn the_bridge_lingers_then_tears_down_after_the_last_subscriber_leaves() {
    let sessions = FakeSessionAdapter::new();
    sessions.add_session("forge__demo__a1b2c3", true);
    let registry = BridgeRegistry::new(sessions.clone(), Duration::from_millis(10), Duration::from_millis(50));

    let sub = registry.subscribe("forge__demo__a1b2c3");
    assert!(registry.has_bridge("forge__demo__a1b2c3"));
    drop(sub);

    tokio::time::advance(Duration::from_millis(10)).await;
    assert!(registry.has_bridge("forge__demo__a1b2c3"), "still within the linger");

    tokio::time::advance(Duration::from_millis(60)).await;
    tokio::task::yield_now().await;
    assert!(!registry.has_bridge("forge__demo__a1b2c3"), "torn down after linger");
}

#[tokio::test(start_paused = true)]
async fn a_resubscribe_within_the_linger_window_keeps_the_bridge_alive() {
    let sessions = FakeSessionAdapter::new();
    sessions.add_session("forge__demo__a1b2c3", true);
    let registry = BridgeRegistry::new(sessions.clone(), Duration::from_millis(10), Duration::from_millis(50));

    let sub = registry.subscribe("forge__demo__a1b2c3");
    drop(sub);
    tokio::time::advance(Duration::from_millis(10)).await;

    let _second = registry.subscribe("forge__demo__a1b2c3");
    tokio::time::advance(Duration::from_millis(60)).await;
    tokio::task::yield_now().await;

    assert!(registry.has_bridge("forge__demo__a1b2c3"), "kept alive by the new subscriber");
}

#[tokio::test]
async fn send_input_forwards_to_the_session_adapter() {
    let sessions = FakeSessionAdapter::new();
    sessions.add_session("forge__demo__a1b2c3", true);
    let registry = BridgeRegistry::new(sessions.clone(), Duration::from_millis(10), Duration::from_millis(50));

    registry
        .send_input("forge__demo__a1b2c3", "ping")
        .await
        .expect("send ok");

    let calls = sessions.calls();
    assert!(calls.iter().any(|c| matches!(
        c,
        af_adapters::session::SessionCall::SendText { text, .. } if text == "ping"
    )));
}

#[tokio::test]
async fn resize_forwards_to_the_session_adapter() {
    let sessions = FakeSessionAdapter::new();
    sessions.add_session("forge__demo__a1b2c3", true);
    let registry = BridgeRegistry::new(sessions.clone(), Duration::from_millis(10), Duration::from_millis(50));

    registry
        .resize("forge__demo__a1b2c3", 100, 40)
        .await
        .expect("resize ok");

    let session = sessions.get_session("forge__demo__a1b2c3").expect("present");
    assert_eq!((session.cols, session.rows), (100, 40));
}
