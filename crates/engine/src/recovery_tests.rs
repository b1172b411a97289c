// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{config_with_project, test_manager, TestRepo};
use af_core::test_support::test_agent;
use af_core::AgentStatus;

#[tokio::test]
async fn a_snapshot_whose_session_is_still_alive_is_readopted() {
    let repo = TestRepo::new();
    let config = config_with_project("demo", repo.path(), 2);
    let manager = test_manager(config);

    let mut agent = test_agent("a1b2c3", "demo");
    agent.status = AgentStatus::Working;
    manager.sessions().add_session(&agent.session_name, true);
    manager.sessions().set_output(&agent.session_name, vec!["Human: ".to_string()]);
    agent.sub_agent_count = 3;
    manager.store().save_snapshot(&agent);

    let report = recover(&manager).await;

    assert_eq!(report.readopted, vec!["a1b2c3".to_string()]);
    assert!(report.crashed.is_empty());
    let readopted = manager.get(&agent.id).expect("readopted into the live table");
    assert_eq!(readopted.sub_agent_count, 0);
    assert_ne!(readopted.status, AgentStatus::Stopped);
}

#[tokio::test]
async fn a_snapshot_whose_session_is_gone_is_marked_stopped_and_logged_as_crashed() {
    let repo = TestRepo::new();
    let config = config_with_project("demo", repo.path(), 2);
    let manager = test_manager(config);

    let mut agent = test_agent("d4e5f6", "demo");
    agent.status = AgentStatus::Idle;
    manager.store().save_snapshot(&agent);

    let report = recover(&manager).await;

    assert!(report.readopted.is_empty());
    assert_eq!(report.crashed, vec!["d4e5f6".to_string()]);
    let readopted = manager.get(&agent.id).expect("still present in the table");
    assert_eq!(readopted.status, AgentStatus::Stopped);
}

#[tokio::test]
async fn recover_with_no_snapshots_reports_nothing() {
    let repo = TestRepo::new();
    let config = config_with_project("demo", repo.path(), 2);
    let manager = test_manager(config);

    let report = recover(&manager).await;
    assert!(report.readopted.is_empty());
    assert!(report.crashed.is_empty());
}

#[tokio::test]
async fn stopped_snapshots_are_excluded_from_the_recovery_scan() {
    let repo = TestRepo::new();
    let config = config_with_project("demo", repo.path(), 2);
    let manager = test_manager(config);

    let mut agent = test_agent("111111", "demo");
    agent.status = AgentStatus::Stopped;
    manager.store().save_snapshot(&agent);

    let report = recover(&manager).await;
    assert!(report.readopted.is_empty());
    assert!(report.crashed.is_empty());
    assert!(manager.get(&agent.id).is_none());
}
