// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recovery on process restart, per spec §4.5: read snapshots with
//! status != stopped; for each, check the multiplexer for its session
//! name; if present, readopt the agent with a freshly inferred status;
//! otherwise mark it stopped and log a crash event.
//!
//! Sub-agent counter reconciliation is not defined by the spec (§9's
//! Open Questions); the safest choice — reset to zero and let subsequent
//! hook events re-populate it — is applied here.

use crate::manager::AgentManager;
use af_adapters::inference::{self, InferenceRuleset};
use af_adapters::session::SessionAdapter;
use af_core::{AgentStatus, Event};

#[derive(Debug, Default, Clone)]
pub struct RecoveryReport {
    pub readopted: Vec<String>,
    pub crashed: Vec<String>,
}

/// Load live snapshots from the store, re-adopting every agent whose
/// session is still alive (with its status re-inferred from the current
/// pane) and marking the rest stopped with a logged crash event.
pub async fn recover<S: SessionAdapter>(manager: &AgentManager<S>) -> RecoveryReport {
    let mut report = RecoveryReport::default();
    let ruleset = InferenceRuleset::default();

    let snapshots = match manager.store().load_snapshots() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "recovery: failed to load snapshots, starting with an empty table");
            return report;
        }
    };

    for mut agent in snapshots {
        let exists = manager
            .sessions()
            .exists(&agent.session_name)
            .await
            .unwrap_or(false);

        agent.sub_agent_count = 0;

        if exists {
            let capture = manager
                .sessions()
                .capture(&agent.session_name, None)
                .await
                .unwrap_or_default();
            agent.status = inference::classify(&capture, "", agent.status, &ruleset);
            agent.set_last_output(&capture);
            manager.store().save_snapshot(&agent);
            report.readopted.push(agent.id.to_string());
            manager.adopt(agent);
        } else {
            agent.status = AgentStatus::Stopped;
            manager.store().save_snapshot(&agent);
            manager.store().log_event(&Event::Crashed {
                agent_id: agent.id.clone(),
                project: agent.project.clone(),
            });
            report.crashed.push(agent.id.to_string());
            manager.adopt(agent);
        }
    }

    report
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
