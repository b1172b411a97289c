// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling Scheduler: the single periodic driver described in spec §4.6.
//! Every tick captures each non-stopped agent's pane, runs the Status
//! Inference Engine against the prior capture, and applies whatever side
//! effects the transition calls for — all mutation goes through
//! `AgentManager`, never a private `HashMap`.

use crate::manager::AgentManager;
use af_adapters::inference::{self, InferenceRuleset};
use af_adapters::session::SessionAdapter;
use af_core::{AgentStatus, Event, UpdateMessage};
use std::sync::Arc;
use std::time::Duration;

/// Cap on an extracted `last_response`, matching `Agent::LAST_OUTPUT_CAP`
/// since both are meant to fit a single chat-message relay.
const RESPONSE_CAP: usize = 4000;

/// Drives one poll cycle across every live agent, then sleeps for
/// `poll_interval` and repeats, until the owning task is dropped.
pub struct Scheduler<S: SessionAdapter> {
    manager: Arc<AgentManager<S>>,
    ruleset: InferenceRuleset,
    poll_interval: Duration,
}

impl<S: SessionAdapter> Scheduler<S> {
    pub fn new(manager: Arc<AgentManager<S>>, poll_interval: Duration) -> Self {
        Self {
            manager,
            ruleset: InferenceRuleset::default(),
            poll_interval,
        }
    }

    /// Run the polling loop forever. Intended to be the body of a
    /// dedicated `tokio::spawn`'d task from the composition root.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            self.tick_once().await;
        }
    }

    /// One pass over every live agent. Exposed separately from `run` so
    /// tests can drive single ticks deterministically instead of racing
    /// a real interval.
    pub async fn tick_once(&self) {
        for agent in self.manager.live_agents() {
            self.poll_one(&agent.id, &agent.session_name, agent.status, &agent.last_output)
                .await;
        }

        let live_agents = self.manager.live_agents();
        let needs_attention = live_agents.iter().filter(|a| a.needs_attention).count() as u32;
        self.manager.sink().publish(UpdateMessage::MetricsUpdate {
            live_agents: live_agents.len() as u32,
            needs_attention,
        });
    }

    async fn poll_one(
        &self,
        id: &af_core::AgentId,
        session_name: &str,
        prior_status: AgentStatus,
        prior_capture: &str,
    ) {
        let exists = self.manager.sessions().exists(session_name).await.unwrap_or(false);
        if !exists {
            self.handle_stopped(id, prior_status);
            return;
        }

        let capture = match self.manager.sessions().capture(session_name, None).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(session = session_name, error = %e, "scheduler: capture failed, skipping this tick");
                return;
            }
        };

        let status = inference::classify(&capture, prior_capture, prior_status, &self.ruleset);
        let last_response = if prior_status == AgentStatus::Working && status == AgentStatus::Idle {
            inference::extract_response(&capture, RESPONSE_CAP, &self.ruleset)
        } else {
            None
        };

        let Some((prior, updated)) = self
            .manager
            .apply_poll_result(id, status, &capture, last_response.clone())
        else {
            return;
        };

        self.manager.store().save_snapshot(&updated);
        self.manager
            .sink()
            .publish(UpdateMessage::AgentUpdate { agent: updated.clone() });

        if prior == status {
            return;
        }

        self.manager.store().log_event(&Event::StatusChange {
            agent_id: id.clone(),
            project: updated.project.clone(),
            from: prior.to_string(),
            to: status.to_string(),
        });

        match status {
            AgentStatus::WaitingInput => {
                self.manager.store().log_event(&Event::WaitingInput {
                    agent_id: id.clone(),
                    project: updated.project.clone(),
                });
            }
            AgentStatus::Error => {
                self.manager.store().log_event(&Event::Error {
                    agent_id: id.clone(),
                    project: updated.project.clone(),
                    message: inference::extract_response(&capture, RESPONSE_CAP, &self.ruleset)
                        .unwrap_or_else(|| "agent entered an error state".to_string()),
                });
            }
            AgentStatus::Idle => {
                if let Some(text) = last_response {
                    self.manager.store().log_event(&Event::AgentResponse {
                        agent_id: id.clone(),
                        project: updated.project.clone(),
                        text,
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_stopped(&self, id: &af_core::AgentId, prior_status: AgentStatus) {
        if prior_status == AgentStatus::Stopped {
            return;
        }
        let Some((_, updated)) = self
            .manager
            .apply_poll_result(id, AgentStatus::Stopped, "", None)
        else {
            return;
        };
        self.manager.store().save_snapshot(&updated);
        self.manager.store().log_event(&Event::Crashed {
            agent_id: id.clone(),
            project: updated.project.clone(),
        });
        self.manager
            .sink()
            .publish(UpdateMessage::AgentUpdate { agent: updated });
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
