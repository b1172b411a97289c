// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound message routing and outbound state-transition notifications,
//! per spec §4.9's six routing rules and notification taxonomy.

use crate::connector::{Attachment, InboundMessage, ReplyButton};
use crate::registry::ConnectorRegistry;
use af_adapters::session::SessionAdapter;
use af_adapters::workspace;
use af_core::{Agent, AgentId, AgentStatus, Config};
use af_engine::{AgentManager, ControlAction};
use parking_lot::RwLock;
use std::sync::Arc;

/// Separates the callback id's agent and action halves, e.g.
/// `a1b2c3:approve`.
const CALLBACK_SEP: char = ':';

/// Build the `callback_id` for one action button attached to a
/// waiting-input notification.
pub fn button_callback_id(agent_id: &AgentId, action: ControlAction) -> String {
    let action = match action {
        ControlAction::Approve => "approve",
        ControlAction::Reject => "reject",
        ControlAction::Interrupt => "interrupt",
        _ => "approve",
    };
    format!("{agent_id}{CALLBACK_SEP}{action}")
}

fn parse_callback(callback_id: &str) -> Option<(AgentId, ControlAction)> {
    let (id, action) = callback_id.split_once(CALLBACK_SEP)?;
    Some((AgentId::new(id), ControlAction::parse(action)?))
}

/// Routes inbound platform traffic to agents and pushes outbound state
/// notifications back out to bound channels.
pub struct Router<S: SessionAdapter> {
    manager: Arc<AgentManager<S>>,
    config: Arc<RwLock<Config>>,
    connectors: Arc<ConnectorRegistry>,
}

impl<S: SessionAdapter> Router<S> {
    pub fn new(
        manager: Arc<AgentManager<S>>,
        config: Arc<RwLock<Config>>,
        connectors: Arc<ConnectorRegistry>,
    ) -> Self {
        Self { manager, config, connectors }
    }

    /// Every project whose `channels` list has an inbound binding to
    /// `(connector_id, channel_id)`.
    fn inbound_bound_projects(&self, connector_id: &str, channel_id: &str) -> Vec<String> {
        self.config
            .read()
            .projects
            .iter()
            .filter(|(_, p)| {
                p.channels
                    .iter()
                    .any(|c| c.connector_id == connector_id && c.channel_id == channel_id && c.inbound)
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn most_recent_agent(&self, project: &str) -> Option<Agent> {
        self.manager
            .by_project(project)
            .into_iter()
            .filter(|a| !a.status.is_terminal())
            .max_by_key(|a| a.created_at_epoch_ms)
    }

    /// Stage every attachment under the target agent's `.media/` directory,
    /// per rule 5, before the message text is forwarded.
    async fn stage_attachments(&self, agent: &Agent, attachments: &[Attachment]) {
        let media_dir = match workspace::ensure_media_dir(&agent.workspace_path) {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!(agent_id = %agent.id, error = %e, "failed to stage attachments, continuing");
                return;
            }
        };
        for attachment in attachments {
            let path = media_dir.join(&attachment.file_name);
            if let Err(e) = tokio::fs::write(&path, &attachment.bytes).await {
                tracing::warn!(agent_id = %agent.id, file = %attachment.file_name, error = %e, "failed to write staged attachment");
            }
        }
    }

    async fn deliver(&self, agent: &Agent, msg: &InboundMessage) {
        self.stage_attachments(agent, &msg.attachments).await;
        if let Some(text) = &msg.text {
            if let Err(e) = self.manager.send_message(&agent.id, text).await {
                tracing::warn!(agent_id = %agent.id, error = %e, "failed to deliver inbound message");
            }
        }
    }

    /// Dispatch one inbound message per spec §4.9's routing rules.
    pub async fn handle_inbound(&self, msg: InboundMessage) {
        let bound_projects = self.inbound_bound_projects(&msg.connector_id, &msg.channel_id);
        if bound_projects.is_empty() {
            tracing::debug!(connector_id = %msg.connector_id, channel_id = %msg.channel_id, "ignoring message on an unbound channel");
            return;
        }

        if let Some(callback_id) = &msg.button_callback {
            if let Some((agent_id, action)) = parse_callback(callback_id) {
                if let Err(e) = self.manager.send_control(&agent_id, action).await {
                    tracing::warn!(agent_id = %agent_id, error = %e, "failed to apply button callback");
                }
            }
            return;
        }

        let Some(text) = msg.text.as_deref() else {
            return;
        };

        if let Some(rest) = text.strip_prefix('/') {
            self.dispatch_command(&msg, rest).await;
            return;
        }

        if let Some(rest) = text.strip_prefix('@') {
            let (target, remainder) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let (project, explicit_id) = match target.split_once(':') {
                Some((p, id)) => (p, Some(id)),
                None => (target, None),
            };
            if !bound_projects.iter().any(|p| p == project) {
                return;
            }
            let agent = match explicit_id {
                Some(id) => self.manager.get(&AgentId::new(id)),
                None => self.most_recent_agent(project),
            };
            if let Some(agent) = agent {
                let mut forwarded = msg.clone();
                forwarded.text = Some(remainder.trim().to_string());
                self.deliver(&agent, &forwarded).await;
            }
            return;
        }

        if bound_projects.len() == 1 {
            if let Some(agent) = self.most_recent_agent(&bound_projects[0]) {
                self.deliver(&agent, &msg).await;
            }
        }
    }

    async fn dispatch_command(&self, msg: &InboundMessage, rest: &str) {
        let mut parts = rest.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let reply = match verb {
            "status" => self.status_reply(),
            "projects" => self.projects_reply(),
            "spawn" => self.spawn_reply(parts.collect::<Vec<_>>()).await,
            "kill" => self.kill_reply(parts.next()).await,
            _ => format!("unknown command: /{rest}"),
        };
        self.reply_to(msg, &reply).await;
    }

    fn status_reply(&self) -> String {
        let agents = self.manager.list();
        if agents.is_empty() {
            return "no agents running".to_string();
        }
        agents
            .iter()
            .map(|a| format!("{} [{}] {} - {}", a.id, a.project, a.status, a.task))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn projects_reply(&self) -> String {
        let cfg = self.config.read();
        if cfg.projects.is_empty() {
            return "no projects configured".to_string();
        }
        cfg.projects
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn spawn_reply(&self, args: Vec<&str>) -> String {
        let Some((project, task_parts)) = args.split_first() else {
            return "usage: /spawn project [task]".to_string();
        };
        let task = if task_parts.is_empty() {
            "(no task given)".to_string()
        } else {
            task_parts.join(" ")
        };
        match self.manager.spawn(project, &task, "agent", None).await {
            Ok(agent) => format!("spawned {} in {}", agent.id, project),
            Err(e) => format!("spawn failed: {e}"),
        }
    }

    async fn kill_reply(&self, id: Option<&str>) -> String {
        let Some(id) = id else {
            return "usage: /kill id".to_string();
        };
        let agent_id = AgentId::new(id);
        match self.manager.kill(&agent_id).await {
            Ok(()) => format!("killed {id}"),
            Err(e) => format!("kill failed: {e}"),
        }
    }

    async fn reply_to(&self, msg: &InboundMessage, text: &str) {
        if let Some(connector) = self.connectors.connector(&msg.connector_id) {
            let _ = connector.send_text(&msg.channel_id, text, &[]).await;
        }
    }

    /// Outbound-bound channels for a project, per rule for notifications.
    fn outbound_bindings(&self, project: &str) -> Vec<(String, String)> {
        self.config
            .read()
            .projects
            .get(project)
            .map(|p| {
                p.channels
                    .iter()
                    .filter(|c| c.outbound)
                    .map(|c| (c.connector_id.clone(), c.channel_id.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn notify(&self, agent: &Agent, text: &str, buttons: &[ReplyButton]) {
        for (connector_id, channel_id) in self.outbound_bindings(&agent.project) {
            if let Some(connector) = self.connectors.connector(&connector_id) {
                if let Err(e) = connector.send_text(&channel_id, text, buttons).await {
                    tracing::warn!(connector_id, channel_id, error = %e, "failed to deliver outbound notification");
                }
            }
        }
    }

    /// Push the taxonomic notification for a status transition, per spec
    /// §4.9. Called by the daemon's scheduler-update hook on each
    /// `AgentUpdate`. `prior` is `None` on an agent's first observed
    /// update, which always counts as a transition worth notifying —
    /// otherwise the *agent-started* notification would never fire.
    pub async fn notify_transition(&self, prior: Option<AgentStatus>, agent: &Agent) {
        if prior == Some(agent.status) {
            return;
        }
        match agent.status {
            AgentStatus::Starting => {
                self.notify(agent, &format!("agent {} started: {}", agent.id, agent.task), &[])
                    .await;
            }
            AgentStatus::WaitingInput => {
                let buttons = vec![
                    ReplyButton {
                        label: "Approve".to_string(),
                        callback_id: button_callback_id(&agent.id, ControlAction::Approve),
                    },
                    ReplyButton {
                        label: "Reject".to_string(),
                        callback_id: button_callback_id(&agent.id, ControlAction::Reject),
                    },
                    ReplyButton {
                        label: "Interrupt".to_string(),
                        callback_id: button_callback_id(&agent.id, ControlAction::Interrupt),
                    },
                ];
                self.notify(
                    agent,
                    &format!("agent {} is waiting for input", agent.id),
                    &buttons,
                )
                .await;
            }
            AgentStatus::Idle => {
                let preview = agent.last_response.as_deref().unwrap_or("(no response captured)");
                self.notify(agent, &format!("agent {} is idle: {preview}", agent.id), &[])
                    .await;
            }
            AgentStatus::Error => {
                let tail = af_core::agent::bounded_tail(&agent.last_output, 400);
                self.notify(agent, &format!("agent {} hit an error:\n{tail}", agent.id), &[])
                    .await;
            }
            AgentStatus::Stopped => {
                self.notify(agent, &format!("agent {} stopped", agent.id), &[])
                    .await;
            }
            AgentStatus::Working => {}
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
