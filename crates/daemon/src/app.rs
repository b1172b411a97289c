// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `App`: the composition root that wires together every subsystem
//! named in spec §2's dependency order. Nothing here is process-global —
//! an `App` is an explicitly constructed, explicitly torn-down service,
//! per the "no implicit globals" design note (spec §9).

use af_adapters::session::SessionAdapter;
use af_bridge::BridgeRegistry;
use af_connectors::registry::ConnectorRegistry;
use af_connectors::router::Router;
use af_core::{AgentId, AgentStatus, Config, ConfigError, Event, UpdateMessage, UpdateSink};
use af_engine::{recovery, AgentManager, Scheduler};
use af_storage::Store;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::hook::HookEvent;
use crate::hub::BroadcastHub;

/// Every live subsystem, held together long enough for the process (or
/// a test) to drive it and then tear it down in dependency order.
pub struct App<S: SessionAdapter> {
    pub config: Arc<RwLock<Config>>,
    pub store: Arc<Store>,
    pub manager: Arc<AgentManager<S>>,
    pub hub: BroadcastHub,
    pub connectors: Arc<ConnectorRegistry>,
    pub router: Arc<Router<S>>,
    pub bridges: BridgeRegistry<S>,
    scheduler_handle: JoinHandle<()>,
    notifier_handle: JoinHandle<()>,
}

impl<S: SessionAdapter> App<S> {
    /// Build and start every subsystem: opens recovery (spec §4.5) against
    /// whatever snapshots `store` already holds, starts every enabled
    /// connector, and spawns the Polling Scheduler's loop plus the task
    /// that turns its updates into outbound connector notifications.
    pub async fn start(
        sessions: S,
        config: Config,
        store: Arc<Store>,
        hook_endpoint: impl Into<String>,
    ) -> Self {
        let config = Arc::new(RwLock::new(config));
        let hub = BroadcastHub::new(256, Duration::from_secs(30));
        let sink: Arc<dyn UpdateSink> = Arc::new(hub.clone());

        let manager = Arc::new(AgentManager::new(
            sessions.clone(),
            store.clone(),
            config.clone(),
            sink,
            hook_endpoint,
        ));

        let report = recovery::recover(&manager).await;
        if !report.readopted.is_empty() || !report.crashed.is_empty() {
            tracing::info!(
                readopted = ?report.readopted,
                crashed = ?report.crashed,
                "recovery complete"
            );
        }

        let connectors = Arc::new(ConnectorRegistry::new());
        let instances: Vec<_> = config.read().connectors.values().cloned().collect();
        connectors.start_all(&instances).await;

        let router = Arc::new(Router::new(manager.clone(), config.clone(), connectors.clone()));
        let bridges = BridgeRegistry::new(sessions, Duration::from_millis(200), Duration::from_secs(5));

        let poll_interval = Duration::from_secs(config.read().defaults.poll_interval_seconds.max(1));
        let scheduler = Scheduler::new(manager.clone(), poll_interval);
        let scheduler_handle = tokio::spawn(async move { scheduler.run().await });

        let notifier_handle = spawn_notifier(hub.clone(), router.clone());

        Self {
            config,
            store,
            manager,
            hub,
            connectors,
            router,
            bridges,
            scheduler_handle,
            notifier_handle,
        }
    }

    /// Record a `SubagentStart`/`SubagentStop` hook event (spec §6's
    /// `POST /api/hooks/event`). The HTTP layer that parses the request
    /// body is an external collaborator; this is the thin contract it
    /// calls into.
    pub fn handle_hook_event(&self, agent_id: &str, event: HookEvent) {
        let id = AgentId::new(agent_id);
        let agent = match event {
            HookEvent::SubagentStart => self.manager.record_subagent_start(&id),
            HookEvent::SubagentStop => self.manager.record_subagent_stop(&id),
        };
        let Some(agent) = agent else {
            tracing::warn!(agent_id, "hook event for unknown agent, dropping");
            return;
        };

        let log_event = match event {
            HookEvent::SubagentStart => Event::SubAgentStart {
                agent_id: id,
                project: agent.project.clone(),
            },
            HookEvent::SubagentStop => Event::SubAgentStop {
                agent_id: id,
                project: agent.project.clone(),
            },
        };
        self.store.log_event(&log_event);
        self.store.save_snapshot(&agent);
        self.hub.publish(UpdateMessage::AgentUpdate { agent });
    }

    /// Atomically swap the live config (spec §6's `POST
    /// /api/config/reload`), then reconcile connector instances against
    /// the new set.
    pub async fn reload_config(&self, new_config: Config) -> Result<(), ConfigError> {
        new_config.validate()?;
        let instances: Vec<_> = new_config.connectors.values().cloned().collect();
        *self.config.write() = new_config;
        self.connectors.reconcile(&instances).await;
        Ok(())
    }

    /// Global shutdown, in the order spec §5 requires: scheduler first,
    /// then connectors, then bridges (dropped with this `App`), then the
    /// store (closed on drop).
    pub async fn shutdown(self) {
        self.scheduler_handle.abort();
        self.notifier_handle.abort();
        self.connectors.stop_all().await;
    }
}

/// Bridges Scheduler output to outbound connector notifications: tracks
/// the last status seen per agent so it can detect a transition from a
/// stream of `AgentUpdate`s that carry only the current status, then
/// calls `Router::notify_transition` — the one place in the system where
/// the (synchronous) `UpdateSink::publish` call site and the (async)
/// connector send are stitched back together.
fn spawn_notifier<S: SessionAdapter>(hub: BroadcastHub, router: Arc<Router<S>>) -> JoinHandle<()> {
    let subscription = hub.subscribe();
    tokio::spawn(async move {
        let mut last_status: HashMap<AgentId, AgentStatus> = HashMap::new();
        loop {
            let message = subscription.recv().await;
            if let UpdateMessage::AgentUpdate { agent } = message {
                let prior = last_status.insert(agent.id.clone(), agent.status);
                router.notify_transition(prior, &agent).await;
            }
        }
    })
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
