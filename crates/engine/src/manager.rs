// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent Manager: the lifecycle authority (spec §4.5). Owns the
//! in-memory agent table exclusively — the Scheduler and every other
//! caller mutate agent fields only through this type's methods.
//!
//! Concurrency: operations on the same agent are serialized by an
//! id-keyed lock (each entry is an `Arc<Mutex<Agent>>`, looked up under
//! a shared `RwLock` over the table); operations on different agents
//! proceed in parallel. Spawn holds a per-project `tokio::sync::Mutex`
//! long enough to re-check the cap under contention.

use crate::launch::{self, ControlAction, SequenceStep};
use crate::start_sequence;
use af_adapters::session::SessionAdapter;
use af_adapters::workspace;
use af_core::{Agent, AgentId, AgentStatus, Config, Event, HexIdGen, IdGen, ManagerError, UpdateMessage, UpdateSink};
use af_storage::Store;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_COLS: u32 = 220;
const DEFAULT_ROWS: u32 = 50;

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The in-memory table entry: an `Arc` so the table's `RwLock` is held
/// only long enough to clone the handle, and a `Mutex` so two operations
/// on the same agent serialize without blocking operations on others.
type Entry = Arc<Mutex<Agent>>;

pub struct AgentManager<S: SessionAdapter> {
    sessions: S,
    store: Arc<Store>,
    config: Arc<RwLock<Config>>,
    sink: Arc<dyn UpdateSink>,
    entries: RwLock<HashMap<AgentId, Entry>>,
    project_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    id_gen: HexIdGen,
    hook_endpoint: String,
}

impl<S: SessionAdapter> AgentManager<S> {
    pub fn new(
        sessions: S,
        store: Arc<Store>,
        config: Arc<RwLock<Config>>,
        sink: Arc<dyn UpdateSink>,
        hook_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            store,
            config,
            sink,
            entries: RwLock::new(HashMap::new()),
            project_locks: Mutex::new(HashMap::new()),
            id_gen: HexIdGen,
            hook_endpoint: hook_endpoint.into(),
        }
    }

    fn project_lock(&self, project: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.project_locks
            .lock()
            .entry(project.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn live_count(&self, project: &str) -> u32 {
        self.entries
            .read()
            .values()
            .filter(|e| {
                let a = e.lock();
                a.project == project && !a.status.is_terminal()
            })
            .count() as u32
    }

    fn workspace_root(&self, project_path: &std::path::Path, project: &str, id: &str) -> PathBuf {
        project_path
            .parent()
            .unwrap_or(project_path)
            .join(".forge-workspaces")
            .join(project)
            .join(id)
    }

    /// Spawn a new agent into `project`, per spec §4.5's operations
    /// table. Preconditions: project exists, `live_count(project) < max`.
    pub async fn spawn(
        &self,
        project: &str,
        task: &str,
        branch_prefix: &str,
        profile_name: Option<&str>,
    ) -> Result<Agent, ManagerError> {
        let (defaults, project_cfg, profile) = {
            let cfg = self.config.read();
            let project_cfg = cfg
                .projects
                .get(project)
                .cloned()
                .ok_or_else(|| ManagerError::ProjectNotFound(project.to_string()))?;
            let profile = profile_name
                .and_then(|name| cfg.profiles.get(name).cloned());
            (cfg.defaults.clone(), project_cfg, profile)
        };

        let project_lock = self.project_lock(project);
        let _guard = project_lock.lock().await;

        if self.live_count(project) >= project_cfg.max_agents {
            return Err(ManagerError::CapExceeded(project.to_string()));
        }

        let id = AgentId::new(self.id_gen.next());
        let branch_name = workspace::branch_name(branch_prefix, id.as_str(), task);
        let session_name = Agent::session_name_for(project, &id);
        let workspace_path = self.workspace_root(&project_cfg.path, project, id.as_str());

        workspace::provision(
            &project_cfg.path,
            &workspace_path,
            &branch_name,
            &project_cfg.default_branch,
        )
        .await
        .map_err(|e| ManagerError::ProvisionFailed(e.to_string()))?;

        let context_files: Vec<String> = project_cfg
            .context_files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        if let Err(e) = workspace::write_instructions(
            &workspace_path,
            &defaults.agent_instructions,
            &project_cfg.agent_instructions,
            &context_files,
        ) {
            tracing::warn!(error = %e, "failed to write agent instructions, continuing");
        }
        if let Err(e) = workspace::write_hook_settings(&workspace_path, id.as_str(), &self.hook_endpoint) {
            tracing::warn!(error = %e, "failed to write hook settings, continuing");
        }
        if let Err(e) = workspace::ensure_media_dir(&workspace_path) {
            tracing::warn!(error = %e, "failed to create media dir, continuing");
        }

        let cmd = launch::build_command(&defaults, &project_cfg, profile.as_ref());
        let env = launch::build_env(&defaults);

        if let Err(e) = self
            .sessions
            .create(&session_name, &workspace_path, &cmd, &env, DEFAULT_COLS, DEFAULT_ROWS)
            .await
        {
            let _ = workspace::teardown(&project_cfg.path, &workspace_path, &branch_name).await;
            return Err(ManagerError::SessionStartFailed(e.to_string()));
        }

        let now = now_epoch_ms();
        let agent = Agent {
            id: id.clone(),
            project: project.to_string(),
            session_name,
            workspace_path,
            branch_name,
            status: AgentStatus::Starting,
            created_at_epoch_ms: now,
            last_activity_epoch_ms: now,
            task: task.to_string(),
            profile_name: profile_name.map(|s| s.to_string()),
            sub_agent_count: 0,
            needs_attention: false,
            parked: false,
            last_output: String::new(),
            last_response: None,
            last_user_message: None,
        };

        self.entries
            .write()
            .insert(id.clone(), Arc::new(Mutex::new(agent.clone())));

        self.store.log_event(&Event::Spawned {
            agent_id: id.clone(),
            project: project.to_string(),
            task: task.to_string(),
            profile: profile_name.map(|s| s.to_string()),
        });
        self.store.save_snapshot(&agent);
        self.sink.publish(UpdateMessage::AgentUpdate { agent: agent.clone() });

        if let Some(profile) = profile {
            if !profile.start_sequence.is_empty() {
                let sessions = self.sessions.clone();
                let session_name = agent.session_name.clone();
                let sequence = profile.start_sequence.clone();
                tokio::spawn(async move {
                    start_sequence::replay(&sessions, &session_name, &sequence).await;
                });
            }
        }

        Ok(agent)
    }

    /// End a session and remove its workspace. Idempotent at the
    /// `ManagerError::NotFound` level: killing twice returns `NotFound`
    /// on the second call without panicking.
    pub async fn kill(&self, id: &AgentId) -> Result<(), ManagerError> {
        let entry = self
            .entries
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| ManagerError::NotFound(id.to_string()))?;

        let (session_name, project, workspace_path, branch_name, repo_path) = {
            let agent = entry.lock();
            let repo_path = {
                let cfg = self.config.read();
                cfg.projects.get(&agent.project).map(|p| p.path.clone())
            };
            (
                agent.session_name.clone(),
                agent.project.clone(),
                agent.workspace_path.clone(),
                agent.branch_name.clone(),
                repo_path,
            )
        };

        let _ = self.sessions.kill(&session_name).await;
        if let Some(repo_path) = repo_path {
            let _ = workspace::teardown(&repo_path, &workspace_path, &branch_name).await;
        }

        {
            let mut agent = entry.lock();
            agent.status = AgentStatus::Stopped;
            self.store.save_snapshot(&agent);
            self.sink.publish(UpdateMessage::AgentUpdate { agent: agent.clone() });
        }

        self.store.log_event(&Event::Killed {
            agent_id: id.clone(),
            project,
        });

        self.entries.write().remove(id);
        Ok(())
    }

    /// `kill` followed by `spawn` with the same `(project, task,
    /// profile)`; returns the new agent under a new id, per spec §8's
    /// round-trip property.
    pub async fn restart(&self, id: &AgentId) -> Result<Agent, ManagerError> {
        let (project, task, profile_name, prefix) = {
            let entry = self
                .entries
                .read()
                .get(id)
                .cloned()
                .ok_or_else(|| ManagerError::NotFound(id.to_string()))?;
            let agent = entry.lock();
            let prefix = agent
                .branch_name
                .split('/')
                .next()
                .unwrap_or("agent")
                .to_string();
            (agent.project.clone(), agent.task.clone(), agent.profile_name.clone(), prefix)
        };

        self.kill(id).await?;
        let new_agent = self
            .spawn(&project, &task, &prefix, profile_name.as_deref())
            .await?;

        self.store.log_event(&Event::Restarted {
            agent_id: new_agent.id.clone(),
            project,
            previous_agent_id: id.clone(),
        });

        Ok(new_agent)
    }

    /// Send literal text + Enter to the agent's session, per spec §4.5.
    pub async fn send_message(&self, id: &AgentId, text: &str) -> Result<(), ManagerError> {
        let entry = self.require_live(id)?;
        let session_name = {
            let agent = entry.lock();
            agent.session_name.clone()
        };

        self.sessions
            .send_text(&session_name, text)
            .await
            .map_err(|e| ManagerError::SessionStartFailed(e.to_string()))?;
        self.sessions
            .send_control(&session_name, af_adapters::session::ControlKey::Enter)
            .await
            .map_err(|e| ManagerError::SessionStartFailed(e.to_string()))?;

        {
            let mut agent = entry.lock();
            agent.last_user_message = Some(text.to_string());
            agent.last_activity_epoch_ms = now_epoch_ms();
            self.store.save_snapshot(&agent);
        }

        self.store.log_event(&Event::UserMessage {
            agent_id: id.clone(),
            project: entry.lock().project.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    /// Translate `action` to the key sequences in spec §4.5's table and
    /// send them. `Restart` is special-cased to the full restart path.
    pub async fn send_control(&self, id: &AgentId, action: ControlAction) -> Result<(), ManagerError> {
        if action == ControlAction::Restart {
            self.restart(id).await?;
            return Ok(());
        }

        let entry = self.require_live(id)?;
        let session_name = {
            let agent = entry.lock();
            agent.session_name.clone()
        };

        for step in launch::control_sequence(action) {
            let result = match step {
                SequenceStep::Text(text) => self.sessions.send_text(&session_name, &text).await,
                SequenceStep::Control(key) => self.sessions.send_control(&session_name, key).await,
            };
            result.map_err(|e| ManagerError::SessionStartFailed(e.to_string()))?;
        }

        entry.lock().last_activity_epoch_ms = now_epoch_ms();
        Ok(())
    }

    fn require_live(&self, id: &AgentId) -> Result<Entry, ManagerError> {
        let entry = self
            .entries
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| ManagerError::NotFound(id.to_string()))?;
        if entry.lock().status.is_terminal() {
            return Err(ManagerError::Terminated(id.to_string()));
        }
        Ok(entry)
    }

    pub fn list(&self) -> Vec<Agent> {
        self.entries.read().values().map(|e| e.lock().clone()).collect()
    }

    pub fn get(&self, id: &AgentId) -> Option<Agent> {
        self.entries.read().get(id).map(|e| e.lock().clone())
    }

    pub fn by_project(&self, project: &str) -> Vec<Agent> {
        self.entries
            .read()
            .values()
            .map(|e| e.lock().clone())
            .filter(|a| a.project == project)
            .collect()
    }

    /// Every non-stopped agent, for the Polling Scheduler to iterate.
    pub fn live_agents(&self) -> Vec<Agent> {
        self.entries
            .read()
            .values()
            .map(|e| e.lock().clone())
            .filter(|a| !a.status.is_terminal())
            .collect()
    }

    /// Apply an inferred status/capture to an agent's in-memory record.
    /// The only path by which the Scheduler mutates agent fields, per
    /// spec §3's ownership rule. Returns the prior status and the
    /// updated agent, or `None` if the agent isn't in the table (it was
    /// explicitly killed mid-poll).
    pub fn apply_poll_result(
        &self,
        id: &AgentId,
        status: AgentStatus,
        last_output: &str,
        last_response: Option<String>,
    ) -> Option<(AgentStatus, Agent)> {
        let entry = self.entries.read().get(id).cloned()?;
        let mut agent = entry.lock();
        let prior_status = agent.status;
        agent.status = status;
        agent.set_last_output(last_output);
        agent.last_activity_epoch_ms = now_epoch_ms();
        if let Some(response) = last_response {
            agent.last_response = Some(response);
        }
        agent.needs_attention = match status {
            AgentStatus::WaitingInput | AgentStatus::Error => true,
            AgentStatus::Working | AgentStatus::Idle => false,
            AgentStatus::Starting | AgentStatus::Stopped => agent.needs_attention,
        };
        Some((prior_status, agent.clone()))
    }

    /// Increment `sub_agent_count` on a `SubagentStart` hook event.
    pub fn record_subagent_start(&self, id: &AgentId) -> Option<Agent> {
        let entry = self.entries.read().get(id).cloned()?;
        let mut agent = entry.lock();
        agent.sub_agent_count += 1;
        Some(agent.clone())
    }

    /// Decrement `sub_agent_count` (floor 0) on a `SubagentStop` hook
    /// event.
    pub fn record_subagent_stop(&self, id: &AgentId) -> Option<Agent> {
        let entry = self.entries.read().get(id).cloned()?;
        let mut agent = entry.lock();
        agent.sub_agent_count = agent.sub_agent_count.saturating_sub(1);
        Some(agent.clone())
    }

    /// Re-adopt a recovered agent into the in-memory table (used by
    /// `crate::recovery` at startup).
    pub fn adopt(&self, agent: Agent) {
        self.entries.write().insert(agent.id.clone(), Arc::new(Mutex::new(agent)));
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn sink(&self) -> &Arc<dyn UpdateSink> {
        &self.sink
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
