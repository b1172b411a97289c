// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event & Snapshot Store: a single SQLite database behind a
//! single-writer `Mutex<Connection>`, matching the teacher's WAL
//! group-commit discipline in spirit (serialize writes, let reads proceed
//! freely) but backed by SQL tables per the external interfaces' literal
//! schema instead of a JSONL file pair.
//!
//! `log_event` and `save_snapshot` never propagate a `StoreError` to the
//! caller: per the error handling design, a persistence failure is logged
//! and dropped, and in-memory state remains authoritative. Only
//! `load_snapshots` (the recovery scan) and `recent_events` (a read path
//! with no safe silent default) return `Result`.

use crate::error::StoreError;
use crate::events::{EventFilter, EventRecord};
use crate::schema;
use af_core::{Agent, AgentId, AgentStatus, Event};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Append-only event log plus one-row-per-agent snapshot table, per
/// spec §4.3.
pub struct Store {
    conn: Mutex<Connection>,
}

fn status_str(status: AgentStatus) -> &'static str {
    match status {
        AgentStatus::Starting => "starting",
        AgentStatus::Working => "working",
        AgentStatus::WaitingInput => "waiting_input",
        AgentStatus::Idle => "idle",
        AgentStatus::Error => "error",
        AgentStatus::Stopped => "stopped",
    }
}

fn status_from_str(agent_id: &str, s: &str) -> Result<AgentStatus, StoreError> {
    match s {
        "starting" => Ok(AgentStatus::Starting),
        "working" => Ok(AgentStatus::Working),
        "waiting_input" => Ok(AgentStatus::WaitingInput),
        "idle" => Ok(AgentStatus::Idle),
        "error" => Ok(AgentStatus::Error),
        "stopped" => Ok(AgentStatus::Stopped),
        other => Err(StoreError::UnknownStatus(agent_id.to_string(), other.to_string())),
    }
}

impl Store {
    /// Open (creating if absent) the SQLite database at `path` and apply
    /// the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, for tests and ephemeral deployments.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one event row. Swallows and logs failures per the error
    /// handling design — callers never need to handle a `log_event`
    /// error.
    pub fn log_event(&self, event: &Event) {
        let (Some(agent_id), Some(project)) = (event.agent_id(), event.project()) else {
            // `Event::Custom` carries neither; nothing to index on, drop it.
            tracing::warn!("dropping event with no agent_id/project");
            return;
        };
        if let Err(e) = self.try_log_event(agent_id, project, event) {
            tracing::error!(error = %e, agent_id = %agent_id, "failed to log event");
        }
    }

    fn try_log_event(&self, agent_id: &AgentId, project: &str, event: &Event) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&event.to_payload())?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO events (agent_id, project, kind, payload, ts) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![agent_id.as_str(), project, event.kind(), payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Upsert the snapshot row for `agent.id`. Swallows and logs
    /// failures; the in-memory `Agent` the caller holds remains
    /// authoritative.
    pub fn save_snapshot(&self, agent: &Agent) {
        if let Err(e) = self.try_save_snapshot(agent) {
            tracing::error!(error = %e, agent_id = %agent.id, "failed to save snapshot");
        }
    }

    fn try_save_snapshot(&self, agent: &Agent) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO snapshots (
                agent_id, project, session_name, branch_name, status, task, profile,
                created_at, last_activity, last_response, last_user_message,
                sub_agent_count, needs_attention, location, parked, last_output
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)
             ON CONFLICT(agent_id) DO UPDATE SET
                project = excluded.project,
                session_name = excluded.session_name,
                branch_name = excluded.branch_name,
                status = excluded.status,
                task = excluded.task,
                profile = excluded.profile,
                last_activity = excluded.last_activity,
                last_response = excluded.last_response,
                last_user_message = excluded.last_user_message,
                sub_agent_count = excluded.sub_agent_count,
                needs_attention = excluded.needs_attention,
                location = excluded.location,
                parked = excluded.parked,
                last_output = excluded.last_output",
            params![
                agent.id.as_str(),
                agent.project,
                agent.session_name,
                agent.branch_name,
                status_str(agent.status),
                agent.task,
                agent.profile_name,
                agent.created_at_epoch_ms.to_string(),
                agent.last_activity_epoch_ms.to_string(),
                agent.last_response,
                agent.last_user_message,
                agent.sub_agent_count,
                agent.needs_attention as i64,
                agent.workspace_path.to_string_lossy().to_string(),
                agent.parked as i64,
                agent.last_output,
            ],
        )?;
        Ok(())
    }

    /// All snapshots whose status is not `stopped`, for recovery scans.
    pub fn load_snapshots(&self) -> Result<Vec<Agent>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT agent_id, project, session_name, branch_name, status, task, profile,
                    created_at, last_activity, last_response, last_user_message,
                    sub_agent_count, needs_attention, location, parked, last_output
             FROM snapshots WHERE status != 'stopped'",
        )?;
        let rows = stmt.query_map([], |row| {
            let agent_id: String = row.get(0)?;
            let status: String = row.get(4)?;
            let created_at: String = row.get(7)?;
            let last_activity: String = row.get(8)?;
            Ok((
                agent_id,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                status,
                row.get::<_, String>(5)?,
                row.get::<_, Option<String>>(6)?,
                created_at,
                last_activity,
                row.get::<_, Option<String>>(9)?,
                row.get::<_, Option<String>>(10)?,
                row.get::<_, u32>(11)?,
                row.get::<_, i64>(12)? != 0,
                row.get::<_, String>(13)?,
                row.get::<_, i64>(14)? != 0,
                row.get::<_, String>(15)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (
                agent_id,
                project,
                session_name,
                branch_name,
                status,
                task,
                profile,
                created_at,
                last_activity,
                last_response,
                last_user_message,
                sub_agent_count,
                needs_attention,
                location,
                parked,
                last_output,
            ) = row?;
            out.push(Agent {
                id: AgentId::new(agent_id.clone()),
                project,
                session_name,
                workspace_path: location.into(),
                branch_name,
                status: status_from_str(&agent_id, &status)?,
                created_at_epoch_ms: created_at.parse().unwrap_or(0),
                last_activity_epoch_ms: last_activity.parse().unwrap_or(0),
                task,
                profile_name: profile,
                sub_agent_count,
                needs_attention,
                parked,
                last_output,
                last_response,
                last_user_message,
            });
        }
        Ok(out)
    }

    /// Chronological tail query (oldest first) matching `filter`, capped
    /// at `limit` rows, reading the most recent `limit` rows.
    pub fn recent_events(&self, filter: &EventFilter, limit: usize) -> Result<Vec<EventRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut sql = String::from(
            "SELECT id, agent_id, project, kind, payload, ts FROM events WHERE 1=1",
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(agent_id) = &filter.agent_id {
            sql.push_str(" AND agent_id = ?");
            args.push(Box::new(agent_id.as_str().to_string()));
        }
        if let Some(project) = &filter.project {
            sql.push_str(" AND project = ?");
            args.push(Box::new(project.clone()));
        }
        if let Some(kind) = &filter.kind {
            sql.push_str(" AND kind = ?");
            args.push(Box::new(kind.clone()));
        }
        sql.push_str(" ORDER BY id DESC LIMIT ?");
        args.push(Box::new(limit as i64));

        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = args.iter().map(|b| b.as_ref()).collect();
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            let payload_text: String = row.get(4)?;
            let ts_text: String = row.get(5)?;
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                payload_text,
                ts_text,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, agent_id, project, kind, payload_text, ts_text) = row?;
            let payload = serde_json::from_str(&payload_text)?;
            let ts = chrono::DateTime::parse_from_rfc3339(&ts_text)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            out.push(EventRecord {
                id,
                agent_id: AgentId::new(agent_id),
                project,
                kind,
                payload,
                ts,
            });
        }
        // Rows came back newest-first (for an efficient LIMIT); restore
        // chronological order for callers doing a tail-replay.
        out.reverse();
        Ok(out)
    }

    /// Whether a snapshot row exists for `agent_id`, mainly for tests
    /// asserting the single-row invariant.
    pub fn snapshot_exists(&self, agent_id: &AgentId) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM snapshots WHERE agent_id = ?1",
                params![agent_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
