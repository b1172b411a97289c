// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two tables named verbatim by the external interfaces contract:
//! `events` (append-only) and `snapshots` (one row per agent, upserted).

use rusqlite::Connection;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    agent_id TEXT NOT NULL,
    project  TEXT NOT NULL,
    kind     TEXT NOT NULL,
    payload  TEXT NOT NULL,
    ts       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_agent_id ON events(agent_id);
CREATE INDEX IF NOT EXISTS idx_events_ts ON events(ts);

CREATE TABLE IF NOT EXISTS snapshots (
    agent_id           TEXT PRIMARY KEY,
    project            TEXT NOT NULL,
    session_name       TEXT NOT NULL,
    branch_name        TEXT NOT NULL,
    status             TEXT NOT NULL,
    task               TEXT NOT NULL,
    profile            TEXT,
    created_at         TEXT NOT NULL,
    last_activity      TEXT NOT NULL,
    last_response      TEXT,
    last_user_message  TEXT,
    sub_agent_count    INTEGER NOT NULL DEFAULT 0,
    needs_attention    INTEGER NOT NULL DEFAULT 0,
    location           TEXT NOT NULL,
    parked             INTEGER NOT NULL DEFAULT 0,
    last_output        TEXT NOT NULL DEFAULT ''
);
"#;

/// Apply the schema to a freshly opened connection. Idempotent: every
/// statement is `CREATE ... IF NOT EXISTS`.
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
