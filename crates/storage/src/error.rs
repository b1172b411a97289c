// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `StoreError`: the error handling design's "persistence write failed"
//! taxonomy entry. Per spec §7, a `StoreError` is logged and dropped by
//! every mutating call (`log_event`, `save_snapshot`) — in-memory state
//! remains authoritative. Only the recovery read path (`load_snapshots`)
//! propagates it, since a failed recovery scan has no safe default.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to (de)serialize event payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot row for agent {0} has an unrecognized status {1:?}")]
    UnknownStatus(String, String),
}
