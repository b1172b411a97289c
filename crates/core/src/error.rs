// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcomes shared by Agent Manager operations across crates.
//!
//! The concrete per-subsystem error taxonomy (`ProvisionError`,
//! `SessionError`, `StoreError`, `InferenceError`, `PlatformError`) lives
//! in the crate that owns the failing subsystem (`af-adapters`,
//! `af-storage`, `af-connectors`) per the error handling design. This
//! module only holds the outcomes the spec's operations table names by
//! name, since callers across crates (engine, daemon, cli) all need to
//! match on them without depending on every subsystem's error enum.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcomes named in the Agent Manager operations table (spec §4.5) and
/// the boundary properties (spec §8).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ManagerError {
    #[error("project {0:?} is not configured")]
    ProjectNotFound(String),
    #[error("project {0:?} is at its agent cap")]
    CapExceeded(String),
    #[error("agent {0} not found")]
    NotFound(String),
    #[error("agent {0} has already terminated")]
    Terminated(String),
    #[error("workspace provisioning failed: {0}")]
    ProvisionFailed(String),
    #[error("session could not be started: {0}")]
    SessionStartFailed(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
