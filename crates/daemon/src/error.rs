// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-level startup errors. Per-subsystem errors (`ConfigError`,
//! `ProvisionError`, `StoreError`, ...) are surfaced directly from the
//! crate that owns the failing subsystem; this enum only covers the
//! composition root's own concerns.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("could not determine a state directory")]
    NoStateDir,

    #[error("another instance is already running (lock held at {0})")]
    AlreadyRunning(PathBuf),

    #[error("failed to load config: {0}")]
    Config(#[from] af_core::ConfigError),

    #[error("failed to open event/snapshot store: {0}")]
    Store(#[from] af_storage::StoreError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
