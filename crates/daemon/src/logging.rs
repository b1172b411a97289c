// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: a rotating file appender plus `RUST_LOG`-driven
//! filtering, matching the teacher's daemon logging discipline.

use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Cap on the log file before it's rotated out from under the daemon.
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

/// Shift `daemon.log.2 -> daemon.log.3`, ..., `daemon.log -> daemon.log.1`
/// when the current log has grown past `MAX_LOG_SIZE`. Best-effort: a
/// missing or unreadable log file is not an error, it just means nothing
/// to rotate yet.
pub fn rotate_log_if_needed(log_path: &Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

/// Install the global tracing subscriber, writing to `log_path` through a
/// non-blocking appender. The returned guard must be held for the
/// process's lifetime — dropping it stops the background flush thread.
pub fn init(log_path: &Path) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("daemon.log"));
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
