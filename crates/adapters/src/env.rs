// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Polling scheduler tick interval override (default: 3000ms, per the
/// scheduler's configured default).
pub fn scheduler_poll_ms() -> Duration {
    parse_duration_ms("FORGE_SCHEDULER_POLL_MS").unwrap_or(Duration::from_secs(3))
}

/// `wait_for_idle` start-sequence directive poll interval (default: 500ms).
pub fn start_sequence_poll_ms() -> Duration {
    parse_duration_ms("FORGE_START_SEQUENCE_POLL_MS").unwrap_or(Duration::from_millis(500))
}
