// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Contract types for the two WebSocket routes named in spec §6. The
//! HTTP/WebSocket dispatch layer that terminates these connections is an
//! external collaborator per the scope line in spec §1; this module only
//! defines the message shapes it serializes onto the wire.
//!
//! `/ws`: server -> client frames are [`af_core::UpdateMessage`] (already
//! a `#[serde(tag = "type")]` enum with the `agent_update` /
//! `terminal_output` / `metrics_update` / `log_line` discriminants); the
//! client -> server direction is just the keep-alive defined here.
//!
//! `/ws/terminal/{agent_id}`: binary frames carry raw terminal I/O in both
//! directions (forwarded verbatim to/from [`af_bridge::BridgeRegistry`]);
//! text frames carry the resize directive defined here.

use serde::{Deserialize, Serialize};

/// The only client -> server text frame on `/ws`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
}

/// The only client -> server text frame on `/ws/terminal/{agent_id}`;
/// binary frames on that route are keystrokes, not `TerminalMessage`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerminalMessage {
    Resize { cols: u32, rows: u32 },
}
