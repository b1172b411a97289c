// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! af-daemon: the composition root. Wires the Event & Snapshot Store,
//! Agent Manager, Polling Scheduler, Terminal Bridge Fan-out, Broadcast
//! Hub, and Connector Router into one running service and owns the
//! process-level concerns (single-instance lock, log rotation, graceful
//! shutdown) none of those subsystems should know about.
//!
//! The HTTP/WebSocket dispatch layer and config-file parsing are
//! external collaborators per the spec's scope line; this crate exposes
//! thin contracts for the two endpoints that layer forwards into THE
//! CORE (`App::handle_hook_event`, `App::reload_config`) rather than
//! implementing a web server itself.

pub mod app;
pub mod error;
pub mod hook;
pub mod hub;
pub mod ipc;
pub mod lock;
pub mod logging;
pub mod paths;
pub mod protocol;
pub mod ws_contract;

pub use app::App;
pub use error::DaemonError;
pub use hook::HookEvent;
pub use hub::{BroadcastHub, Subscription};
pub use ipc::serve_ipc;
pub use lock::InstanceLock;
pub use paths::Paths;
pub use protocol::{Request, Response};
