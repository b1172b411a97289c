// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! af-bridge: Terminal Bridge Fan-out (spec §4.7). One reader per live
//! session multiplexes its pane output to every subscriber, forwards
//! subscriber input back into the session's keyboard, and applies resize
//! directives.

pub mod registry;

pub use registry::{BridgeRegistry, BridgeSubscription};
