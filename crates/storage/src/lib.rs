// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! af-storage: the Event & Snapshot Store. A single SQLite database
//! (`rusqlite`, bundled) serializing writes behind one `Mutex<Connection>`,
//! exposing only `log_event` / `save_snapshot` / `load_snapshots` /
//! `recent_events` — callers never see raw SQL.

pub mod error;
pub mod events;
pub mod schema;
mod store;

pub use error::StoreError;
pub use events::{EventFilter, EventRecord};
pub use store::Store;
