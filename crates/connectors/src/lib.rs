// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! af-connectors: the Connector Router (spec §4.9) — a uniform
//! `Connector` contract per chat platform, a registry that drives each
//! instance's lifecycle state machine and config hot-reload
//! reconciliation, and a `Router` that dispatches inbound platform
//! traffic to agents and pushes outbound state-transition notifications
//! back out.

pub mod connector;
pub mod http_connector;
pub mod registry;
pub mod router;

pub use connector::{
    Attachment, ChannelInfo, Connector, InboundMessage, MediaKind, PlatformError, ReplyButton,
};
pub use http_connector::HttpConnector;
pub use registry::ConnectorRegistry;
pub use router::{button_callback_id, Router};
