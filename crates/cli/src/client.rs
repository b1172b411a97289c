// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin client for the daemon's control socket: one request frame in,
//! one response frame out, per connection. No auto-start, no retry loop —
//! spec §1 keeps interactive setup/service-install surfaces external, so
//! this CLI assumes `agent-forge` is already running and just fails
//! loudly if it isn't.

use std::path::PathBuf;

use af_daemon::protocol::{read_response, write_request, Request, Response, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use tokio::net::UnixStream;

pub struct Client {
    socket_path: PathBuf,
}

impl Client {
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    pub async fn call(&self, request: Request) -> Result<Response> {
        let mut stream = UnixStream::connect(&self.socket_path).await.with_context(|| {
            format!(
                "could not connect to {} — is `agent-forge` running?",
                self.socket_path.display()
            )
        })?;

        write_request(&mut stream, &request, DEFAULT_TIMEOUT).await?;
        let response = read_response(&mut stream, DEFAULT_TIMEOUT).await?;
        Ok(response)
    }
}
