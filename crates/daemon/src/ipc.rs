// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Unix-socket server half of `protocol`: accepts one connection per
//! request from `af-cli`, reads one length-prefixed `Request` frame,
//! dispatches into the [`crate::App`]'s `AgentManager`, and writes back
//! one `Response` frame. Kept deliberately dumb (no session affinity, no
//! streaming) since the spec's real-time surfaces are the WebSocket
//! routes (external, per scope) and the Terminal Bridge — this socket
//! only carries the spawn/list/kill/send control-plane calls spec
//! §4.5's operations table implies an operator CLI needs.

use std::path::Path;
use std::sync::Arc;

use af_adapters::session::SessionAdapter;
use af_core::AgentId;
use af_engine::launch::ControlAction;
use af_engine::AgentManager;
use tokio::net::{UnixListener, UnixStream};

use crate::protocol::{read_request, write_response, Request, Response, DEFAULT_TIMEOUT};

const DEFAULT_BRANCH_PREFIX: &str = "agent";

/// Bind `socket_path` and serve requests until the process exits. Any
/// stale socket file left behind by a crashed prior instance is removed
/// first — the single-instance lock (`InstanceLock`) is what actually
/// prevents two daemons from racing, this is just cleanup so `bind`
/// doesn't fail with `AddrInUse` against a dead peer.
pub async fn serve_ipc<S: SessionAdapter>(
    socket_path: &Path,
    manager: Arc<AgentManager<S>>,
) -> std::io::Result<()> {
    let _ = std::fs::remove_file(socket_path);
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let listener = UnixListener::bind(socket_path)?;
    tracing::info!(path = %socket_path.display(), "ipc socket listening");

    loop {
        let (stream, _addr) = listener.accept().await?;
        let manager = manager.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, manager).await {
                tracing::debug!(error = %e, "ipc connection ended");
            }
        });
    }
}

async fn handle_connection<S: SessionAdapter>(
    mut stream: UnixStream,
    manager: Arc<AgentManager<S>>,
) -> Result<(), crate::protocol::ProtocolError> {
    let request = read_request(&mut stream, DEFAULT_TIMEOUT).await?;
    let response = dispatch(&manager, request).await;
    write_response(&mut stream, &response, DEFAULT_TIMEOUT).await
}

async fn dispatch<S: SessionAdapter>(manager: &Arc<AgentManager<S>>, request: Request) -> Response {
    match request {
        Request::Spawn { project, task, profile } => {
            match manager
                .spawn(&project, &task, DEFAULT_BRANCH_PREFIX, profile.as_deref())
                .await
            {
                Ok(agent) => Response::Agent { agent },
                Err(e) => Response::Error { message: e.to_string() },
            }
        }
        Request::List => Response::Agents { agents: manager.list() },
        Request::Get { id } => match manager.get(&AgentId::new(id)) {
            Some(agent) => Response::Agent { agent },
            None => Response::NotFound,
        },
        Request::Kill { id } => match manager.kill(&AgentId::new(id)).await {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error { message: e.to_string() },
        },
        Request::Restart { id } => match manager.restart(&AgentId::new(id)).await {
            Ok(agent) => Response::Agent { agent },
            Err(e) => Response::Error { message: e.to_string() },
        },
        Request::SendMessage { id, text } => {
            match manager.send_message(&AgentId::new(id), &text).await {
                Ok(()) => Response::Ok,
                Err(e) => Response::Error { message: e.to_string() },
            }
        }
        Request::SendControl { id, action } => match ControlAction::parse(&action) {
            Some(action) => match manager.send_control(&AgentId::new(id), action).await {
                Ok(()) => Response::Ok,
                Err(e) => Response::Error { message: e.to_string() },
            },
            None => Response::Error {
                message: format!("unknown control action {action:?}"),
            },
        },
    }
}
