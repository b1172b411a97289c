// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agent-forge` — the daemon binary. Acquires the single-instance lock,
//! opens the store, builds the `App` composition root over a real
//! `TmuxAdapter`, serves the operator-CLI Unix socket, and waits for
//! `SIGINT`/`SIGTERM` to run the shutdown sequence spec §5 requires
//! (scheduler, then connectors, then bridges, then the store).
//!
//! Config parsing, the HTTP/WebSocket dispatch layer, and the
//! setup/service-install surfaces are external collaborators per spec
//! §1's scope line — this binary only loads the typed config record and
//! wires THE CORE together.

use std::sync::Arc;

use af_adapters::TmuxAdapter;
use af_core::Config;
use af_daemon::{App, InstanceLock, Paths};
use af_storage::Store;

fn config_path() -> std::path::PathBuf {
    std::env::var("AGENT_FORGE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("agent-forge.toml"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = Paths::resolve()?;
    af_daemon::logging::rotate_log_if_needed(&paths.log_path);
    let _log_guard = af_daemon::logging::init(&paths.log_path)?;

    let _lock = InstanceLock::acquire(&paths.lock_path)?;
    tracing::info!(state_dir = %paths.state_dir.display(), "agent-forge starting");

    let config = Config::load(&config_path())?;
    config.validate()?;

    let store = Arc::new(Store::open(&paths.db_path)?);
    let sessions = TmuxAdapter::new();

    let app = App::start(sessions, config, store, "http://127.0.0.1:0/api/hooks/event").await;

    let ipc_socket = paths.socket_path.clone();
    let manager = app.manager.clone();
    let ipc_handle = tokio::spawn(async move {
        if let Err(e) = af_daemon::serve_ipc(&ipc_socket, manager).await {
            tracing::error!(error = %e, "ipc server exited");
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    ipc_handle.abort();
    app.shutdown().await;
    let _ = std::fs::remove_file(&paths.socket_path);

    Ok(())
}
