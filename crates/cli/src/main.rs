// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `af` — the minimal operator CLI against a running `agent-forge`
//! daemon. Interactive setup/service-install entry points are external
//! collaborators per spec §1's scope line; this binary only exposes the
//! spawn/list/kill/send/control surface the Agent Manager's operations
//! table (spec §4.5) implies a human or script needs.

mod client;
mod output;

use std::path::PathBuf;

use af_daemon::protocol::{Request, Response};
use anyhow::Result;
use clap::{Parser, Subcommand};

use client::Client;

#[derive(Parser)]
#[command(name = "af", version, about = "Operator CLI for the agent-forge daemon")]
struct Cli {
    /// Path to the daemon's control socket (defaults to the same
    /// resolution order as the daemon's state directory).
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Spawn a new agent in a project.
    Spawn {
        project: String,
        task: String,
        #[arg(long)]
        profile: Option<String>,
    },
    /// List every agent the daemon knows about.
    List,
    /// Show one agent by id.
    Get { id: String },
    /// Kill an agent: end its session, remove its workspace.
    Kill { id: String },
    /// Kill then re-spawn an agent with the same project/task/profile.
    Restart { id: String },
    /// Send a text message to an agent's session.
    Send { id: String, text: String },
    /// Send a control action (approve/reject/interrupt/up/down/...).
    Control { id: String, action: String },
}

fn default_socket_path() -> PathBuf {
    af_daemon::Paths::resolve()
        .map(|p| p.socket_path)
        .unwrap_or_else(|_| PathBuf::from("/tmp/agent-forge/daemon.sock"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let socket_path = cli.socket.unwrap_or_else(default_socket_path);
    let client = Client::new(socket_path);

    let request = match cli.command {
        Command::Spawn { project, task, profile } => Request::Spawn { project, task, profile },
        Command::List => Request::List,
        Command::Get { id } => Request::Get { id },
        Command::Kill { id } => Request::Kill { id },
        Command::Restart { id } => Request::Restart { id },
        Command::Send { id, text } => Request::SendMessage { id, text },
        Command::Control { id, action } => Request::SendControl { id, action },
    };

    let response = client.call(request).await?;
    output::print(&response);

    if matches!(response, Response::Error { .. } | Response::NotFound) {
        std::process::exit(1);
    }
    Ok(())
}
