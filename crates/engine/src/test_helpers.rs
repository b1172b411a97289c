// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for this crate's tests: a real (tiny) git repo to
//! provision worktrees against, and a minimal `Config`/`AgentManager`
//! wired with the fake session adapter and an in-memory store.

use crate::manager::AgentManager;
use af_adapters::FakeSessionAdapter;
use af_core::{Config, DefaultsConfig, ProjectConfig, ServerConfig};
use af_core::{NullSink, UpdateSink};
use af_storage::Store;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::path::Path;
use std::process::Command as StdCommand;
use std::sync::Arc;
use tempfile::TempDir;

pub fn init_git_repo(dir: &Path) {
    let run = |args: &[&str]| {
        let status = StdCommand::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .status()
            .expect("git available");
        assert!(status.success());
    };
    run(&["init", "-q", "-b", "main"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "test"]);
    std::fs::write(dir.join("README.md"), "hello").expect("write readme");
    run(&["add", "."]);
    run(&["commit", "-q", "-m", "init"]);
}

pub struct TestRepo {
    pub dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        init_git_repo(dir.path());
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn config_with_project(name: &str, repo_path: &Path, max_agents: u32) -> Config {
    let mut projects = IndexMap::new();
    projects.insert(
        name.to_string(),
        ProjectConfig {
            path: repo_path.to_path_buf(),
            default_branch: "main".to_string(),
            max_agents,
            description: String::new(),
            agent_instructions: String::new(),
            context_files: Vec::new(),
            sandbox: None,
            channels: Vec::new(),
        },
    );

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            secret_key: "test".to_string(),
        },
        defaults: DefaultsConfig {
            max_agents_per_project: max_agents,
            sandbox: false,
            claude_command: "echo agent".to_string(),
            claude_env: IndexMap::new(),
            poll_interval_seconds: 3,
            agent_instructions: "Be careful.".to_string(),
        },
        profiles: IndexMap::new(),
        projects,
        connectors: IndexMap::new(),
    }
}

pub fn test_manager(config: Config) -> AgentManager<FakeSessionAdapter> {
    AgentManager::new(
        FakeSessionAdapter::new(),
        Arc::new(Store::open_in_memory().expect("open store")),
        Arc::new(RwLock::new(config)),
        Arc::new(NullSink) as Arc<dyn UpdateSink>,
        "http://127.0.0.1:8080/api/hooks/event",
    )
}
