// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed configuration record, consumed (not parsed) by the core per
//! the spec's scope line: config file parsing is an external collaborator.
//! This module defines the shape every other crate agrees on and a thin
//! `toml` loader for it, since something has to own deserialization of
//! the on-disk record even though validating/merging semantics live here.

use crate::connector::ConnectorInstance;
use crate::profile::Profile;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub max_agents_per_project: u32,
    #[serde(default)]
    pub sandbox: bool,
    pub claude_command: String,
    #[serde(default)]
    pub claude_env: IndexMap<String, String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default)]
    pub agent_instructions: String,
}

fn default_poll_interval() -> u64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub path: PathBuf,
    pub default_branch: String,
    pub max_agents: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub agent_instructions: String,
    #[serde(default)]
    pub context_files: Vec<PathBuf>,
    #[serde(default)]
    pub sandbox: Option<bool>,
    #[serde(default)]
    pub channels: Vec<crate::connector::ChannelBinding>,
}

/// Top-level configuration record, matching the schema in the spec's
/// External Interfaces section verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub profiles: IndexMap<String, Profile>,
    #[serde(default)]
    pub projects: IndexMap<String, ProjectConfig>,
    #[serde(default)]
    pub connectors: IndexMap<String, ConnectorInstance>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("project {0:?} references a path that does not exist")]
    MissingProjectPath(String),
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(s)?;
        for (id, connector) in &mut config.connectors {
            connector.id = id.clone();
        }
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Validate invariants that are cheap to check at load/reload time and
    /// whose violation should never be fatal after boot, per the error
    /// taxonomy (`ConfigError` is "never fatal after boot").
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, project) in &self.projects {
            if !project.path.exists() {
                return Err(ConfigError::MissingProjectPath(name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
