// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-connector-instance lifecycle, per spec §4.9's state machine
//! (`disabled -> starting -> running <-> reconnecting -> stopping ->
//! stopped`) and its config hot-reload reconciliation rule: new ids
//! start, removed ids stop, changed credentials trigger a restart.

use crate::connector::Connector;
use crate::http_connector::HttpConnector;
use af_core::{ConnectorInstance, ConnectorState};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

struct Entry {
    connector: Arc<dyn Connector>,
    state: ConnectorState,
    credentials_fingerprint: String,
}

/// Build the concrete `Connector` for a configured instance. Only one
/// implementation (`HttpConnector`, templated per `ConnectorKind`) exists
/// today; this is the single seam a second transport would plug into.
fn build_connector(instance: &ConnectorInstance) -> Arc<dyn Connector> {
    let token = instance
        .credentials
        .0
        .get("token")
        .cloned()
        .unwrap_or_default();
    Arc::new(HttpConnector::new(instance.id.clone(), instance.kind, &token))
}

fn credentials_fingerprint(instance: &ConnectorInstance) -> String {
    let mut pairs: Vec<_> = instance.credentials.0.iter().collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Owns every configured connector's running instance and lifecycle
/// state, keyed by instance id.
#[derive(Default)]
pub struct ConnectorRegistry {
    entries: Mutex<HashMap<String, Entry>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, id: &str) -> Option<ConnectorState> {
        self.entries.lock().get(id).map(|e| e.state)
    }

    pub fn connector(&self, id: &str) -> Option<Arc<dyn Connector>> {
        self.entries.lock().get(id).map(|e| e.connector.clone())
    }

    /// Register an already-running connector directly, bypassing
    /// `build_connector`'s `HttpConnector`-only construction. Used by
    /// router tests to inject a recording fake in place of real HTTP.
    #[cfg(test)]
    pub fn insert_test_connector(&self, id: &str, connector: Arc<dyn Connector>) {
        self.entries.lock().insert(
            id.to_string(),
            Entry {
                connector,
                state: ConnectorState::Running,
                credentials_fingerprint: String::new(),
            },
        );
    }

    fn transition(&self, entries: &mut HashMap<String, Entry>, id: &str, next: ConnectorState) {
        if let Some(entry) = entries.get_mut(id) {
            if entry.state.can_transition_to(next) {
                entry.state = next;
            } else {
                tracing::warn!(id, from = ?entry.state, to = ?next, "connector: rejected an invalid state transition");
            }
        }
    }

    /// Start every enabled connector not already tracked, per `disabled ->
    /// starting -> running`.
    pub async fn start_all(&self, instances: &[ConnectorInstance]) {
        for instance in instances.iter().filter(|i| i.enabled) {
            self.start_one(instance).await;
        }
    }

    async fn start_one(&self, instance: &ConnectorInstance) {
        let connector = build_connector(instance);
        {
            let mut entries = self.entries.lock();
            entries.insert(
                instance.id.clone(),
                Entry {
                    connector: connector.clone(),
                    state: ConnectorState::Disabled,
                    credentials_fingerprint: credentials_fingerprint(instance),
                },
            );
            self.transition(&mut entries, &instance.id, ConnectorState::Starting);
        }

        match connector.start().await {
            Ok(()) => {
                let mut entries = self.entries.lock();
                self.transition(&mut entries, &instance.id, ConnectorState::Running);
            }
            Err(e) => {
                tracing::error!(id = %instance.id, error = %e, "connector failed to start");
                let mut entries = self.entries.lock();
                entries.remove(&instance.id);
            }
        }
    }

    async fn stop_one(&self, id: &str) {
        let connector = {
            let mut entries = self.entries.lock();
            self.transition(&mut entries, id, ConnectorState::Stopping);
            entries.get(id).map(|e| e.connector.clone())
        };
        if let Some(connector) = connector {
            let _ = connector.stop().await;
        }
        let mut entries = self.entries.lock();
        self.transition(&mut entries, id, ConnectorState::Stopped);
        entries.remove(id);
    }

    /// Stop every tracked connector, for global shutdown.
    pub async fn stop_all(&self) {
        let ids: Vec<String> = self.entries.lock().keys().cloned().collect();
        for id in ids {
            self.stop_one(&id).await;
        }
    }

    /// Reconcile against a freshly reloaded config: connectors present in
    /// `new` but not tracked are started; tracked connectors absent from
    /// `new` (or disabled) are stopped; tracked connectors whose
    /// credentials changed are restarted.
    pub async fn reconcile(&self, new: &[ConnectorInstance]) {
        let tracked: Vec<String> = self.entries.lock().keys().cloned().collect();
        let new_ids: Vec<&str> = new.iter().map(|i| i.id.as_str()).collect();

        for id in &tracked {
            if !new_ids.contains(&id.as_str()) {
                self.stop_one(id).await;
            }
        }

        for instance in new {
            if !instance.enabled {
                if tracked.contains(&instance.id) {
                    self.stop_one(&instance.id).await;
                }
                continue;
            }

            let needs_restart = {
                let entries = self.entries.lock();
                match entries.get(&instance.id) {
                    Some(entry) => entry.credentials_fingerprint != credentials_fingerprint(instance),
                    None => true,
                }
            };

            if needs_restart {
                if tracked.contains(&instance.id) {
                    self.stop_one(&instance.id).await;
                }
                self.start_one(instance).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
