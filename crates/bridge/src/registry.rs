// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session bridge lifecycle, per spec §4.7: a bridge is created on
//! first subscriber and destroyed when the last subscriber leaves, after
//! a short linger in case a reconnect is already underway.
//!
//! The adapter contract (`af-adapters::SessionAdapter`) exposes only a
//! point-in-time `capture`, not an append-only byte stream, so the reader
//! task here polls and forwards the capture's growing suffix as if it
//! were the output stream; a capture that isn't an extension of the
//! prior one (a redraw, a resize) is forwarded whole as a resync frame.
//! Fan-out uses `tokio::sync::broadcast`, matching the Broadcast Hub's
//! lossy-per-subscriber backpressure model: a lagging subscriber's next
//! `recv()` returns `Lagged`, which callers treat as "resync from the
//! next frame" rather than a hard error.

use af_adapters::session::SessionAdapter;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

const CHANNEL_CAPACITY: usize = 256;
const MIN_RECONNECT_BACKOFF: Duration = Duration::from_secs(1);
const MAX_RECONNECT_BACKOFF: Duration = Duration::from_secs(30);

/// Trim `prior` off the front of `current` when `current` is a simple
/// extension of it; otherwise the pane was redrawn or resized and the
/// whole capture is forwarded as a fresh frame.
fn diff_suffix<'a>(prior: &str, current: &'a str) -> &'a str {
    match current.strip_prefix(prior) {
        Some(suffix) => suffix,
        None => current,
    }
}

struct SessionBridge {
    tx: broadcast::Sender<Bytes>,
    subscriber_count: AtomicUsize,
    stop: Arc<Notify>,
}

struct Inner<S: SessionAdapter> {
    sessions: S,
    bridges: Mutex<HashMap<String, Arc<SessionBridge>>>,
    poll_interval: Duration,
    linger: Duration,
}

/// Owns every live session's bridge. Cheap to clone: internally an
/// `Arc`, matching the rest of the workspace's constructed-once-in-main
/// service style.
pub struct BridgeRegistry<S: SessionAdapter>(Arc<Inner<S>>);

impl<S: SessionAdapter> Clone for BridgeRegistry<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S: SessionAdapter> BridgeRegistry<S> {
    pub fn new(sessions: S, poll_interval: Duration, linger: Duration) -> Self {
        Self(Arc::new(Inner {
            sessions,
            bridges: Mutex::new(HashMap::new()),
            poll_interval,
            linger,
        }))
    }

    /// Subscribe to `session_name`'s output, creating its bridge (and
    /// spawning its reader task) if this is the first subscriber.
    pub fn subscribe(&self, session_name: &str) -> BridgeSubscription<S> {
        let bridge = {
            let mut bridges = self.0.bridges.lock();
            bridges
                .entry(session_name.to_string())
                .or_insert_with(|| {
                    let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
                    let stop = Arc::new(Notify::new());
                    let bridge = Arc::new(SessionBridge {
                        tx,
                        subscriber_count: AtomicUsize::new(0),
                        stop: stop.clone(),
                    });
                    tokio::spawn(run_reader(
                        self.0.sessions.clone(),
                        session_name.to_string(),
                        bridge.tx.clone(),
                        stop,
                        self.0.poll_interval,
                    ));
                    bridge
                })
                .clone()
        };

        bridge.subscriber_count.fetch_add(1, Ordering::SeqCst);
        let receiver = bridge.tx.subscribe();

        BridgeSubscription {
            registry: self.clone(),
            session_name: session_name.to_string(),
            bridge,
            receiver,
        }
    }

    /// Forward literal keyboard input into the session, per spec §4.7's
    /// "subscriber's inbound bytes are forwarded to the session's
    /// keyboard" (text-only: the adapter contract has no raw-byte send).
    pub async fn send_input(&self, session_name: &str, text: &str) -> Result<(), af_adapters::session::SessionError> {
        self.0.sessions.send_text(session_name, text).await
    }

    /// Apply a subscriber-requested `{cols, rows}` resize.
    pub async fn resize(&self, session_name: &str, cols: u32, rows: u32) -> Result<(), af_adapters::session::SessionError> {
        self.0.sessions.resize(session_name, cols, rows).await
    }

    /// Whether `session_name` currently has a live bridge (a subscriber
    /// or one lingering after its last subscriber left).
    pub fn has_bridge(&self, session_name: &str) -> bool {
        self.0.bridges.lock().contains_key(session_name)
    }

    fn drop_subscriber(&self, session_name: &str, bridge: &Arc<SessionBridge>) {
        let remaining = bridge.subscriber_count.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining != 0 {
            return;
        }

        let registry = self.clone();
        let session_name = session_name.to_string();
        let bridge = bridge.clone();
        let linger = self.0.linger;
        tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            if bridge.subscriber_count.load(Ordering::SeqCst) != 0 {
                return;
            }
            bridge.stop.notify_one();
            registry.0.bridges.lock().remove(&session_name);
        });
    }
}

/// A single subscriber's handle on a session's bridge. Dropping it
/// decrements the bridge's subscriber count; if it was the last one, the
/// bridge lingers briefly before its reader task is torn down.
pub struct BridgeSubscription<S: SessionAdapter> {
    registry: BridgeRegistry<S>,
    session_name: String,
    bridge: Arc<SessionBridge>,
    pub receiver: broadcast::Receiver<Bytes>,
}

impl<S: SessionAdapter> Drop for BridgeSubscription<S> {
    fn drop(&mut self) {
        self.registry.drop_subscriber(&self.session_name, &self.bridge);
    }
}

async fn run_reader<S: SessionAdapter>(
    sessions: S,
    session_name: String,
    tx: broadcast::Sender<Bytes>,
    stop: Arc<Notify>,
    poll_interval: Duration,
) {
    let mut prior = String::new();
    let mut backoff = MIN_RECONNECT_BACKOFF;

    loop {
        tokio::select! {
            _ = stop.notified() => return,
            _ = tokio::time::sleep(poll_interval) => {}
        }

        match sessions.capture(&session_name, None).await {
            Ok(current) => {
                backoff = MIN_RECONNECT_BACKOFF;
                if current != prior {
                    let chunk = diff_suffix(&prior, &current);
                    if !chunk.is_empty() {
                        let _ = tx.send(Bytes::copy_from_slice(chunk.as_bytes()));
                    }
                    prior = current;
                }

                match sessions.exists(&session_name).await {
                    Ok(true) => {}
                    _ => return,
                }
            }
            Err(e) => {
                tracing::warn!(session = %session_name, error = %e, "bridge: capture failed, reconnecting with backoff");
                tokio::select! {
                    _ = stop.notified() => return,
                    _ = tokio::time::sleep(backoff) => {}
                }
                backoff = (backoff * 2).min(MAX_RECONNECT_BACKOFF);
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
