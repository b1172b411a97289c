// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broadcast Hub (spec §4.8): fans typed `UpdateMessage`s out to every
//! subscribed UI client. Each subscriber gets a bounded mailbox; when it
//! overflows, the oldest queued message is dropped rather than blocking
//! the publisher — unordered across subscribers, FIFO per subscriber,
//! matching the teacher's drop-oldest bridge backpressure model (see
//! `af-bridge::BridgeRegistry`) applied to a different payload type.

use af_core::{UpdateMessage, UpdateSink};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};

/// Per-subscriber bounded mailbox. `Notify` wakes a blocked `recv()` when
/// a message lands; `VecDeque` is the queue itself, capped at
/// `capacity`.
struct Mailbox {
    queue: Mutex<VecDeque<UpdateMessage>>,
    notify: Notify,
    capacity: usize,
}

impl Mailbox {
    fn push(&self, message: UpdateMessage) {
        let mut queue = self.queue.lock();
        if queue.len() >= self.capacity {
            queue.pop_front();
        }
        queue.push_back(message);
        drop(queue);
        self.notify.notify_waiters();
    }
}

struct Inner {
    subscribers: Mutex<HashMap<u64, Arc<Mailbox>>>,
    next_id: AtomicU64,
    mailbox_capacity: usize,
    ping_tx: watch::Sender<u64>,
}

/// Owns every subscriber's mailbox. Cheap to clone (internally an
/// `Arc`), matching this workspace's constructed-once-in-main service
/// style.
#[derive(Clone)]
pub struct BroadcastHub(Arc<Inner>);

impl BroadcastHub {
    /// Build a hub whose subscriber mailboxes hold at most
    /// `mailbox_capacity` queued messages, and whose liveness ping ticks
    /// every `ping_interval` (spec: "a 30s liveness ping channel is
    /// supported").
    pub fn new(mailbox_capacity: usize, ping_interval: Duration) -> Self {
        let (ping_tx, _) = watch::channel(0u64);
        let hub = Self(Arc::new(Inner {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            mailbox_capacity,
            ping_tx,
        }));
        hub.spawn_ping_loop(ping_interval);
        hub
    }

    fn spawn_ping_loop(&self, interval: Duration) {
        let tx = self.0.ping_tx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut tick: u64 = 0;
            loop {
                ticker.tick().await;
                tick += 1;
                // No receivers left means every client disconnected; the
                // task is harmless to keep running, it just ticks quietly.
                let _ = tx.send(tick);
            }
        });
    }

    /// Register a new subscriber and return its handle.
    pub fn subscribe(&self) -> Subscription {
        let id = self.0.next_id.fetch_add(1, Ordering::SeqCst);
        let mailbox = Arc::new(Mailbox {
            queue: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            capacity: self.0.mailbox_capacity,
        });
        self.0.subscribers.lock().insert(id, mailbox.clone());

        Subscription {
            hub: self.clone(),
            id,
            mailbox,
            ping: self.0.ping_tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subscribers.lock().len()
    }

    fn unsubscribe(&self, id: u64) {
        self.0.subscribers.lock().remove(&id);
    }
}

impl UpdateSink for BroadcastHub {
    fn publish(&self, message: UpdateMessage) {
        let subscribers = self.0.subscribers.lock();
        for mailbox in subscribers.values() {
            mailbox.push(message.clone());
        }
    }
}

/// One client's subscription. Dropping it removes the mailbox from the
/// hub.
pub struct Subscription {
    hub: BroadcastHub,
    id: u64,
    mailbox: Arc<Mailbox>,
    ping: watch::Receiver<u64>,
}

impl Subscription {
    /// Pop the oldest queued message, waiting if the mailbox is empty.
    ///
    /// The `notified()` future is built *before* the queue is checked, per
    /// tokio's documented pattern for this race: `notify_waiters()` wakes
    /// only futures that already exist, so a `push` landing between the
    /// check and the await would otherwise be missed until the next one.
    pub async fn recv(&self) -> UpdateMessage {
        loop {
            let notified = self.mailbox.notify.notified();
            if let Some(message) = self.mailbox.queue.lock().pop_front() {
                return message;
            }
            notified.await;
        }
    }

    /// Non-blocking pop, for callers that poll alongside other work.
    pub fn try_recv(&self) -> Option<UpdateMessage> {
        self.mailbox.queue.lock().pop_front()
    }

    /// Wait for the next 30s liveness tick. An external WS layer can
    /// `select!` this against `recv()` to know the connection is still
    /// alive even during a quiet period.
    pub async fn ping(&mut self) {
        let _ = self.ping.changed().await;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
