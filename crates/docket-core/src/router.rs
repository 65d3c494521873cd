//! Session router: correlates inbound messages with outstanding offers.
//!
//! One concurrency-safe map, keyed by candidate identity, owned by the
//! router rather than scattered per-session state. A reply matches only if
//! its sender currently has an outstanding offer; everything else is
//! `Unmatched` and silently dropped — unrelated chatter must never crash a
//! flow.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::domain::{AssignmentId, ContactId};

/// Routing verdict for one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Forwarded to the flow awaiting this candidate's reply.
    Delivered,
    /// No outstanding offer for this sender; message dropped.
    Unmatched,
}

struct Outstanding {
    assignment_id: AssignmentId,
    tx: mpsc::UnboundedSender<String>,
}

/// Dispatcher-owned registry of outstanding offers.
///
/// Lock discipline: std mutex, short critical sections, never held across an
/// await. `route` is sync so any transport callback can call it directly.
#[derive(Default)]
pub struct SessionRouter {
    outstanding: Mutex<HashMap<ContactId, Outstanding>>,
}

impl SessionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `candidate` as awaiting a reply for `assignment_id`.
    ///
    /// Returns `None` if the candidate already has an outstanding offer
    /// (some other flow got there first); the caller skips the candidate.
    /// The subscription removes its entry on drop, so a reply arriving after
    /// the offer is destroyed routes as `Unmatched`.
    pub fn subscribe(
        self: &Arc<Self>,
        candidate: ContactId,
        assignment_id: AssignmentId,
    ) -> Option<OfferSubscription> {
        let mut map = self.outstanding.lock().expect("router lock poisoned");
        if map.contains_key(&candidate) {
            return None;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        map.insert(candidate.clone(), Outstanding { assignment_id, tx });

        Some(OfferSubscription {
            candidate,
            assignment_id,
            rx,
            router: Arc::clone(self),
        })
    }

    /// Match an inbound message against the outstanding offers.
    pub fn route(&self, sender: &ContactId, text: &str) -> Routed {
        let map = self.outstanding.lock().expect("router lock poisoned");
        match map.get(sender) {
            Some(entry) if entry.tx.send(text.to_string()).is_ok() => Routed::Delivered,
            _ => Routed::Unmatched,
        }
    }

    /// How many offers are currently outstanding (observability hook).
    pub fn outstanding_count(&self) -> usize {
        self.outstanding.lock().expect("router lock poisoned").len()
    }

    fn unsubscribe(&self, candidate: &ContactId, assignment_id: AssignmentId) {
        let mut map = self.outstanding.lock().expect("router lock poisoned");
        // Only remove our own entry; a newer subscription for the same
        // candidate must survive this drop.
        if map
            .get(candidate)
            .is_some_and(|entry| entry.assignment_id == assignment_id)
        {
            map.remove(candidate);
        }
    }
}

/// Live registration of one outstanding offer. Owns the map entry: dropping
/// the subscription deregisters the candidate.
pub struct OfferSubscription {
    candidate: ContactId,
    assignment_id: AssignmentId,
    rx: mpsc::UnboundedReceiver<String>,
    router: Arc<SessionRouter>,
}

impl OfferSubscription {
    /// Next routed message from this candidate. `None` cannot occur while
    /// the subscription is alive (it holds the sending half's map entry).
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl Drop for OfferSubscription {
    fn drop(&mut self) {
        self.router.unsubscribe(&self.candidate, self.assignment_id);
    }
}
