//! Shared connection registry and broadcaster.
//!
//! The registry is the single contended resource in the hub: one ordered
//! collection of active sessions behind one mutex. Registration order is
//! observable (the operator directory lists members in join order and
//! username lookups take the first match), so the collection is a `Vec`
//! rather than a map.
//!
//! Broadcasts snapshot the membership under the guard and fan out to the
//! snapshot after releasing it, so a slow recipient can never stall
//! registry mutations or another broadcast's snapshot. Delivery failures
//! are isolated per recipient: the failed member is unregistered and the
//! fan-out continues.

use std::sync::Arc;

use hubbub_proto::Line;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::session::{Role, SessionHandle, SessionId};

/// Target subset of the registry for one envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Every registered session.
    All,
    /// Every registered session except one (the sender never hears its
    /// own message back).
    AllExcept(SessionId),
    /// Exactly one session.
    To(SessionId),
}

impl Routing {
    fn includes(&self, id: SessionId) -> bool {
        match self {
            Routing::All => true,
            Routing::AllExcept(except) => id != *except,
            Routing::To(target) => id == *target,
        }
    }
}

/// A routed outbound message: one line plus the subset it goes to.
/// Constructed per message, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// The framed line to deliver.
    pub line: Line,
    /// Which registered sessions receive it.
    pub routing: Routing,
}

impl Envelope {
    /// Envelope for every registered session.
    pub fn all(line: Line) -> Self {
        Self {
            line,
            routing: Routing::All,
        }
    }

    /// Envelope for everyone except `sender`.
    pub fn all_except(line: Line, sender: SessionId) -> Self {
        Self {
            line,
            routing: Routing::AllExcept(sender),
        }
    }

    /// Envelope for a single recipient.
    pub fn to(line: Line, target: SessionId) -> Self {
        Self {
            line,
            routing: Routing::To(target),
        }
    }
}

/// The shared set of currently active sessions.
pub struct Registry {
    members: Mutex<Vec<Arc<SessionHandle>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Vec::new()),
        }
    }

    /// Add a session. A session id is registered at most once; usernames
    /// are NOT required to be unique (lookups take the first match in
    /// registration order).
    pub fn register(&self, handle: Arc<SessionHandle>) {
        let mut members = self.members.lock();
        if members.iter().any(|member| member.id == handle.id) {
            warn!(uid = %handle.id, username = %handle.username, "Session already registered");
            return;
        }
        members.push(handle);
    }

    /// Remove a session by id, returning its handle if it was registered.
    pub fn unregister(&self, id: SessionId) -> Option<Arc<SessionHandle>> {
        let mut members = self.members.lock();
        let index = members.iter().position(|member| member.id == id)?;
        Some(members.remove(index))
    }

    /// First registered session with the given username, if any.
    pub fn lookup_by_username(&self, username: &str) -> Option<Arc<SessionHandle>> {
        self.members
            .lock()
            .iter()
            .find(|member| member.username == username)
            .cloned()
    }

    /// First registered session carrying the bot service role, if any.
    pub fn lookup_bot(&self) -> Option<Arc<SessionHandle>> {
        self.members
            .lock()
            .iter()
            .find(|member| member.role == Role::Bot)
            .cloned()
    }

    /// Registered usernames in registration order.
    pub fn usernames(&self) -> Vec<String> {
        self.members
            .lock()
            .iter()
            .map(|member| member.username.clone())
            .collect()
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.members.lock().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.members.lock().is_empty()
    }

    /// Remove every session at once, returning the dropped handles.
    /// Dropping a handle closes its outbound queue, which its worker
    /// treats as forced teardown. Used by the shutdown sequence; no
    /// leave notices are produced.
    pub fn clear(&self) -> Vec<Arc<SessionHandle>> {
        std::mem::take(&mut *self.members.lock())
    }

    /// Deliver an envelope to its routed subset.
    ///
    /// Snapshots the membership under the guard, then queues deliveries
    /// outside it. Members whose queue is closed or full are unregistered
    /// afterwards; their failure never aborts delivery to the rest.
    /// Returns the number of successful deliveries.
    pub fn broadcast(&self, envelope: Envelope) -> usize {
        let snapshot: Vec<Arc<SessionHandle>> = self.members.lock().clone();

        let Envelope { line, routing } = envelope;
        let line = Arc::new(line);
        let mut delivered = 0;
        let mut failed: Vec<SessionId> = Vec::new();

        for member in snapshot.iter().filter(|m| routing.includes(m.id)) {
            match member.deliver(Arc::clone(&line)) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    warn!(
                        uid = %member.id,
                        username = %member.username,
                        error = %err,
                        "Delivery failed, scheduling teardown"
                    );
                    failed.push(member.id);
                }
            }
        }

        for id in failed {
            if let Some(handle) = self.unregister(id) {
                info!(uid = %handle.id, username = %handle.username, "Unreachable session removed");
            }
        }

        debug!(delivered, routing = ?routing, "Broadcast complete");
        delivered
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
