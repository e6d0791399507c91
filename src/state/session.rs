//! Session types: per-connection lifecycle state and the registry-visible
//! delivery handle.
//!
//! A [`Session`] is owned exclusively by its worker task; the rest of the
//! hub only ever sees the [`SessionHandle`], which carries the bounded
//! outbound queue. Nothing outside the worker touches the transport, so
//! the exclusion boundary stays at the registry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hubbub_proto::Line;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique identifier for one connection.
pub type SessionId = Uuid;

/// Depth of each session's outbound delivery queue. A member that falls
/// this far behind the broadcast stream is treated as unreachable and
/// torn down rather than allowed to stall everyone else.
pub const OUTBOUND_QUEUE_DEPTH: usize = 256;

/// Service role of a registered session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// An ordinary chat member.
    User,
    /// The automated reply bot. Flagged at registration when the first
    /// line matches the reserved bot username; the visible name stays
    /// unchanged for wire compatibility.
    Bot,
}

/// Lifecycle state of one connection.
///
/// `Connecting -> Active -> Leaving -> Closed`, with a direct jump to
/// `Closed` from `Connecting`/`Active` on transport error or EOF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepted, username not yet received.
    Connecting,
    /// Registered and receiving broadcasts.
    Active,
    /// Graceful quit in progress; leave notice sent.
    Leaving,
    /// Terminal.
    Closed,
}

/// Per-connection record, owned by its worker.
#[derive(Debug)]
pub struct Session {
    /// Unique id, assigned at accept.
    pub id: SessionId,
    /// Username, set by the first line received.
    pub username: Option<String>,
    /// Current lifecycle state.
    pub state: SessionState,
}

impl Session {
    /// Create a session in the `Connecting` state.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            username: None,
            state: SessionState::Connecting,
        }
    }

    /// `Connecting -> Active`: the first line arrived and names the session.
    pub fn activate(&mut self, username: String) {
        debug_assert_eq!(self.state, SessionState::Connecting);
        self.username = Some(username);
        self.state = SessionState::Active;
    }

    /// `Active -> Leaving`: a graceful quit was requested.
    pub fn begin_leaving(&mut self) {
        debug_assert_eq!(self.state, SessionState::Active);
        self.state = SessionState::Leaving;
    }

    /// Any state `-> Closed`.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Username for logging, `"?"` while still connecting.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("?")
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivery failure for a single recipient during fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The worker is gone; the queue's receiver was dropped.
    #[error("session closed")]
    Closed,
    /// The outbound queue is full; the member cannot keep up.
    #[error("outbound queue full")]
    Backlogged,
}

/// Registry-visible projection of an active session.
///
/// Holds the sending half of the session's outbound queue; the worker
/// holds the receiving half and the transport. Dropping the last handle
/// closes the queue, which the worker treats as forced teardown.
#[derive(Debug)]
pub struct SessionHandle {
    /// Session id, shared with the owning worker.
    pub id: SessionId,
    /// Registered username. Not necessarily unique.
    pub username: String,
    /// Service role.
    pub role: Role,
    /// When the session registered.
    pub connected_at: DateTime<Utc>,
    outbound: mpsc::Sender<Arc<Line>>,
}

impl SessionHandle {
    /// Create a handle and the queue receiver for the worker.
    pub fn new(
        id: SessionId,
        username: String,
        role: Role,
    ) -> (Arc<Self>, mpsc::Receiver<Arc<Line>>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_DEPTH);
        let handle = Arc::new(Self {
            id,
            username,
            role,
            connected_at: Utc::now(),
            outbound: tx,
        });
        (handle, rx)
    }

    /// Queue a line for delivery. Never blocks: a full queue is a
    /// [`DeliveryError::Backlogged`] failure for this recipient only.
    pub fn deliver(&self, line: Arc<Line>) -> Result<(), DeliveryError> {
        self.outbound.try_send(line).map_err(|err| match err {
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
            mpsc::error::TrySendError::Full(_) => DeliveryError::Backlogged,
        })
    }
}
