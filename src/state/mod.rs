//! Shared state management for the hub.

pub mod hub;
pub mod registry;
pub mod session;

pub use hub::{Hub, SHUTDOWN_NOTICE};
pub use registry::{Envelope, Registry, Routing};
pub use session::{Role, Session, SessionHandle, SessionId, SessionState};
