//! Top-level shared state: registry plus shutdown coordination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hubbub_proto::Line;
use tokio::sync::watch;
use tracing::info;

use crate::config::Config;

use super::registry::{Envelope, Registry};
use super::session::Role;

/// Notice text broadcast once when the hub shuts down.
pub const SHUTDOWN_NOTICE: &str = "SERVER SHUT DOWN!";

/// Shared hub state, one instance per process.
///
/// Owns the registry, the configured bot username, and the shutdown
/// signal. Cloned as `Arc<Hub>` into every worker and the console task.
pub struct Hub {
    /// Active session registry.
    pub registry: Registry,
    bot_username: String,
    accepting: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
}

impl Hub {
    /// Build hub state from configuration.
    pub fn new(config: &Config) -> Arc<Self> {
        let (shutdown_tx, _) = watch::channel(false);
        Arc::new(Self {
            registry: Registry::new(),
            bot_username: config.bot.username.clone(),
            accepting: AtomicBool::new(true),
            shutdown_tx,
        })
    }

    /// Role assigned to a session registering under `username`.
    pub fn role_for(&self, username: &str) -> Role {
        if username == self.bot_username {
            Role::Bot
        } else {
            Role::User
        }
    }

    /// Whether new connections are still admitted.
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// Receiver for the shutdown signal; becomes `true` exactly once.
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Shut the hub down: announce once, drop every session, signal the
    /// gateway to stop accepting. Idempotent; only the first call acts.
    ///
    /// The shutdown notice is queued before the handles are dropped, so
    /// each member sees the notice and then EOF.
    pub fn shutdown(&self) {
        if self.accepting.swap(false, Ordering::SeqCst) {
            let online = self.registry.len();
            info!(online, "Shutting down hub");
            self.registry
                .broadcast(Envelope::all(Line::notice(SHUTDOWN_NOTICE)));
            // Dropping the handles closes every outbound queue; each
            // worker drains what was queued, then tears down.
            drop(self.registry.clear());
            let _ = self.shutdown_tx.send(true);
        }
    }
}
