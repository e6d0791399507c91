//! TCP gateway: accepts connections and spawns session workers.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::network::connection::SessionWorker;
use crate::state::Hub;

/// Listens for inbound TCP connections and hands each one to its own
/// worker task. Stops when the hub's shutdown signal fires.
pub struct Gateway {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Gateway {
    /// Bind the listener.
    pub async fn bind(addr: SocketAddr) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "Gateway listening");
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Actual bound address (useful when binding to port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept loop. Each accepted stream gets a detached worker task;
    /// returns once the hub signals shutdown.
    pub async fn run(self, hub: Arc<Hub>) {
        let mut shutdown = hub.subscribe_shutdown();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            if !hub.is_accepting() {
                                // Raced with shutdown; refuse silently.
                                drop(stream);
                                continue;
                            }
                            info!(peer = %peer, "Connection accepted");
                            let hub = Arc::clone(&hub);
                            tokio::spawn(async move {
                                SessionWorker::new(hub, stream, peer).run().await;
                            });
                        }
                        Err(err) => {
                            warn!(error = %err, "Accept failed");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Gateway stopping");
                        break;
                    }
                }
            }
        }
    }
}
