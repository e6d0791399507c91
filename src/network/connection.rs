//! Per-connection session worker.
//!
//! One worker task owns each accepted stream end to end: it performs the
//! username handshake, registers the session, then drives a single event
//! loop over the two things that can happen to a session, an inbound
//! line from the peer or an outbound line queued by the registry.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use hubbub_proto::{ClientInput, Line, LineCodec, ProtocolError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::error::SessionResult;
use crate::state::{Envelope, Hub, Session, SessionHandle};

/// Outcome of one `select!` arm in the event loop.
enum SelectResult {
    /// A line queued for this session by the registry, or `None` when
    /// the queue was closed from the registry side.
    Deliver(Option<Arc<Line>>),
    /// An inbound frame from the peer, or `None` at EOF.
    Inbound(Option<Result<String, ProtocolError>>),
}

/// Whether the event loop keeps running after an inbound line.
#[derive(PartialEq)]
enum Flow {
    Continue,
    Stop,
}

/// Drives one connection from accept to close.
pub struct SessionWorker<T = TcpStream> {
    hub: Arc<Hub>,
    transport: Framed<T, LineCodec>,
    session: Session,
    peer: SocketAddr,
}

impl<T> SessionWorker<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an accepted stream in a line transport and a fresh session.
    pub fn new(hub: Arc<Hub>, stream: T, peer: SocketAddr) -> Self {
        Self {
            hub,
            transport: Framed::new(stream, LineCodec::new()),
            session: Session::new(),
            peer,
        }
    }

    /// Run the session to completion. Never panics; transport errors are
    /// logged and end the session silently.
    pub async fn run(mut self) {
        let uid = self.session.id;
        if let Err(err) = self.drive().await {
            warn!(uid = %uid, peer = %self.peer, error = %err, "Session ended with transport error");
        }
        // Abrupt endings skip the graceful-quit path; drop the registry
        // entry without a leave notice.
        if self.hub.registry.unregister(uid).is_some() {
            info!(
                uid = %uid,
                username = %self.session.display_name(),
                "Session removed after abrupt disconnect"
            );
        }
        self.session.close();
    }

    async fn drive(&mut self) -> SessionResult {
        // Handshake: the first line names the session.
        let username = match self.transport.next().await {
            Some(line) => line?,
            None => {
                debug!(peer = %self.peer, "Peer disconnected before handshake");
                return Ok(());
            }
        };

        if !self.hub.is_accepting() {
            // Lost the race with shutdown.
            return Ok(());
        }

        let role = self.hub.role_for(&username);
        self.session.activate(username.clone());
        let (handle, mut rx) = SessionHandle::new(self.session.id, username.clone(), role);
        self.hub.registry.register(handle);
        info!(uid = %self.session.id, username = %username, role = ?role, "Session active");

        self.hub.registry.broadcast(Envelope::all_except(
            Line::notice(format!("{username} has joined the chat")),
            self.session.id,
        ));

        loop {
            let result = tokio::select! {
                delivery = rx.recv() => SelectResult::Deliver(delivery),
                inbound = self.transport.next() => SelectResult::Inbound(inbound),
            };

            match result {
                SelectResult::Deliver(Some(line)) => {
                    self.transport.send(&*line).await?;
                }
                SelectResult::Deliver(None) => {
                    // The registry dropped our handle: forced teardown.
                    // Everything queued before the drop was already sent.
                    debug!(uid = %self.session.id, "Outbound queue closed, tearing down");
                    return Ok(());
                }
                SelectResult::Inbound(Some(Ok(raw))) => {
                    if self.handle_line(&raw) == Flow::Stop {
                        return Ok(());
                    }
                }
                SelectResult::Inbound(Some(Err(err))) => return Err(err.into()),
                SelectResult::Inbound(None) => {
                    debug!(uid = %self.session.id, "Peer closed the connection");
                    return Ok(());
                }
            }
        }
    }

    /// Dispatch one inbound line from an active session.
    fn handle_line(&mut self, raw: &str) -> Flow {
        let uid = self.session.id;
        let username = self.session.display_name().to_string();

        match ClientInput::classify(raw) {
            ClientInput::Quit => {
                self.session.begin_leaving();
                self.hub.registry.unregister(uid);
                self.hub.registry.broadcast(Envelope::all(Line::notice(format!(
                    "{username} has left the chat"
                ))));
                info!(uid = %uid, username = %username, "Session left");
                Flow::Stop
            }
            ClientInput::BotDirected(query) => {
                debug!(uid = %uid, username = %username, query = %query, "Relaying bot-directed line");
                // Relayed verbatim, sentinel included; the bot strips it.
                self.relay(&username, raw, uid);
                Flow::Continue
            }
            ClientInput::Chat(_) => {
                self.relay(&username, raw, uid);
                Flow::Continue
            }
        }
    }

    fn relay(&self, username: &str, raw: &str, uid: crate::state::SessionId) {
        let line = Line::chat(username, raw);
        info!(uid = %uid, line = %line, "Relaying");
        let delivered = self.hub.registry.broadcast(Envelope::all_except(line, uid));
        debug!(uid = %uid, delivered, "Line relayed");
    }
}
