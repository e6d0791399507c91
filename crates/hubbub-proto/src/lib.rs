//! # hubbub-proto
//!
//! Wire protocol for the hubbub chat hub.
//!
//! The hub speaks newline-delimited UTF-8 text. Every line a server sends
//! is one of four framings, modeled by [`Line`]:
//!
//! - `[<username>]: <text>` — ordinary chat, relayed from a member
//! - `##-- <text> --##` — join/leave/shutdown notices
//! - `[SERVER]: <text>` — operator broadcast
//! - `@<username> <text>` — bot reply addressed to a member
//!
//! Inbound client lines are classified by [`ClientInput`]: the literal
//! [`QUIT_COMMAND`] leaves the chat, a [`BOT_SENTINEL`] prefix marks a
//! bot-directed line, and anything else is plain chat text.
//!
//! This crate is the single encode/decode boundary: components that hold a
//! [`Line`] never re-parse text they authored themselves.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod line;
#[cfg(feature = "tokio")]
pub mod transport;

pub use error::ProtocolError;
pub use line::{BotQuery, ClientInput, Line, decode_directed, is_directed};
#[cfg(feature = "tokio")]
pub use transport::LineCodec;

/// Sentinel prefix marking a chat line as directed at the reply bot.
pub const BOT_SENTINEL: &str = "HEY_BOT!";

/// Literal command a client sends to leave the chat gracefully.
pub const QUIT_COMMAND: &str = "__QUIT";

/// Reserved username the bot registers under.
///
/// The server flags the session with a service role at registration, but
/// the visible name stays stable for wire compatibility.
pub const BOT_USERNAME: &str = "Chat_Bot";

/// Default port the hub listens on.
pub const DEFAULT_PORT: u16 = 14001;
