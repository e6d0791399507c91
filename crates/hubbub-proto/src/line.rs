//! Line framing: the structured form of everything that crosses the wire.
//!
//! [`Line`] is the outbound (server-to-client) framing; [`ClientInput`]
//! classifies inbound (client-to-server) lines. [`decode_directed`]
//! recovers sender and query from a relayed bot-directed line on the
//! consuming side of the broadcast stream.

use std::fmt;

use crate::{BOT_SENTINEL, QUIT_COMMAND};

/// One framed line on the shared broadcast stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Ordinary chat relayed from a member: `[<sender>]: <body>`.
    Chat {
        /// Username the line was relayed from.
        sender: String,
        /// The member's original text, sentinel included for bot-directed lines.
        body: String,
    },
    /// Join/leave/shutdown notice: `##-- <text> --##`.
    Notice(String),
    /// Operator broadcast: `[SERVER]: <text>`.
    Server(String),
    /// Bot reply addressed to a member: `@<target> <body>`.
    BotReply {
        /// Username the reply is addressed to.
        target: String,
        /// Reply text.
        body: String,
    },
}

impl Line {
    /// Build a chat line relayed from `sender`.
    pub fn chat(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Line::Chat {
            sender: sender.into(),
            body: body.into(),
        }
    }

    /// Build a notice line.
    pub fn notice(text: impl Into<String>) -> Self {
        Line::Notice(text.into())
    }

    /// Parse a received line back into its structured form.
    ///
    /// Returns `None` for text that matches none of the four framings.
    /// The `[SERVER]:` framing takes precedence over the generic chat
    /// framing, so a member who picked the name `SERVER` cannot spoof
    /// operator broadcasts on the decode side.
    pub fn parse(raw: &str) -> Option<Line> {
        if let Some(inner) = raw
            .strip_prefix("##-- ")
            .and_then(|rest| rest.strip_suffix(" --##"))
        {
            return Some(Line::Notice(inner.to_string()));
        }
        if let Some(text) = raw.strip_prefix("[SERVER]: ") {
            return Some(Line::Server(text.to_string()));
        }
        if let Some(rest) = raw.strip_prefix('[') {
            if let Some((sender, body)) = rest.split_once("]: ") {
                return Some(Line::Chat {
                    sender: sender.to_string(),
                    body: body.to_string(),
                });
            }
        }
        if let Some(rest) = raw.strip_prefix('@') {
            if let Some((target, body)) = rest.split_once(' ') {
                return Some(Line::BotReply {
                    target: target.to_string(),
                    body: body.to_string(),
                });
            }
        }
        None
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Chat { sender, body } => write!(f, "[{sender}]: {body}"),
            Line::Notice(text) => write!(f, "##-- {text} --##"),
            Line::Server(text) => write!(f, "[SERVER]: {text}"),
            Line::BotReply { target, body } => write!(f, "@{target} {body}"),
        }
    }
}

/// Classification of one inbound client line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientInput<'a> {
    /// The client is leaving the chat.
    Quit,
    /// The line starts with the bot sentinel; carries the query text
    /// (remainder after the sentinel and one space).
    BotDirected(&'a str),
    /// Any other chat text.
    Chat(&'a str),
}

impl<'a> ClientInput<'a> {
    /// Classify a raw inbound line.
    pub fn classify(line: &'a str) -> Self {
        if line == QUIT_COMMAND {
            ClientInput::Quit
        } else if let Some(rest) = line.strip_prefix(BOT_SENTINEL) {
            ClientInput::BotDirected(rest.strip_prefix(' ').unwrap_or(rest))
        } else {
            ClientInput::Chat(line)
        }
    }
}

/// Whether a received broadcast line carries the bot sentinel anywhere.
pub fn is_directed(line: &str) -> bool {
    line.contains(BOT_SENTINEL)
}

/// Sender and query recovered from a relayed bot-directed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotQuery {
    /// Username of the member who addressed the bot.
    pub sender: String,
    /// Their query, sentinel stripped.
    pub query: String,
}

/// Decode a relayed bot-directed line, `"[<sender>]: HEY_BOT! <query>"`.
///
/// Malformed framing (missing bracket, truncated line) yields empty
/// fields rather than an error; the caller still gets to answer.
pub fn decode_directed(line: &str) -> BotQuery {
    let sender = line
        .find(']')
        .and_then(|close| line.get(1..close))
        .unwrap_or("")
        .to_string();
    let body = line
        .find(']')
        .and_then(|close| line.get(close + 3..))
        .unwrap_or("");
    let query = match body.strip_prefix(BOT_SENTINEL) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => body,
    };
    BotQuery {
        sender,
        query: query.to_string(),
    }
}
