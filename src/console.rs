//! Operator console on the daemon's stdin.
//!
//! Runs on a dedicated blocking thread so the accept loop never waits on
//! terminal input. Every line typed at the console is a command:
//! `EXIT` and `ONLINE_CLIENTS` (case-insensitive) are reserved, anything
//! else is broadcast to every member as an operator line.

use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use hubbub_proto::Line;
use tracing::info;

use crate::state::{Envelope, Hub};

/// Header of the online directory printed for `ONLINE_CLIENTS`.
const DIRECTORY_HEADER: &str = "##-- CURRENTLY ONLINE: --##";
/// Footer of the online directory.
const DIRECTORY_FOOTER: &str = "##-----------------------##";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `EXIT`: shut the hub down.
    Shutdown,
    /// `ONLINE_CLIENTS`: print the member directory locally.
    ListOnline,
    /// Anything else: broadcast as `[SERVER]: <text>` to every member.
    Broadcast(String),
}

impl ConsoleCommand {
    /// Parse a console line. Reserved words match case-insensitively
    /// and only as the whole line.
    pub fn parse(input: &str) -> Self {
        if input.eq_ignore_ascii_case("EXIT") {
            ConsoleCommand::Shutdown
        } else if input.eq_ignore_ascii_case("ONLINE_CLIENTS") {
            ConsoleCommand::ListOnline
        } else {
            ConsoleCommand::Broadcast(input.to_string())
        }
    }
}

/// Render the online directory: header, one numbered row per member in
/// join order, footer.
pub fn directory_listing(usernames: &[String]) -> String {
    let mut out = String::from(DIRECTORY_HEADER);
    for (index, name) in usernames.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{}.] {name}", index + 1));
    }
    out.push('\n');
    out.push_str(DIRECTORY_FOOTER);
    out
}

/// The operator console task.
pub struct AdminConsole;

impl AdminConsole {
    /// Spawn the console reader thread. The thread runs until `EXIT`
    /// or stdin EOF; the process does not wait for it on shutdown.
    pub fn spawn(hub: Arc<Hub>) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if !Self::apply(&hub, ConsoleCommand::parse(&line)) {
                    break;
                }
            }
        })
    }

    /// Execute one command. Returns `false` when the console should stop.
    fn apply(hub: &Arc<Hub>, command: ConsoleCommand) -> bool {
        match command {
            ConsoleCommand::Shutdown => {
                info!("Operator requested shutdown");
                hub.shutdown();
                false
            }
            ConsoleCommand::ListOnline => {
                println!("{}", directory_listing(&hub.registry.usernames()));
                true
            }
            ConsoleCommand::Broadcast(text) => {
                let delivered = hub.registry.broadcast(Envelope::all(Line::Server(text)));
                info!(delivered, "Operator broadcast");
                true
            }
        }
    }
}
