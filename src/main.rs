//! hubbubd - line-oriented TCP chat hub.
//!
//! Accepts any number of chat members on one port, relays every line to
//! everyone else, and hosts an operator console on stdin.

mod config;
mod console;
mod error;
mod network;
mod state;

use crate::config::Config;
use crate::console::AdminConsole;
use crate::network::Gateway;
use crate::state::Hub;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration; without an argument the built-in defaults apply.
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None => Config::default(),
    };

    info!(
        listen = %config.listen.address,
        bot = %config.bot.username,
        "Starting hubbubd"
    );

    println!("##=========================================##");
    println!("##   WELCOME TO THE TCP LOCAL CHAT-ROOM!   ##");
    println!("##=========================================##");
    println!("Waiting for clients on {}...", config.listen.address);

    let hub = Hub::new(&config);

    // Operator console on stdin; EXIT there triggers hub shutdown. The
    // thread is not joined: the process exits once the gateway stops.
    let _console = AdminConsole::spawn(hub.clone());

    let gateway = Gateway::bind(config.listen.address).await.map_err(|e| {
        error!(addr = %config.listen.address, error = %e, "Failed to bind listener");
        e
    })?;

    gateway.run(hub).await;

    info!("hubbubd stopped");
    Ok(())
}
