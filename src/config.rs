//! Configuration loading and management.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use hubbub_proto::{BOT_USERNAME, DEFAULT_PORT};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Hub configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Reply-bot configuration.
    #[serde(default)]
    pub bot: BotConfig,
}

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:14001").
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
}

/// Reply-bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Reserved username that flags a session with the bot service role.
    #[serde(default = "default_bot_username")]
    pub username: String,
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)
}

fn default_bot_username() -> String {
    BOT_USERNAME.to_string()
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            username: default_bot_username(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            bot: BotConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_constants() {
        let config = Config::default();
        assert_eq!(config.listen.address.port(), DEFAULT_PORT);
        assert_eq!(config.bot.username, BOT_USERNAME);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [listen]
            address = "127.0.0.1:9000"
            "#,
        )
        .expect("parse");
        assert_eq!(config.listen.address.port(), 9000);
        assert_eq!(config.bot.username, BOT_USERNAME);
    }

    #[test]
    fn parses_custom_bot_username() {
        let config: Config = toml::from_str(
            r#"
            [bot]
            username = "Helper"
            "#,
        )
        .expect("parse");
        assert_eq!(config.bot.username, "Helper");
    }
}
