//! hubbub-bot - automated reply bot.
//!
//! Connects to a hub as an ordinary member under the reserved bot
//! username, watches the broadcast stream for lines carrying the
//! addressing sentinel, and answers the sender with a canned reply
//! picked at random from a replies file.

use std::path::Path;

use anyhow::{bail, Context};
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use hubbub_proto::{decode_directed, is_directed, Line, LineCodec, BOT_USERNAME, DEFAULT_PORT};

/// Source of reply texts.
trait ReplySource: Sync {
    /// Pick one reply.
    fn pick(&self) -> &str;
}

/// Replies loaded from a plain text file, one per line.
struct CannedReplies {
    lines: Vec<String>,
}

impl CannedReplies {
    /// Load the replies file. An unreadable or empty file is fatal:
    /// a bot with nothing to say should not join the room.
    fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replies file {}", path.display()))?;
        let lines: Vec<String> = content
            .lines()
            .map(str::to_string)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            bail!("replies file {} contains no replies", path.display());
        }
        Ok(Self { lines })
    }
}

impl ReplySource for CannedReplies {
    fn pick(&self) -> &str {
        let index = rand::thread_rng().gen_range(0..self.lines.len());
        &self.lines[index]
    }
}

/// Command-line options: `-cca <addr>`, `-ccp <port>`, `-ccr <file>`.
struct Options {
    host: String,
    port: u16,
    replies: String,
}

impl Options {
    fn parse() -> anyhow::Result<Self> {
        let mut host = "127.0.0.1".to_string();
        let mut port = DEFAULT_PORT;
        let mut replies = "replies.txt".to_string();

        let mut args = std::env::args().skip(1);
        while let Some(flag) = args.next() {
            let value = args
                .next()
                .with_context(|| format!("flag {flag} requires a value"))?;
            match flag.as_str() {
                "-cca" => host = value,
                "-ccp" => port = value.parse().context("invalid port for -ccp")?,
                "-ccr" => replies = value,
                other => bail!("unknown flag {other}"),
            }
        }

        Ok(Self {
            host,
            port,
            replies,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = Options::parse()?;
    let replies = CannedReplies::load(Path::new(&options.replies))?;
    info!(count = replies.lines.len(), "Replies loaded");

    let stream = TcpStream::connect((options.host.as_str(), options.port))
        .await
        .with_context(|| {
            format!("failed to connect to hub at {}:{}", options.host, options.port)
        })?;
    info!(host = %options.host, port = options.port, username = BOT_USERNAME, "Connected to hub");

    let mut transport = Framed::new(stream, LineCodec::new());
    transport.send(BOT_USERNAME).await?;

    run(&mut transport, &replies).await
}

/// Watch the broadcast stream and answer every directed line.
async fn run<T>(
    transport: &mut Framed<T, LineCodec>,
    replies: &dyn ReplySource,
) -> anyhow::Result<()>
where
    T: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    while let Some(received) = transport.next().await {
        let received = match received {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "Transport error, disconnecting");
                break;
            }
        };

        if !is_directed(&received) {
            debug!(line = %received, "Ignoring undirected line");
            continue;
        }

        let query = decode_directed(&received);
        let reply = Line::BotReply {
            target: query.sender.clone(),
            body: replies.pick().to_string(),
        };
        info!(target = %query.sender, query = %query.query, "Replying");
        transport.send(&reply).await?;
    }
    info!("Hub closed the connection");
    Ok(())
}
