//! hubbub - interactive terminal chat client.
//!
//! Connects to a hub, sends the username typed at the prompt, then runs
//! a full-duplex loop: stdin lines go to the hub, hub lines go to the
//! terminal.

use std::io::Write;

use anyhow::{bail, Context};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use hubbub_proto::{LineCodec, DEFAULT_PORT, QUIT_COMMAND};

/// Command-line options: `-cca <addr>`, `-ccp <port>`.
struct Options {
    host: String,
    port: u16,
}

impl Options {
    fn parse() -> anyhow::Result<Self> {
        let mut host = "127.0.0.1".to_string();
        let mut port = DEFAULT_PORT;

        let mut args = std::env::args().skip(1);
        while let Some(flag) = args.next() {
            let value = args
                .next()
                .with_context(|| format!("flag {flag} requires a value"))?;
            match flag.as_str() {
                "-cca" => host = value,
                "-ccp" => port = value.parse().context("invalid port for -ccp")?,
                other => bail!("unknown flag {other}"),
            }
        }

        Ok(Self { host, port })
    }
}

/// Prompt until a non-empty username is typed.
async fn read_username(
    stdin: &mut tokio::io::Lines<BufReader<tokio::io::Stdin>>,
) -> anyhow::Result<String> {
    loop {
        print!("Enter your username: ");
        std::io::stdout().flush()?;
        match stdin.next_line().await? {
            Some(line) if !line.is_empty() => return Ok(line),
            Some(_) => continue,
            None => bail!("stdin closed before a username was entered"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::parse()?;

    let stream = TcpStream::connect((options.host.as_str(), options.port))
        .await
        .with_context(|| {
            format!("failed to connect to hub at {}:{}", options.host, options.port)
        })?;
    println!("Connected to the chat!");

    let mut transport = Framed::new(stream, LineCodec::new());
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    let username = read_username(&mut stdin).await?;
    transport.send(username.as_str()).await?;

    println!();
    println!("##-- You joined the chat --##");
    println!("You can begin to chat!");

    loop {
        tokio::select! {
            typed = stdin.next_line() => {
                match typed? {
                    Some(input) => {
                        transport.send(input.as_str()).await?;
                        if input == QUIT_COMMAND {
                            println!("##-- You have left the chat --##");
                            break;
                        }
                    }
                    None => break,
                }
            }
            received = transport.next() => {
                match received {
                    Some(line) => println!("{}", line?),
                    None => {
                        println!("##-- You have left the chat --##");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
