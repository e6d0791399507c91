//! Session lifecycle: join notices, relay fan-out, graceful and abrupt
//! departures.

mod common;

use common::TestServer;
use std::time::Duration;

#[tokio::test]
async fn join_notice_reaches_existing_members_only() -> anyhow::Result<()> {
    let server = TestServer::spawn(17701).await?;
    let mut alice = server.connect("alice").await?;
    let mut bob = server.connect("bob").await?;

    assert_eq!(alice.recv().await?, "##-- bob has joined the chat --##");
    // The joiner hears nothing about their own arrival.
    bob.expect_silence(Duration::from_millis(300)).await?;
    Ok(())
}

#[tokio::test]
async fn chat_is_relayed_to_everyone_but_the_sender() -> anyhow::Result<()> {
    let server = TestServer::spawn(17702).await?;
    let mut alice = server.connect("alice").await?;
    let mut bob = server.connect("bob").await?;
    let mut carol = server.connect("carol").await?;
    alice.recv_until(|line| line.contains("carol has joined")).await?;
    bob.recv_until(|line| line.contains("carol has joined")).await?;

    bob.send("hello everyone").await?;

    assert_eq!(alice.recv().await?, "[bob]: hello everyone");
    assert_eq!(carol.recv().await?, "[bob]: hello everyone");
    bob.expect_silence(Duration::from_millis(300)).await?;
    Ok(())
}

#[tokio::test]
async fn graceful_quit_announces_exactly_once() -> anyhow::Result<()> {
    let server = TestServer::spawn(17703).await?;
    let mut alice = server.connect("alice").await?;
    let mut bob = server.connect("bob").await?;
    alice.recv_until(|line| line.contains("bob has joined")).await?;

    bob.send("__QUIT").await?;

    assert_eq!(alice.recv().await?, "##-- bob has left the chat --##");
    // No second notice from the teardown path.
    alice.expect_silence(Duration::from_millis(300)).await?;
    Ok(())
}

#[tokio::test]
async fn abrupt_disconnect_is_silent() -> anyhow::Result<()> {
    let server = TestServer::spawn(17704).await?;
    let mut alice = server.connect("alice").await?;
    let bob = server.connect("bob").await?;
    alice.recv_until(|line| line.contains("bob has joined")).await?;

    drop(bob);

    alice.expect_silence(Duration::from_millis(300)).await?;

    // The room still works for everyone left.
    let mut carol = server.connect("carol").await?;
    alice.recv_until(|line| line.contains("carol has joined")).await?;
    carol.send("anyone here?").await?;
    assert_eq!(alice.recv().await?, "[carol]: anyone here?");
    Ok(())
}

#[tokio::test]
async fn quit_literal_must_be_exact() -> anyhow::Result<()> {
    let server = TestServer::spawn(17705).await?;
    let mut alice = server.connect("alice").await?;
    let mut bob = server.connect("bob").await?;
    alice.recv_until(|line| line.contains("bob has joined")).await?;

    // A lowercase or embedded quit word is ordinary chat.
    bob.send("__quit").await?;
    assert_eq!(alice.recv().await?, "[bob]: __quit");
    bob.send("time to __QUIT soon").await?;
    assert_eq!(alice.recv().await?, "[bob]: time to __QUIT soon");
    Ok(())
}
