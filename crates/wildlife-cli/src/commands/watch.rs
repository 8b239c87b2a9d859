//! Watch command - follow new sightings as they are recorded

use super::list::format_sighting;
use crate::api::Client;
use anyhow::{Context, Result};
use colored::Colorize;
use futures::{SinkExt, Stream, StreamExt};
use std::future::Future;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};
use wildlife_core::{ClientMessage, ServerMessage, SightingFeed, SightingView};

pub async fn execute() -> Result<()> {
    let client = Client::from_settings()?;

    let mut feed = SightingFeed::from_sightings(client.list_sightings().await?);
    println!(
        "{} {} sighting(s) loaded from {}",
        "✓".green(),
        feed.len(),
        client.base_url()
    );

    let ws_url = client.ws_url();
    info!("Connecting to WebSocket: {}", ws_url);
    let (ws_stream, _) = tokio_tungstenite::connect_async(&ws_url)
        .await
        .with_context(|| format!("Failed to connect to WebSocket: {}", ws_url))?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    ws_sender
        .send(Message::Text(serde_json::to_string(&ClientMessage::Ping)?))
        .await
        .context("Failed to send ping")?;

    println!("{}", "Watching for new sightings (Ctrl+C to stop)...".dimmed());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    follow(&mut feed, &mut ws_receiver, shutdown).await?;

    let _ = ws_sender.send(Message::Close(None)).await;
    println!("{} sighting(s) in feed", feed.len());
    Ok(())
}

/// Merge push events into `feed` until the server closes the socket or `shutdown` resolves
async fn follow<S, F>(feed: &mut SightingFeed, mut messages: S, shutdown: F) -> Result<()>
where
    S: Stream<Item = std::result::Result<Message, WsError>> + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                println!();
                return Ok(());
            }
            msg = messages.next() => match msg {
                Some(Ok(Message::Text(text))) => handle_text(feed, &text),
                Some(Ok(Message::Close(_))) | None => {
                    println!("{}", "Server closed the connection.".yellow());
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    return Err(e).context("WebSocket error");
                }
            }
        }
    }
}

fn handle_text(feed: &mut SightingFeed, text: &str) {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::Connected { connection_id }) => {
            debug!("Connected as {}", connection_id);
        }
        Ok(ServerMessage::Pong) => debug!("Pong"),
        Ok(ServerMessage::Error { code, message }) => {
            warn!("Server error {}: {}", code, message);
        }
        Ok(message @ ServerMessage::NewSighting { .. }) => match feed.merge(&message) {
            Some(sighting) => {
                println!(
                    "{} {}",
                    "New:".green().bold(),
                    format_sighting(&SightingView::from(sighting))
                );
            }
            None => debug!("Ignoring sighting already in feed"),
        },
        Err(e) => debug!("Ignoring unrecognised message: {}", e),
    }
}
