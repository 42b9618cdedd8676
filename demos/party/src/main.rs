//! A scripted in-process match: two bots join a room, the drawer picks
//! the first offered word and scribbles, the guesser brute-forces the
//! word list, and the rounds cycle until the clock runs out.
//!
//! Run with `cargo run -p party` (set `RUST_LOG=debug` for the room
//! internals).

use std::sync::Arc;
use std::time::Duration;

use scrawl::prelude::*;
use tokio::sync::mpsc;
use tracing::info;

const ROOM: &str = "party";

const WORDS: &[&str] = &[
    "campfire", "lighthouse", "sunflower", "submarine", "accordion",
    "telescope", "waterfall", "hedgehog", "ice cream", "parachute",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Short phases so the demo moves.
    let mut config = RegistryConfig::default();
    config.room.waiting_for_start = Duration::from_secs(2);
    config.room.word_choice = Duration::from_secs(5);
    config.room.drawing = Duration::from_secs(10);
    config.room.word_reveal = Duration::from_secs(2);

    let server = Arc::new(GameServer::new(config, WORDS.iter().copied())?);
    server.create_room(ROOM, 2).await?;
    info!(room = ROOM, "room created");

    spawn_bot(Arc::clone(&server), "alice", "client-alice").await?;
    spawn_bot(Arc::clone(&server), "bob", "client-bob").await?;

    // Let a few rounds play out.
    tokio::time::sleep(Duration::from_secs(8)).await;

    if let Some(room) = server.registry().find(ROOM).await {
        let status = room.status().await?;
        info!(phase = %status.phase, "final standings");
        for player in &status.players {
            info!(
                username = %player.username,
                score = player.score,
                drawing = player.is_drawing,
                "player"
            );
        }
    }

    server.shutdown().await;
    Ok(())
}

/// Joins a bot and spawns its event loop.
async fn spawn_bot(
    server: Arc<GameServer>,
    username: &'static str,
    client_id: &'static str,
) -> Result<(), GameError> {
    let (tx, rx) = mpsc::unbounded_channel();
    server.join_room(ROOM, username, client_id, tx).await?;
    info!(username, "joined");

    tokio::spawn(bot_loop(server, username, client_id, rx));
    Ok(())
}

/// Reacts to room messages: picks a word when offered one, guesses when
/// shown a mask, and narrates the rest.
async fn bot_loop(
    server: Arc<GameServer>,
    username: &'static str,
    client_id: &'static str,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    while let Some(msg) = rx.recv().await {
        match msg {
            ServerMessage::NewWords { candidates } => {
                info!(username, ?candidates, "offered words");
                tokio::time::sleep(Duration::from_millis(300)).await;
                server.choose_word(ROOM, &candidates[0]).await;
                server
                    .submit_stroke(
                        ROOM,
                        client_id,
                        serde_json::json!({
                            "fromX": 0.2, "fromY": 0.2,
                            "toX": 0.7, "toY": 0.5,
                        }),
                    )
                    .await;
            }
            ServerMessage::GameState { word, .. } if word.contains('_') => {
                info!(username, mask = %word, "guessing");
                tokio::time::sleep(Duration::from_millis(300)).await;
                for candidate in WORDS {
                    server
                        .submit_guess(
                            ROOM,
                            ChatMessage {
                                from: username.to_string(),
                                message: candidate.to_string(),
                                timestamp: 0,
                            },
                        )
                        .await;
                }
            }
            ServerMessage::Announcement { message, .. } => {
                info!(username, %message, "announcement");
            }
            ServerMessage::ChosenWord { word, .. } => {
                info!(username, %word, "the word was");
            }
            _ => {}
        }
    }
}
