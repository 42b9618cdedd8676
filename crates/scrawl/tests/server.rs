//! Integration tests for the GameServer event surface.

use std::time::Duration;

use scrawl::prelude::*;
use tokio::sync::mpsc;

type Rx = mpsc::UnboundedReceiver<ServerMessage>;

fn server() -> GameServer {
    GameServer::new(
        RegistryConfig::default(),
        ["cat", "dog", "fish", "sun", "moon"],
    )
    .expect("word list is non-empty")
}

async fn join(server: &GameServer, room: &str, client_id: &str, username: &str) -> Rx {
    let (tx, rx) = mpsc::unbounded_channel();
    server
        .join_room(room, username, client_id, tx)
        .await
        .expect("join should succeed");
    rx
}

fn drain(rx: &mut Rx) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn chat(from: &str, text: &str) -> ChatMessage {
    ChatMessage {
        from: from.into(),
        message: text.into(),
        timestamp: 0,
    }
}

async fn phase_of(server: &GameServer, room: &str) -> Phase {
    server
        .registry()
        .find(room)
        .await
        .expect("room exists")
        .status()
        .await
        .expect("room alive")
        .phase
}

/// Creates a 2-player room, joins both, and advances to NewRound.
async fn room_in_new_round(server: &GameServer, room: &str) -> (Rx, Rx, String) {
    server.create_room(room, 2).await.unwrap();
    let rx_a = join(server, room, "a", "alice").await;
    let rx_b = join(server, room, "b", "bob").await;
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(phase_of(server, room).await, Phase::NewRound);

    let drawer = server
        .registry()
        .find(room)
        .await
        .unwrap()
        .status()
        .await
        .unwrap()
        .drawer_username
        .expect("round has a drawer");
    (rx_a, rx_b, drawer)
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_empty_word_list_is_rejected() {
    let result =
        GameServer::new(RegistryConfig::default(), Vec::<String>::new());
    assert!(matches!(result, Err(GameError::Words(_))));
}

// =========================================================================
// Join handshake
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_join_unknown_room_is_an_explicit_error() {
    let server = server();
    let (tx, _rx) = mpsc::unbounded_channel();

    let result = server.join_room("nowhere", "alice", "a", tx).await;
    assert!(matches!(
        result,
        Err(GameError::Room(RoomError::NotFound(name))) if name == "nowhere"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_join_returns_player_snapshot() {
    let server = server();
    server.create_room("den", 4).await.unwrap();

    let (tx, _rx) = mpsc::unbounded_channel();
    let info = server.join_room("den", "alice", "a", tx).await.unwrap();

    assert_eq!(info.username, "alice");
    assert_eq!(info.client_id, "a");
    assert_eq!(info.score, 0);
}

#[tokio::test(start_paused = true)]
async fn test_join_full_room_fails() {
    let server = server();
    server.create_room("duo", 2).await.unwrap();
    let _rx_a = join(&server, "duo", "a", "alice").await;
    let _rx_b = join(&server, "duo", "b", "bob").await;

    let (tx, _rx) = mpsc::unbounded_channel();
    let result = server.join_room("duo", "carol", "c", tx).await;
    assert!(matches!(
        result,
        Err(GameError::Room(RoomError::RoomFull(_)))
    ));
}

// =========================================================================
// Disconnect routing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_disconnect_removes_player_from_their_room() {
    let server = server();
    server.create_room("den", 4).await.unwrap();
    let _rx_a = join(&server, "den", "a", "alice").await;
    let _rx_b = join(&server, "den", "b", "bob").await;
    let _rx_c = join(&server, "den", "c", "carol").await;

    server.disconnect("c", true).await;

    let status = server
        .registry()
        .find("den")
        .await
        .unwrap()
        .status()
        .await
        .unwrap();
    assert_eq!(status.players.len(), 2);
    assert!(status.players.iter().all(|p| p.username != "carol"));
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_unknown_client_is_a_no_op() {
    let server = server();
    server.disconnect("ghost", true).await;
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_through_facade_resumes_the_slot() {
    let server = server();
    server.create_room("den", 4).await.unwrap();
    let _rx_a = join(&server, "den", "a", "alice").await;
    let _rx_b = join(&server, "den", "b", "bob").await;
    let _rx_c = join(&server, "den", "c", "carol").await;

    server.disconnect("c", false).await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    // Same client id inside the grace window: the held player comes
    // back, whatever username the new handshake carried.
    let (tx, _rx) = mpsc::unbounded_channel();
    let info = server
        .join_room("den", "carol-reborn", "c", tx)
        .await
        .unwrap();
    assert_eq!(info.username, "carol");
}

#[tokio::test(start_paused = true)]
async fn test_last_disconnect_closes_the_room() {
    let server = server();
    server.create_room("den", 4).await.unwrap();
    let _rx_a = join(&server, "den", "a", "alice").await;

    server.disconnect("a", false).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(server.registry().find("den").await.is_none());

    // A second disconnect for the same client hits the pruned index and
    // the gone room without blowing up.
    server.disconnect("a", false).await;
}

// =========================================================================
// Dropped events
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_events_for_unknown_rooms_are_dropped() {
    let server = server();
    server.submit_guess("nowhere", chat("alice", "cat")).await;
    server.choose_word("nowhere", "cat").await;
    server
        .submit_stroke("nowhere", "a", serde_json::json!({ "x": 1 }))
        .await;
}

// =========================================================================
// Match flow through the facade
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_choose_word_and_guess_flow() {
    let server = server();
    let (_rx_a, _rx_b, drawer) = room_in_new_round(&server, "flow").await;

    server.choose_word("flow", "cat").await;
    assert_eq!(phase_of(&server, "flow").await, Phase::GameRunning);

    // With two players there is a single guesser; a correct guess ends
    // the round on the spot.
    let guesser = if drawer == "alice" { "bob" } else { "alice" };
    server.submit_guess("flow", chat(guesser, "cat")).await;

    assert_eq!(phase_of(&server, "flow").await, Phase::NewRound);

    let status = server
        .registry()
        .find("flow")
        .await
        .unwrap()
        .status()
        .await
        .unwrap();
    let score = status
        .players
        .iter()
        .find(|p| p.username == guesser)
        .unwrap()
        .score;
    assert_eq!(score, 100, "instant guess earns base plus multiplier");
}

#[tokio::test(start_paused = true)]
async fn test_wrong_guess_relays_as_chat() {
    let server = server();
    let (mut rx_a, mut rx_b, _drawer) =
        room_in_new_round(&server, "banter").await;

    server.choose_word("banter", "cat").await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    server.submit_guess("banter", chat("alice", "a horse?")).await;
    tokio::time::sleep(Duration::from_millis(1)).await;

    for rx in [&mut rx_a, &mut rx_b] {
        assert!(drain(rx).iter().any(|m| matches!(
            m,
            ServerMessage::Chat(c) if c.message == "a horse?"
        )));
    }
}

#[tokio::test(start_paused = true)]
async fn test_strokes_gated_by_phase_through_facade() {
    let server = server();
    server.create_room("canvas", 4).await.unwrap();
    let mut rx_a = join(&server, "canvas", "a", "alice").await;
    let _rx_b = join(&server, "canvas", "b", "bob").await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    drain(&mut rx_a);

    // Still WaitingForStart: strokes go nowhere.
    server
        .submit_stroke("canvas", "b", serde_json::json!({ "x": 1 }))
        .await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(!drain(&mut rx_a)
        .iter()
        .any(|m| matches!(m, ServerMessage::DrawData { .. })));

    // Into the round: now they relay.
    tokio::time::sleep(Duration::from_secs(11)).await;
    server.choose_word("canvas", "cat").await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    drain(&mut rx_a);

    server
        .submit_stroke("canvas", "b", serde_json::json!({ "x": 2 }))
        .await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(drain(&mut rx_a)
        .iter()
        .any(|m| matches!(m, ServerMessage::DrawData { .. })));
}

// =========================================================================
// Registry passthrough
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_create_search_check_join_surface() {
    let server = server();
    server.create_room("garden", 4).await.unwrap();
    server.create_room("gallery", 2).await.unwrap();

    let results = server.search_rooms("ga").await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "gallery");

    server.check_join("garden", "alice").await.unwrap();
    let result = server.check_join("attic", "alice").await;
    assert!(matches!(
        result,
        Err(GameError::Room(RoomError::NotFound(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_create_duplicate_room_reports_structured_failure() {
    let server = server();
    server.create_room("garden", 4).await.unwrap();

    let result = server.create_room("garden", 4).await;
    assert!(matches!(
        result,
        Err(GameError::Room(RoomError::AlreadyExists(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_all_rooms() {
    let server = server();
    server.create_room("garden", 4).await.unwrap();
    server.create_room("pond", 2).await.unwrap();
    let _rx = join(&server, "garden", "a", "alice").await;

    server.shutdown().await;

    assert_eq!(server.registry().room_count().await, 0);
}
