//! Integration tests for the room registry surface the CRUD layer uses.

use scrawl_protocol::ServerMessage;
use scrawl_room::{RegistryConfig, RoomError, RoomRegistry};
use scrawl_words::WordBank;
use tokio::sync::mpsc;

fn registry() -> RoomRegistry {
    RoomRegistry::new(
        RegistryConfig::default(),
        WordBank::new(["cat", "dog", "fish"]).expect("non-empty word list"),
    )
}

async fn join(
    registry: &RoomRegistry,
    room: &str,
    client_id: &str,
    username: &str,
) -> mpsc::UnboundedReceiver<ServerMessage> {
    let handle = registry.find(room).await.expect("room exists");
    let (tx, rx) = mpsc::unbounded_channel();
    handle
        .join(client_id, username, tx)
        .await
        .expect("join should succeed");
    rx
}

// =========================================================================
// create
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_create_and_find() {
    let registry = registry();
    registry.create("atrium", 4).await.unwrap();

    let handle = registry.find("atrium").await.expect("room stored");
    assert_eq!(handle.name(), "atrium");
    assert_eq!(registry.room_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_create_duplicate_name_fails() {
    let registry = registry();
    registry.create("atrium", 4).await.unwrap();

    let result = registry.create("atrium", 2).await;
    assert!(matches!(
        result,
        Err(RoomError::AlreadyExists(name)) if name == "atrium"
    ));
    assert_eq!(registry.room_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_create_rejects_capacity_below_two() {
    let registry = registry();
    let result = registry.create("tiny", 1).await;
    assert!(matches!(
        result,
        Err(RoomError::InvalidCapacity { requested: 1, min: 2, max: 8 })
    ));
    assert_eq!(registry.room_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_create_rejects_capacity_above_max() {
    let registry = registry();
    let result = registry.create("stadium", 9).await;
    assert!(matches!(
        result,
        Err(RoomError::InvalidCapacity { requested: 9, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_create_accepts_boundary_capacities() {
    let registry = registry();
    registry.create("duo", 2).await.unwrap();
    registry.create("octet", 8).await.unwrap();
    assert_eq!(registry.room_count().await, 2);
}

// =========================================================================
// find / remove
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_find_unknown_room_returns_none() {
    let registry = registry();
    assert!(registry.find("nowhere").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_find_is_exact_match() {
    let registry = registry();
    registry.create("atrium", 4).await.unwrap();
    assert!(registry.find("atr").await.is_none());
    assert!(registry.find("ATRIUM").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_remove_shuts_the_room_down() {
    let registry = registry();
    registry.create("atrium", 4).await.unwrap();
    let handle = registry.find("atrium").await.unwrap();

    assert!(registry.remove("atrium").await);
    assert!(registry.find("atrium").await.is_none());

    // The actor is gone; the stale handle reports it as unavailable.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let result = handle.status().await;
    assert!(matches!(result, Err(RoomError::Unavailable(_))));
}

#[tokio::test(start_paused = true)]
async fn test_remove_unknown_room_returns_false() {
    let registry = registry();
    assert!(!registry.remove("nowhere").await);
}

// =========================================================================
// search
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_search_filters_by_substring_ordered_by_name() {
    let registry = registry();
    registry.create("garden", 4).await.unwrap();
    registry.create("gallery", 6).await.unwrap();
    registry.create("pond", 2).await.unwrap();

    let results = registry.search("ga").await;
    let names: Vec<&str> =
        results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["gallery", "garden"]);
}

#[tokio::test(start_paused = true)]
async fn test_search_is_case_insensitive() {
    let registry = registry();
    registry.create("Garden", 4).await.unwrap();

    let results = registry.search("gAr").await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Garden");
}

#[tokio::test(start_paused = true)]
async fn test_search_empty_query_lists_everything() {
    let registry = registry();
    registry.create("garden", 4).await.unwrap();
    registry.create("pond", 2).await.unwrap();

    assert_eq!(registry.search("").await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_search_reports_occupancy() {
    let registry = registry();
    registry.create("garden", 4).await.unwrap();
    let _rx = join(&registry, "garden", "a", "alice").await;

    let results = registry.search("garden").await;
    assert_eq!(results[0].max_players, 4);
    assert_eq!(results[0].player_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_search_no_match_returns_empty() {
    let registry = registry();
    registry.create("garden", 4).await.unwrap();
    assert!(registry.search("xyz").await.is_empty());
}

// =========================================================================
// check_join
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_check_join_passes_for_open_room() {
    let registry = registry();
    registry.create("garden", 4).await.unwrap();
    registry.check_join("garden", "alice").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_check_join_unknown_room() {
    let registry = registry();
    let result = registry.check_join("nowhere", "alice").await;
    assert!(matches!(result, Err(RoomError::NotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn test_check_join_full_room() {
    let registry = registry();
    registry.create("duo", 2).await.unwrap();
    let _rx_a = join(&registry, "duo", "a", "alice").await;
    let _rx_b = join(&registry, "duo", "b", "bob").await;

    let result = registry.check_join("duo", "carol").await;
    assert!(matches!(result, Err(RoomError::RoomFull(_))));
}

#[tokio::test(start_paused = true)]
async fn test_check_join_taken_username() {
    let registry = registry();
    registry.create("garden", 4).await.unwrap();
    let _rx = join(&registry, "garden", "a", "alice").await;

    let result = registry.check_join("garden", "alice").await;
    assert!(matches!(
        result,
        Err(RoomError::UsernameTaken { username, .. }) if username == "alice"
    ));
}

// =========================================================================
// shutdown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_clears_every_room() {
    let registry = registry();
    registry.create("garden", 4).await.unwrap();
    registry.create("pond", 2).await.unwrap();

    registry.shutdown().await;

    assert_eq!(registry.room_count().await, 0);
    assert!(registry.find("garden").await.is_none());
    assert!(registry.find("pond").await.is_none());
}
