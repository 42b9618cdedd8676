//! Room registry: the process-wide name → room mapping.
//!
//! An explicitly constructed, injectable instance — whatever owns the
//! connection routing creates one and passes it around. Cloning is cheap
//! (the map lives behind an `Arc`) and the lock only ever guards map
//! access: all room work goes through cloned handles over per-room
//! channels, so rooms never contend with each other here.

use std::collections::HashMap;
use std::sync::Arc;

use scrawl_protocol::RoomSummary;
use scrawl_words::WordBank;
use tokio::sync::RwLock;

use crate::room::spawn_room;
use crate::{RegistryConfig, RoomError, RoomHandle};

/// Shared name → handle map. Each room actor holds a reference so it can
/// unregister itself when its last player leaves.
pub(crate) type RoomMap = Arc<RwLock<HashMap<String, RoomHandle>>>;

/// Creates, finds, and removes rooms.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: RoomMap,
    config: RegistryConfig,
    words: Arc<WordBank>,
}

impl RoomRegistry {
    /// Creates an empty registry sharing `words` with every room it will
    /// spawn.
    pub fn new(config: RegistryConfig, words: WordBank) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            config,
            words: Arc::new(words),
        }
    }

    /// Creates a room and spawns its actor, initially waiting for
    /// players.
    ///
    /// # Errors
    /// - [`RoomError::InvalidCapacity`] if `max_players` is below 2 or
    ///   above the configured maximum.
    /// - [`RoomError::AlreadyExists`] if the name is taken.
    pub async fn create(
        &self,
        name: &str,
        max_players: usize,
    ) -> Result<(), RoomError> {
        if max_players < 2 || max_players > self.config.max_capacity {
            return Err(RoomError::InvalidCapacity {
                requested: max_players,
                min: 2,
                max: self.config.max_capacity,
            });
        }

        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(name) {
            return Err(RoomError::AlreadyExists(name.to_string()));
        }

        let handle = spawn_room(
            name.to_string(),
            max_players,
            self.config.room.clone(),
            Arc::clone(&self.words),
            Arc::clone(&self.rooms),
        );
        rooms.insert(name.to_string(), handle);
        tracing::info!(room = %name, max_players, "room created");
        Ok(())
    }

    /// Looks up a room by exact name.
    pub async fn find(&self, name: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(name).cloned()
    }

    /// Shuts a room down and forgets it. Returns whether it existed.
    pub async fn remove(&self, name: &str) -> bool {
        let handle = self.rooms.write().await.remove(name);
        match handle {
            Some(handle) => {
                let _ = handle.shutdown().await;
                tracing::info!(room = %name, "room removed");
                true
            }
            None => false,
        }
    }

    /// Case-insensitive substring search over room names, ordered by
    /// name. Read-only — rooms that disappear mid-query are skipped.
    pub async fn search(&self, query: &str) -> Vec<RoomSummary> {
        let needle = query.to_lowercase();
        // Snapshot the matching handles, then drop the lock before the
        // per-room status round-trips.
        let handles: Vec<RoomHandle> = self
            .rooms
            .read()
            .await
            .values()
            .filter(|h| h.name().to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(status) = handle.status().await {
                summaries.push(RoomSummary {
                    name: status.name,
                    max_players: status.max_players,
                    player_count: status.players.len(),
                });
            }
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// The join-precondition check used by the external CRUD layer
    /// before it upgrades a connection: the room exists, has a free
    /// slot, and the username is free.
    pub async fn check_join(
        &self,
        name: &str,
        username: &str,
    ) -> Result<(), RoomError> {
        let handle = self
            .find(name)
            .await
            .ok_or_else(|| RoomError::NotFound(name.to_string()))?;
        let status = handle.status().await?;

        if status.players.len() >= status.max_players {
            return Err(RoomError::RoomFull(name.to_string()));
        }
        if status.players.iter().any(|p| p.username == username) {
            return Err(RoomError::UsernameTaken {
                room: name.to_string(),
                username: username.to_string(),
            });
        }
        Ok(())
    }

    /// Number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Shuts down every room. The registry is reusable afterwards, but
    /// this is meant for process teardown.
    pub async fn shutdown(&self) {
        let handles: Vec<RoomHandle> = {
            let mut rooms = self.rooms.write().await;
            rooms.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            let _ = handle.shutdown().await;
        }
        tracing::info!("registry shut down");
    }
}
