//! The event surface the connection layer calls into.
//!
//! A [`GameServer`] owns the room registry and an index of which room
//! each client is in. The surrounding application (websocket routing,
//! HTTP room CRUD, session cookies) parses its envelopes and calls the
//! methods here; everything after that point happens inside the room
//! actors.
//!
//! Events addressed to a room that no longer exists are dropped, except
//! for the join handshake, which reports "room not found" back to the
//! caller so the client can be told.

use std::collections::HashMap;

use scrawl_protocol::{ChatMessage, RoomSummary};
use scrawl_room::{
    PlayerInfo, PlayerSender, RegistryConfig, RoomError, RoomHandle,
    RoomRegistry,
};
use scrawl_words::WordBank;
use tokio::sync::RwLock;

use crate::GameError;

/// The session core: one instance per process, shared behind an `Arc`
/// by the connection handlers.
pub struct GameServer {
    registry: RoomRegistry,
    /// client id → room name, maintained on join/disconnect so a
    /// disconnect doesn't have to scan every room.
    client_rooms: RwLock<HashMap<String, String>>,
}

impl GameServer {
    /// Builds a server from its configuration and raw word-list entries.
    ///
    /// # Errors
    /// Returns [`GameError::Words`] if the word list has no usable
    /// entries.
    pub fn new<I, S>(
        config: RegistryConfig,
        word_list: I,
    ) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = WordBank::new(word_list)?;
        Ok(Self {
            registry: RoomRegistry::new(config, words),
            client_rooms: RwLock::new(HashMap::new()),
        })
    }

    /// The underlying registry, for embedders that need direct access.
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    // -- Registry-facing surface (HTTP CRUD layer) -------------------------

    /// Creates a room. See [`RoomRegistry::create`] for the validation
    /// rules.
    pub async fn create_room(
        &self,
        name: &str,
        max_players: usize,
    ) -> Result<(), GameError> {
        self.registry.create(name, max_players).await?;
        Ok(())
    }

    /// Case-insensitive substring search over room names.
    pub async fn search_rooms(&self, query: &str) -> Vec<RoomSummary> {
        self.registry.search(query).await
    }

    /// Pre-flight check before a join handshake: the room exists, has a
    /// free slot, and the username is free.
    pub async fn check_join(
        &self,
        room_name: &str,
        username: &str,
    ) -> Result<(), GameError> {
        self.registry.check_join(room_name, username).await?;
        Ok(())
    }

    // -- Inbound events (websocket layer) ----------------------------------

    /// The join handshake. Adds the player to the room (or resumes a
    /// grace-held slot for a reconnecting `client_id`) and returns their
    /// snapshot.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the room doesn't exist — unlike the
    /// other events, the caller is told explicitly.
    pub async fn join_room(
        &self,
        room_name: &str,
        username: &str,
        client_id: &str,
        sender: PlayerSender,
    ) -> Result<PlayerInfo, GameError> {
        let room = self
            .registry
            .find(room_name)
            .await
            .ok_or_else(|| RoomError::NotFound(room_name.to_string()))?;

        let info = room.join(client_id, username, sender).await?;
        self.client_rooms
            .write()
            .await
            .insert(client_id.to_string(), room_name.to_string());
        Ok(info)
    }

    /// A client's connection went away. `immediate` skips the
    /// reconnection grace window (explicit close vs. a dropped socket).
    pub async fn disconnect(&self, client_id: &str, immediate: bool) {
        let room_name =
            self.client_rooms.write().await.remove(client_id);
        let Some(room_name) = room_name else {
            tracing::debug!(client_id = %client_id, "disconnect for unknown client");
            return;
        };

        match self.registry.find(&room_name).await {
            Some(room) => {
                let _ = room.leave(client_id, immediate).await;
            }
            // The room emptied out and unregistered itself while this
            // client's index entry was still around.
            None => tracing::debug!(
                client_id = %client_id,
                room = %room_name,
                "disconnect for already-closed room"
            ),
        }
    }

    /// A drawing stroke. Relayed to everyone else in the room while a
    /// round is running; dropped otherwise.
    pub async fn submit_stroke(
        &self,
        room_name: &str,
        client_id: &str,
        payload: serde_json::Value,
    ) {
        let Some(room) = self.find_or_drop(room_name, "stroke").await else {
            return;
        };
        let _ = room.stroke(client_id, payload).await;
    }

    /// The drawer picked a word; the round starts immediately.
    pub async fn choose_word(&self, room_name: &str, word: &str) {
        let Some(room) = self.find_or_drop(room_name, "word choice").await
        else {
            return;
        };
        let _ = room.choose_word(word).await;
    }

    /// A chat line. Scored as a guess when it matches the current word,
    /// relayed verbatim otherwise.
    pub async fn submit_guess(
        &self,
        room_name: &str,
        message: ChatMessage,
    ) {
        let Some(room) = self.find_or_drop(room_name, "guess").await else {
            return;
        };
        let _ = room.chat(message).await;
    }

    /// Tears down every room.
    pub async fn shutdown(&self) {
        self.registry.shutdown().await;
        self.client_rooms.write().await.clear();
    }

    async fn find_or_drop(
        &self,
        room_name: &str,
        event: &str,
    ) -> Option<RoomHandle> {
        let room = self.registry.find(room_name).await;
        if room.is_none() {
            tracing::debug!(room = %room_name, event, "event for unknown room dropped");
        }
        room
    }
}
