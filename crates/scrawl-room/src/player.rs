//! The per-participant state a room tracks.

use scrawl_protocol::ServerMessage;
use tokio::sync::mpsc;

/// Channel sender delivering outbound messages to one participant's
/// connection handler.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// One participant in a room.
///
/// Owned by the room actor. When the player disconnects the whole value
/// moves into the grace keeper so a resume within the window restores
/// score and position; only the `sender` is replaced on reconnect.
#[derive(Debug, Clone)]
pub struct Player {
    /// Stable identity across reconnects, issued by the connection layer.
    pub client_id: String,
    /// Display name, unique within the room.
    pub username: String,
    pub(crate) sender: PlayerSender,
    /// Signed — the no-guess penalty can push it below zero.
    pub score: i32,
    pub is_drawing: bool,
    pub is_online: bool,
}

impl Player {
    pub(crate) fn new(
        client_id: String,
        username: String,
        sender: PlayerSender,
    ) -> Self {
        Self {
            client_id,
            username,
            sender,
            score: 0,
            is_drawing: false,
            is_online: true,
        }
    }

    /// Delivers a message to this player. A gone receiver (connection
    /// handler dropped) is a silent no-op, not an error.
    pub(crate) fn send(&self, msg: ServerMessage) {
        let _ = self.sender.send(msg);
    }

    /// A plain-data snapshot of this player, safe to hand outside the
    /// room actor.
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            client_id: self.client_id.clone(),
            username: self.username.clone(),
            score: self.score,
            is_drawing: self.is_drawing,
        }
    }
}

/// What a join reply and room status report about a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub client_id: String,
    pub username: String,
    pub score: i32,
    pub is_drawing: bool,
}
