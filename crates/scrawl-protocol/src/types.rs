//! Message types for Scrawl's outbound wire format.
//!
//! Everything the session core sends to a client is a [`ServerMessage`].
//! The enum is internally tagged (`"type"`) and fields are camelCase, so
//! each variant serializes as a flat JSON record with a discriminator —
//! the shape the game clients already parse.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The stage a match is currently in.
///
/// A room cycles through these in a fixed order; every phase has its own
/// countdown and entry behavior (driven by the room, not by this type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Fewer than two players present; nothing scheduled.
    WaitingForPlayers,
    /// Enough players to play; counting down to the first round.
    WaitingForStart,
    /// A new drawer is picking one of three candidate words.
    NewRound,
    /// The drawer draws, everyone else guesses.
    GameRunning,
    /// The word is revealed before the next round starts.
    ShowWord,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::WaitingForStart => write!(f, "WaitingForStart"),
            Self::NewRound => write!(f, "NewRound"),
            Self::GameRunning => write!(f, "GameRunning"),
            Self::ShowWord => write!(f, "ShowWord"),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A chat line from a player. Doubles as a guess while a round is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Username of the sender.
    pub from: String,
    /// The raw text. Checked against the current word, then either scored
    /// or relayed verbatim.
    pub message: String,
    /// Milliseconds since the Unix epoch, stamped by the sender's handler.
    pub timestamp: u64,
}

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

/// What a broadcast [`ServerMessage::Announcement`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnouncementKind {
    /// A player guessed the word.
    Guessed,
    /// A player joined the room.
    Joined,
    /// A player left the room.
    Left,
    /// Every guesser got the word; the round is ending early.
    EveryoneGuessed,
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// One row of the scoreboard sent with [`ServerMessage::PlayersList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListEntry {
    pub username: String,
    pub is_drawing: bool,
    pub score: i32,
    /// 1-based position after sorting by score, descending.
    pub rank: usize,
}

/// A room summary returned by the registry's search surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub name: String,
    pub max_players: usize,
    pub player_count: usize,
}

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// Everything the room can send to a connected player.
///
/// `#[serde(tag = "type")]` produces e.g.
/// `{ "type": "PhaseChange", "remainingMs": 10000, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Phase countdown update. `phase` is only set on the first tick of a
    /// countdown (and in join snapshots); later ticks carry time only.
    #[serde(rename_all = "camelCase")]
    PhaseChange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phase: Option<Phase>,
        remaining_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        drawer_username: Option<String>,
    },

    /// A room-wide event notice (join, leave, guessed, round over).
    #[serde(rename_all = "camelCase")]
    Announcement {
        message: String,
        timestamp: u64,
        kind: AnnouncementKind,
    },

    /// The three candidate words. Unicast to the new drawer only.
    #[serde(rename_all = "camelCase")]
    NewWords { candidates: Vec<String> },

    /// Who is drawing and what the word looks like from the recipient's
    /// side: the plain word for the drawer, the underscore mask for
    /// everyone else.
    #[serde(rename_all = "camelCase")]
    GameState {
        drawer_username: String,
        word: String,
    },

    /// The revealed word, broadcast when the round ends.
    #[serde(rename_all = "camelCase")]
    ChosenWord { word: String, room_name: String },

    /// Scoreboard snapshot, ordered by score descending.
    #[serde(rename_all = "camelCase")]
    PlayersList { players: Vec<PlayerListEntry> },

    /// A drawing stroke, relayed untouched from the drawer to the rest
    /// of the room. The payload is opaque to the session core.
    #[serde(rename_all = "camelCase")]
    DrawData { payload: serde_json::Value },

    /// An ordinary chat line (a guess that didn't match), relayed verbatim.
    Chat(ChatMessage),
}

/// Milliseconds since the Unix epoch, for announcement timestamps.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =========================================================================
// Tests
// =========================================================================
