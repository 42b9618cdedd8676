//! Room and registry configuration.

use std::time::Duration;

use scrawl_protocol::Phase;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Timing and scoring parameters for a room.
///
/// Every room created by a registry shares the registry's copy; the
/// per-room capacity is chosen at creation time and lives on the room
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// How often an active countdown broadcasts the remaining time.
    pub tick_interval: Duration,

    /// How long a disconnected player's slot and score are held for a
    /// silent resume.
    pub reconnect_grace: Duration,

    /// Display duration announced with the WaitingForPlayers phase.
    /// Nothing is scheduled — the phase ends on a join, not a timer.
    pub waiting_for_players_display: Duration,

    /// WaitingForStart → NewRound countdown.
    pub waiting_for_start: Duration,

    /// How long the drawer gets to pick one of the candidate words
    /// before the round starts with a fallback word.
    pub word_choice: Duration,

    /// Length of the drawing/guessing phase. Also the denominator of the
    /// time-decay in the guess score.
    pub drawing: Duration,

    /// How long the revealed word stays up before the next round.
    pub word_reveal: Duration,

    /// Flat part of a correct guess's score.
    pub guess_score_base: i32,

    /// Time-decayed part: a guess at the first instant earns the full
    /// multiplier on top of the base, a guess at the last earns none.
    pub guess_score_multiplier: i32,

    /// Pool credited to the drawer per correct guess, split evenly
    /// across the room.
    pub drawer_bonus: i32,

    /// Deducted from the drawer when a round ends with no correct guess.
    pub no_guess_penalty: i32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            reconnect_grace: Duration::from_secs(60),
            waiting_for_players_display: Duration::from_secs(10),
            waiting_for_start: Duration::from_secs(10),
            word_choice: Duration::from_secs(20),
            drawing: Duration::from_secs(60),
            word_reveal: Duration::from_secs(10),
            guess_score_base: 50,
            guess_score_multiplier: 50,
            drawer_bonus: 50,
            no_guess_penalty: 50,
        }
    }
}

impl RoomConfig {
    /// Full countdown length of a phase.
    ///
    /// Used for a join snapshot when no countdown is running, and as the
    /// duration armed on phase entry.
    pub fn phase_duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::WaitingForPlayers => self.waiting_for_players_display,
            Phase::WaitingForStart => self.waiting_for_start,
            Phase::NewRound => self.word_choice,
            Phase::GameRunning => self.drawing,
            Phase::ShowWord => self.word_reveal,
        }
    }
}

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`RoomRegistry`](crate::RoomRegistry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Upper bound on a room's requested capacity. The lower bound is
    /// always 2 — a match needs a drawer and a guesser.
    pub max_capacity: usize,

    /// Shared per-room settings.
    pub room: RoomConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_capacity: 8,
            room: RoomConfig::default(),
        }
    }
}
