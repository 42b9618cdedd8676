//! Reconnection grace: holds a departed player's slot for a bounded
//! window so a reconnect within it resumes silently.
//!
//! The keeper is owned by its room actor and polled from the actor's
//! `select!` loop, the same way the phase countdown is. Holding, resuming
//! and expiring therefore never race with joins or guesses.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::debug;

use crate::Player;

struct GraceEntry {
    player: Player,
    /// Where in the player list the player sat when they left. Clamped
    /// on resume in case the list shrank meanwhile.
    index: usize,
    deadline: Instant,
}

/// Grace entries for one room, keyed by client id.
pub(crate) struct GraceKeeper {
    window: Duration,
    entries: HashMap<String, GraceEntry>,
}

impl GraceKeeper {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            entries: HashMap::new(),
        }
    }

    /// Starts the grace window for a departed player. A second disconnect
    /// for the same client id restarts the window with the fresh state.
    pub(crate) fn hold(&mut self, player: Player, index: usize) {
        let client_id = player.client_id.clone();
        debug!(
            client_id = %client_id,
            grace_secs = self.window.as_secs(),
            "holding player slot"
        );
        self.entries.insert(
            client_id,
            GraceEntry {
                player,
                index,
                deadline: Instant::now() + self.window,
            },
        );
    }

    /// Consumes the grace entry for a reconnecting client, cancelling its
    /// expiry. Returns the held player and their original list index.
    pub(crate) fn resume(&mut self, client_id: &str) -> Option<(Player, usize)> {
        self.entries
            .remove(client_id)
            .map(|entry| (entry.player, entry.index))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Waits for the earliest deadline and finalizes that entry's
    /// removal, returning the dropped player.
    ///
    /// Pends forever while no entries are held, so this can sit in a
    /// `select!` branch. Cancel-safe: dropping the future before the
    /// deadline leaves every entry intact.
    pub(crate) async fn next_expired(&mut self) -> Player {
        let (client_id, deadline) = match self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.deadline)
        {
            Some((id, entry)) => (id.clone(), entry.deadline),
            None => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(deadline).await;

        // The owning actor can't have resumed the entry while this
        // branch was the one being polled.
        self.entries
            .remove(&client_id)
            .map(|entry| entry.player)
            .expect("grace entry present across its own sleep")
    }
}

// =========================================================================
// Tests
// =========================================================================
