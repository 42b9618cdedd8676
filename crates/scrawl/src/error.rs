//! Unified error type for the Scrawl session core.

use scrawl_room::RoomError;
use scrawl_words::WordsError;

/// Top-level error that wraps the layer-specific errors.
///
/// Callers of the [`GameServer`](crate::GameServer) deal with this one
/// type; the `#[from]` attributes let `?` convert the inner errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A room-layer error (creation validation, lookup, membership).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A word-bank error (empty word list at construction).
    #[error(transparent)]
    Words(#[from] WordsError),
}
