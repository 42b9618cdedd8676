//! # Scrawl
//!
//! The session core of a real-time multiplayer drawing-and-guessing
//! game: rooms, timed match phases, guess scoring, and reconnection
//! grace. The surrounding application supplies connections, envelope
//! parsing, and HTTP plumbing, and calls into [`GameServer`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use scrawl::prelude::*;
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), GameError> {
//! let server = GameServer::new(
//!     RegistryConfig::default(),
//!     ["cat", "dog", "house"],
//! )?;
//!
//! server.create_room("den", 4).await?;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! server.join_room("den", "alice", "client-1", tx).await?;
//! // rx now receives ServerMessage values for alice.
//! # Ok(())
//! # }
//! ```

mod error;
mod server;

pub use error::GameError;
pub use server::GameServer;

pub mod prelude {
    //! Everything an embedding application typically needs.

    pub use crate::{GameError, GameServer};
    pub use scrawl_protocol::{
        AnnouncementKind, ChatMessage, Phase, PlayerListEntry, RoomSummary,
        ServerMessage,
    };
    pub use scrawl_room::{
        PlayerInfo, PlayerSender, RegistryConfig, RoomConfig, RoomError,
        RoomHandle, RoomRegistry, RoomStatus,
    };
    pub use scrawl_words::{WordBank, WordsError};
}
