//! Wire types for Scrawl.
//!
//! This crate defines what the session core says to clients:
//!
//! - [`ServerMessage`] — every outbound message kind, as an internally
//!   tagged JSON record.
//! - [`ChatMessage`] — the inbound chat/guess payload, relayed back out
//!   verbatim when it isn't a correct guess.
//! - [`Phase`], [`AnnouncementKind`], [`PlayerListEntry`], [`RoomSummary`]
//!   — the vocabulary those records are built from.
//!
//! The crate knows nothing about rooms, sockets, or timing — it is the
//! shared language between the room layer and whatever owns the
//! connections.

mod types;

pub use types::{
    unix_millis, AnnouncementKind, ChatMessage, Phase, PlayerListEntry,
    RoomSummary, ServerMessage,
};
