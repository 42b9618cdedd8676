//! Room lifecycle for Scrawl.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its
//! players, phase machine, countdown, and reconnection grace entries.
//! The [`RoomRegistry`] is the only state shared across rooms.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates/finds/removes rooms by name
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomConfig`] / [`RegistryConfig`] — timings, scoring, capacity
//! - [`RoomError`] — everything that can go wrong at this layer

mod config;
mod error;
mod grace;
mod player;
mod registry;
mod room;
pub mod score;

pub use config::{RegistryConfig, RoomConfig};
pub use error::RoomError;
pub use player::{Player, PlayerInfo, PlayerSender};
pub use registry::RoomRegistry;
pub use room::{RoomHandle, RoomStatus};
