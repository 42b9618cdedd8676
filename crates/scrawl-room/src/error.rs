//! Error types for the room layer.

/// Errors that can occur during room creation, lookup, and membership.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A room with this name already exists in the registry.
    #[error("room \"{0}\" already exists")]
    AlreadyExists(String),

    /// The requested capacity is below 2 or above the registry's maximum.
    #[error("room capacity {requested} is outside the allowed range {min}..={max}")]
    InvalidCapacity {
        requested: usize,
        min: usize,
        max: usize,
    },

    /// The room does not exist (never created, or already torn down).
    #[error("room \"{0}\" not found")]
    NotFound(String),

    /// Every player slot is taken.
    #[error("room \"{0}\" is full")]
    RoomFull(String),

    /// Another player in the room already uses this display name.
    #[error("username \"{username}\" is already taken in room \"{room}\"")]
    UsernameTaken { room: String, username: String },

    /// The room's command channel is closed — it is shutting down.
    #[error("room \"{0}\" is unavailable")]
    Unavailable(String),
}
