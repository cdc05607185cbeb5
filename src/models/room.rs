//! Room model.
//!
//! Rooms are the physical resources sessions are placed in. Each room has
//! a type ("lecture", "computer lab", ...) that must match the type a
//! course requires. Rooms are read-only inputs to the engine.

use serde::{Deserialize, Serialize};

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room name.
    pub name: String,
    /// Room type (normalized: trimmed, lower-case).
    pub room_type: String,
}

impl Room {
    /// Creates a room, normalizing name and type.
    pub fn new(name: impl Into<String>, room_type: impl AsRef<str>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            room_type: normalize_room_type(room_type.as_ref()),
        }
    }

    /// Whether this room serves the given (normalized) type.
    #[inline]
    pub fn serves(&self, room_type: &str) -> bool {
        self.room_type == room_type
    }
}

/// Normalizes a room type for comparison: trimmed, lower-case.
pub fn normalize_room_type(room_type: &str) -> String {
    room_type.trim().to_lowercase()
}
