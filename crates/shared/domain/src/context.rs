use serde::{Deserialize, Serialize};
use std::fmt;

/// A block position in a named world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    #[must_use]
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self { world: world.into(), x, y, z }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{},{},{}", self.world, self.x, self.y, self.z)
    }
}

/// The player (or automaton) asking for a decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identifier, typically the player UUID.
    pub id: String,
    pub name: String,
}

impl Actor {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}
