//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an entity, assigned in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2D position in the world.
///
/// Ordering compares `x` first and then `y`, which is the order the
/// simulator visits occupied cells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one step away, or `None` if a coordinate would overflow
    pub fn offset(&self, offset: Offset) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(offset.dx)?,
            y: self.y.checked_add(offset.dy)?,
        })
    }

    /// True if both coordinates lie in `[0, size)`
    pub fn in_bounds(&self, size: i32) -> bool {
        self.x >= 0 && self.x < size && self.y >= 0 && self.y < size
    }

    /// Chebyshev distance to another position
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A step to one of the 8 Chebyshev neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    /// The 8 neighbor offsets, `dx` varying slowest.
    pub const ALL: [Offset; 8] = [
        Offset { dx: -1, dy: -1 },
        Offset { dx: -1, dy: 0 },
        Offset { dx: -1, dy: 1 },
        Offset { dx: 0, dy: -1 },
        Offset { dx: 0, dy: 1 },
        Offset { dx: 1, dy: -1 },
        Offset { dx: 1, dy: 0 },
        Offset { dx: 1, dy: 1 },
    ];

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Free-form category label for an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
