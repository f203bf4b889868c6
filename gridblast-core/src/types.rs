//! Entity types shared between the simulation and the wire protocol.
//!
//! Field names follow the wire format: obstacles carry `isDestructible`,
//! bonuses carry their kind under `type`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::CELL_SIZE;

/// Server-assigned player identity, one per connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A board position. Valid positions are multiples of the cell size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The four blast directions, in propagation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit cell delta.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// One grid obstacle. Fire removes destructible ones; indestructible ones
/// last for the room's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub is_destructible: bool,
}

impl Obstacle {
    pub(crate) fn at_cell(cell: CellPos, is_destructible: bool) -> Self {
        Self {
            x: cell.x,
            y: cell.y,
            width: CELL_SIZE,
            height: CELL_SIZE,
            is_destructible,
        }
    }

    pub fn cell(&self) -> CellPos {
        CellPos::new(self.x, self.y)
    }
}

/// Pickup kinds: extend the blast radius or raise the concurrent-bomb cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusKind {
    Radius,
    Bomb,
}

/// An uncollected pickup sitting on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: BonusKind,
}

impl Bonus {
    pub fn cell(&self) -> CellPos {
        CellPos::new(self.x, self.y)
    }
}

/// A transient hazard cell produced by an explosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireCell {
    pub id: u64,
    pub x: i32,
    pub y: i32,
}

impl FireCell {
    pub fn cell(&self) -> CellPos {
        CellPos::new(self.x, self.y)
    }
}

/// A placed, unexploded bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub owner: PlayerId,
}

impl Bomb {
    pub fn cell(&self) -> CellPos {
        CellPos::new(self.x, self.y)
    }
}
