//! Rejection reasons and invariant violations.

use std::fmt;

/// Why an intent against a room's state was refused.
///
/// The relay never replies to a rejected intent; these variants exist so the
/// drop can be logged with a reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// The referenced player is not in this room.
    UnknownPlayer,
    /// The player already reached game-over and may no longer act.
    PlayerEliminated,
    /// Destination lies outside the board.
    OutOfBounds,
    /// Destination is not aligned to the cell grid.
    NotCellAligned,
    /// Destination cell holds an obstacle.
    CellBlocked,
    /// Every bomb the player may hold is already on the board.
    BombLimitReached,
    /// The referenced bomb no longer exists.
    UnknownBomb,
    /// The referenced explosion has no fire left to clear.
    UnknownBlast,
    /// The referenced bonus was already collected or expired.
    UnknownBonus,
    /// Every spawn corner is taken.
    RoomFull,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlayer => write!(f, "unknown player"),
            Self::PlayerEliminated => write!(f, "player is eliminated"),
            Self::OutOfBounds => write!(f, "destination out of bounds"),
            Self::NotCellAligned => write!(f, "destination not cell-aligned"),
            Self::CellBlocked => write!(f, "destination cell blocked"),
            Self::BombLimitReached => write!(f, "bomb limit reached"),
            Self::UnknownBomb => write!(f, "unknown bomb"),
            Self::UnknownBlast => write!(f, "unknown blast"),
            Self::UnknownBonus => write!(f, "unknown bonus"),
            Self::RoomFull => write!(f, "room is full"),
        }
    }
}

impl std::error::Error for ActionError {}

/// A structural rule the room state must satisfy at every quiescent point.
///
/// Checked by [`crate::game::Game::validate_invariants`]; a violation means
/// a bug in the transition logic, not bad input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateViolation {
    /// A player holds more active bombs than their cap allows.
    BombCountExceedsCap,
    /// An entity sits off the board or off the cell grid.
    EntityOffGrid,
    /// An obstacle occupies a reserved spawn corner.
    ObstacleOnSpawnCorner,
    /// A fire cell belongs to no recorded blast.
    FireWithoutBlast,
    /// A bomb's owner is not in the room.
    BombWithoutOwner,
}

impl fmt::Display for StateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BombCountExceedsCap => write!(f, "active bombs exceed player cap"),
            Self::EntityOffGrid => write!(f, "entity off the cell grid"),
            Self::ObstacleOnSpawnCorner => write!(f, "obstacle on a spawn corner"),
            Self::FireWithoutBlast => write!(f, "fire cell without a blast record"),
            Self::BombWithoutOwner => write!(f, "bomb without a present owner"),
        }
    }
}

impl std::error::Error for StateViolation {}
