pub mod constants;
pub mod error;
pub mod game;
pub mod grid;
pub mod layout;
pub mod protocol;
pub mod rng;
pub mod types;

pub use error::{ActionError, StateViolation};
pub use game::{
    CollectedBonus, ExplosionOutcome, Game, MoveOutcome, PlacedBomb, Player, RemovedPlayer,
};
pub use layout::LayoutParams;
pub use protocol::{BonusTally, ClientEvent, PlayerSnapshot, ServerEvent};
pub use types::{Bomb, Bonus, BonusKind, CellPos, Direction, FireCell, Obstacle, PlayerId};
