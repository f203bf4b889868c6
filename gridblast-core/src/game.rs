//! Authoritative per-room game state.
//!
//! `Game` is a pure state machine. Every timed transition (fuse elapse,
//! fire burn-out, bonus expiry) is an explicit operation invoked by the
//! embedder, which owns the clocks; operations return outcome structs the
//! relay turns into broadcast events. Nothing here performs I/O.

use crate::constants::{
    BONUS_DROP_PCT, MAX_BLAST_RADIUS, MAX_ROOM_PLAYERS, STARTING_BLAST_RADIUS, STARTING_MAX_BOMBS,
};
use crate::error::{ActionError, StateViolation};
use crate::grid;
use crate::layout::{self, LayoutParams};
use crate::protocol::{BonusTally, PlayerSnapshot};
use crate::rng::SeededRng;
use crate::types::{Bomb, Bonus, BonusKind, CellPos, Direction, FireCell, Obstacle, PlayerId};

/// One player's authoritative state.
#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub x: i32,
    pub y: i32,
    pub blast_radius: u32,
    pub max_bombs: u32,
    pub active_bombs: u32,
    pub bonuses: BonusTally,
    pub alive: bool,
}

impl Player {
    pub fn position(&self) -> CellPos {
        CellPos::new(self.x, self.y)
    }

    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            position: self.position(),
            blast_radius: self.blast_radius,
            max_bombs: self.max_bombs,
            active_bombs: self.active_bombs,
            bonuses: self.bonuses,
            alive: self.alive,
        }
    }
}

/// Record of one explosion whose fire is still on the board.
#[derive(Clone, Debug)]
struct Blast {
    id: u64,
    owner: PlayerId,
    fire_ids: Vec<u64>,
}

/// An accepted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub position: CellPos,
    pub collected: Option<CollectedBonus>,
    /// The destination held active fire; the mover is now game-over.
    pub fatal: bool,
}

/// A pickup consumed by a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectedBonus {
    pub id: u64,
    pub kind: BonusKind,
}

/// An accepted bomb placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedBomb {
    pub id: u64,
    pub position: CellPos,
}

/// Everything one detonation changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplosionOutcome {
    pub id: u64,
    pub origin: CellPos,
    pub fire: Vec<FireCell>,
    pub destroyed_obstacles: Vec<CellPos>,
    pub spawned_bonuses: Vec<Bonus>,
    pub hit_players: Vec<PlayerId>,
}

/// A departed player's residue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovedPlayer {
    /// Unexploded bombs that left the board with the player. Their fuse
    /// timers must be cancelled by the embedder.
    pub cancelled_bombs: Vec<u64>,
}

/// Authoritative state of one room.
#[derive(Clone, Debug)]
pub struct Game {
    seed: u32,
    rng: SeededRng,
    next_entity_id: u64,
    obstacles: Vec<Obstacle>,
    bombs: Vec<Bomb>,
    fire: Vec<FireCell>,
    bonuses: Vec<Bonus>,
    blasts: Vec<Blast>,
    players: Vec<Player>,
}

impl Game {
    /// Fresh room state with the default board layout.
    pub fn new(seed: u32) -> Self {
        Self::with_params(seed, &LayoutParams::default())
    }

    /// Fresh room state with explicit layout knobs.
    pub fn with_params(seed: u32, params: &LayoutParams) -> Self {
        let mut rng = SeededRng::new(seed);
        let obstacles = layout::generate_obstacles(&mut rng, params);
        Self {
            seed,
            rng,
            next_entity_id: 1,
            obstacles,
            bombs: Vec::new(),
            fire: Vec::new(),
            bonuses: Vec::new(),
            blasts: Vec::new(),
            players: Vec::new(),
        }
    }

    /// The seed this room's layout and drops derive from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    // ----- players -----

    /// Add a player on the first free spawn corner.
    pub fn add_player(&mut self, id: PlayerId) -> Result<PlayerSnapshot, ActionError> {
        if self.players.len() >= MAX_ROOM_PLAYERS {
            return Err(ActionError::RoomFull);
        }
        // A corner someone merely walked onto is skipped too; with at most
        // three players present one of the four is always free.
        let spawn = grid::corner_cells()
            .into_iter()
            .find(|corner| !self.players.iter().any(|p| p.position() == *corner))
            .ok_or(ActionError::RoomFull)?;

        let player = Player {
            id,
            x: spawn.x,
            y: spawn.y,
            blast_radius: STARTING_BLAST_RADIUS,
            max_bombs: STARTING_MAX_BOMBS,
            active_bombs: 0,
            bonuses: BonusTally::default(),
            alive: true,
        };
        self.players.push(player);
        Ok(player.snapshot())
    }

    /// Remove a player and report the bombs that leave with them.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<RemovedPlayer> {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        if self.players.len() == before {
            return None;
        }
        let cancelled_bombs: Vec<u64> = self
            .bombs
            .iter()
            .filter(|b| b.owner == id)
            .map(|b| b.id)
            .collect();
        self.bombs.retain(|b| b.owner != id);
        Some(RemovedPlayer { cancelled_bombs })
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Roster as broadcast by `updatePlayers`.
    pub fn snapshot_players(&self) -> Vec<PlayerSnapshot> {
        self.players.iter().map(Player::snapshot).collect()
    }

    // ----- movement -----

    /// Validate and apply a move intent.
    ///
    /// Accepts any in-bounds, grid-aligned, obstacle-free destination.
    /// Walking onto active fire is allowed and fatal; a fatal step does not
    /// collect a pickup on the same cell.
    pub fn try_move(&mut self, id: PlayerId, to: CellPos) -> Result<MoveOutcome, ActionError> {
        let player = self.player(id).ok_or(ActionError::UnknownPlayer)?;
        if !player.alive {
            return Err(ActionError::PlayerEliminated);
        }
        if !grid::in_bounds(to.x, to.y) {
            return Err(ActionError::OutOfBounds);
        }
        if !grid::is_cell_aligned(to.x, to.y) {
            return Err(ActionError::NotCellAligned);
        }
        if self.obstacle_at(to).is_some() {
            return Err(ActionError::CellBlocked);
        }

        let fatal = self.fire.iter().any(|f| f.cell() == to);
        let collected = if fatal {
            None
        } else {
            self.bonuses
                .iter()
                .find(|b| b.cell() == to)
                .map(|b| CollectedBonus { id: b.id, kind: b.kind })
        };
        if let Some(bonus) = collected {
            self.bonuses.retain(|b| b.id != bonus.id);
        }

        let Some(player) = self.player_mut(id) else {
            return Err(ActionError::UnknownPlayer);
        };
        player.x = to.x;
        player.y = to.y;
        if let Some(bonus) = collected {
            match bonus.kind {
                BonusKind::Radius => {
                    player.bonuses.radius += 1;
                    if player.blast_radius < MAX_BLAST_RADIUS {
                        player.blast_radius += 1;
                    }
                }
                BonusKind::Bomb => {
                    player.bonuses.bombs += 1;
                    player.max_bombs += 1;
                }
            }
        }
        if fatal {
            player.alive = false;
        }

        Ok(MoveOutcome {
            position: to,
            collected,
            fatal,
        })
    }

    // ----- bombs -----

    /// Validate and apply a place-bomb intent.
    pub fn place_bomb(&mut self, owner: PlayerId) -> Result<PlacedBomb, ActionError> {
        let player = self.player(owner).ok_or(ActionError::UnknownPlayer)?;
        if !player.alive {
            return Err(ActionError::PlayerEliminated);
        }
        if player.active_bombs >= player.max_bombs {
            return Err(ActionError::BombLimitReached);
        }
        let position = player.position();

        let id = self.next_id();
        self.bombs.push(Bomb {
            id,
            x: position.x,
            y: position.y,
            owner,
        });
        if let Some(player) = self.player_mut(owner) {
            player.active_bombs += 1;
        }
        Ok(PlacedBomb { id, position })
    }

    /// Fuse elapsed: convert the bomb into fire.
    ///
    /// Per direction, fire walks outward up to the owner's blast radius at
    /// detonation time: off-board stops the ray, an indestructible obstacle
    /// stops it without fire, a destructible obstacle is destroyed, burns,
    /// and stops it. The origin cell always burns. Every live player
    /// standing in the produced fire is marked game-over, the owner
    /// included.
    pub fn detonate_bomb(&mut self, bomb_id: u64) -> Result<ExplosionOutcome, ActionError> {
        let Some(bomb) = self.bombs.iter().find(|b| b.id == bomb_id).copied() else {
            return Err(ActionError::UnknownBomb);
        };
        let Some(radius) = self.player(bomb.owner).map(|p| p.blast_radius) else {
            return Err(ActionError::UnknownPlayer);
        };
        self.bombs.retain(|b| b.id != bomb_id);
        let origin = bomb.cell();

        let id = self.next_id();
        let mut fire = Vec::new();
        let mut destroyed_obstacles = Vec::new();
        let mut spawned_bonuses = Vec::new();

        self.push_fire(&mut fire, origin);
        for dir in Direction::ALL {
            for step in 1..=radius {
                let cell = grid::step(origin, dir, step as i32);
                if !grid::in_bounds(cell.x, cell.y) {
                    break;
                }
                match self.obstacle_at(cell).map(|o| o.is_destructible) {
                    Some(false) => break,
                    Some(true) => {
                        self.destroy_obstacle(cell, &mut spawned_bonuses);
                        destroyed_obstacles.push(cell);
                        self.push_fire(&mut fire, cell);
                        break;
                    }
                    None => self.push_fire(&mut fire, cell),
                }
            }
        }

        let mut hit_players = Vec::new();
        for player in self.players.iter_mut() {
            if player.alive && fire.iter().any(|f| f.cell() == player.position()) {
                player.alive = false;
                hit_players.push(player.id);
            }
        }

        self.blasts.push(Blast {
            id,
            owner: bomb.owner,
            fire_ids: fire.iter().map(|f| f.id).collect(),
        });

        Ok(ExplosionOutcome {
            id,
            origin,
            fire,
            destroyed_obstacles,
            spawned_bonuses,
            hit_players,
        })
    }

    fn push_fire(&mut self, fire: &mut Vec<FireCell>, cell: CellPos) {
        let cell_fire = FireCell {
            id: self.next_id(),
            x: cell.x,
            y: cell.y,
        };
        self.fire.push(cell_fire);
        fire.push(cell_fire);
    }

    /// Remove the destructible obstacle at `cell` and roll its bonus drop.
    fn destroy_obstacle(&mut self, cell: CellPos, spawned: &mut Vec<Bonus>) {
        self.obstacles.retain(|o| o.cell() != cell);
        if self.rng.next_int(100) >= BONUS_DROP_PCT {
            return;
        }
        if self.bonuses.iter().any(|b| b.cell() == cell) {
            return;
        }
        let kind = if self.rng.next_int(2) == 0 {
            BonusKind::Radius
        } else {
            BonusKind::Bomb
        };
        let bonus = Bonus {
            id: self.next_id(),
            x: cell.x,
            y: cell.y,
            kind,
        };
        self.bonuses.push(bonus);
        spawned.push(bonus);
    }

    /// Fire lifetime elapsed: remove the blast's fire and release the slot.
    ///
    /// The owner's active count only drops once the fire is gone. An owner
    /// who left the room mid-burn has no slot left to release.
    pub fn clear_blast(&mut self, blast_id: u64) -> Result<(), ActionError> {
        let Some(index) = self.blasts.iter().position(|b| b.id == blast_id) else {
            return Err(ActionError::UnknownBlast);
        };
        let blast = self.blasts.swap_remove(index);
        self.fire.retain(|f| !blast.fire_ids.contains(&f.id));
        if let Some(owner) = self.player_mut(blast.owner) {
            owner.active_bombs = owner.active_bombs.saturating_sub(1);
        }
        Ok(())
    }

    /// Bonus lifetime elapsed: remove it if still uncollected.
    pub fn expire_bonus(&mut self, bonus_id: u64) -> Result<(), ActionError> {
        let before = self.bonuses.len();
        self.bonuses.retain(|b| b.id != bonus_id);
        if self.bonuses.len() == before {
            Err(ActionError::UnknownBonus)
        } else {
            Ok(())
        }
    }

    // ----- board queries -----

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn fire(&self) -> &[FireCell] {
        &self.fire
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    pub fn obstacle_at(&self, cell: CellPos) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.cell() == cell)
    }

    /// Cross-check the structural rules that must hold between operations.
    pub fn validate_invariants(&self) -> Result<(), StateViolation> {
        for player in &self.players {
            if player.active_bombs > player.max_bombs {
                return Err(StateViolation::BombCountExceedsCap);
            }
            if !grid::is_valid_cell(player.position()) {
                return Err(StateViolation::EntityOffGrid);
            }
        }
        for obstacle in &self.obstacles {
            if !grid::is_valid_cell(obstacle.cell()) {
                return Err(StateViolation::EntityOffGrid);
            }
            if grid::is_corner(obstacle.cell()) {
                return Err(StateViolation::ObstacleOnSpawnCorner);
            }
        }
        for bomb in &self.bombs {
            if !grid::is_valid_cell(bomb.cell()) {
                return Err(StateViolation::EntityOffGrid);
            }
            if self.player(bomb.owner).is_none() {
                return Err(StateViolation::BombWithoutOwner);
            }
        }
        for bonus in &self.bonuses {
            if !grid::is_valid_cell(bonus.cell()) {
                return Err(StateViolation::EntityOffGrid);
            }
        }
        for fire in &self.fire {
            if !grid::is_valid_cell(fire.cell()) {
                return Err(StateViolation::EntityOffGrid);
            }
            if !self.blasts.iter().any(|b| b.fire_ids.contains(&fire.id)) {
                return Err(StateViolation::FireWithoutBlast);
            }
        }
        Ok(())
    }
}
