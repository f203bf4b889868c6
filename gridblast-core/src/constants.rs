//! Board geometry, timings, and balance constants.
//!
//! Durations are plain milliseconds; the simulation itself has no clocks,
//! the embedder schedules the matching transitions.

// Board dimensions (pixels)
pub const BOARD_WIDTH: i32 = 800;
pub const BOARD_HEIGHT: i32 = 600;
pub const CELL_SIZE: i32 = 50;

// Derived grid dimensions (cells)
pub const GRID_COLS: i32 = BOARD_WIDTH / CELL_SIZE; // 16
pub const GRID_ROWS: i32 = BOARD_HEIGHT / CELL_SIZE; // 12

// Obstacle generation
pub const OBSTACLE_COUNT: usize = 10;
pub const OBSTACLE_DESTRUCTIBLE_PCT: u32 = 50;

// Bomb lifecycle timings
pub const BOMB_FUSE_MS: u64 = 3000;
pub const FIRE_LIFETIME_MS: u64 = 1000;

// Bonuses
pub const BONUS_DROP_PCT: u32 = 25;
pub const BONUS_LIFETIME_MS: u64 = 5000;

// Starting player stats
pub const STARTING_BLAST_RADIUS: u32 = 3;
pub const STARTING_MAX_BOMBS: u32 = 1;

// Radius pickups stop extending the blast once it spans the board.
pub const MAX_BLAST_RADIUS: u32 = GRID_COLS as u32;

// One spawn corner per player.
pub const MAX_ROOM_PLAYERS: usize = 4;
