//! Seeded obstacle layout generation.
//!
//! One generator serves both halves of the system: the relay generates the
//! authoritative layout for a room, and a predicting client that received
//! the room seed can re-run the same generation locally.

use crate::constants::{
    CELL_SIZE, GRID_COLS, GRID_ROWS, OBSTACLE_COUNT, OBSTACLE_DESTRUCTIBLE_PCT,
};
use crate::grid;
use crate::rng::SeededRng;
use crate::types::{CellPos, Obstacle};

/// Layout knobs. `Default` is the shipping board.
#[derive(Clone, Copy, Debug)]
pub struct LayoutParams {
    pub obstacle_count: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            obstacle_count: OBSTACLE_COUNT,
        }
    }
}

/// Multi-cell obstacle footprints, offsets in cells from the anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Plus,
    Bar,
    Hook,
}

impl Shape {
    const ALL: [Shape; 3] = [Shape::Plus, Shape::Bar, Shape::Hook];

    const fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Shape::Plus => &[(0, 0), (0, -1), (0, 1), (-1, 0), (1, 0)],
            Shape::Bar => &[(-1, 0), (0, 0), (1, 0)],
            Shape::Hook => &[(0, 0), (1, 0), (1, -1)],
        }
    }
}

/// Generate a room's obstacle set from `rng`.
///
/// Each placement drops a random shape on a random anchor cell. Shape cells
/// that leave the board, land on a spawn corner, or land on a cell an
/// earlier placement took are discarded; each surviving cell rolls its own
/// destructibility flag.
pub fn generate_obstacles(rng: &mut SeededRng, params: &LayoutParams) -> Vec<Obstacle> {
    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(params.obstacle_count * 5);

    for _ in 0..params.obstacle_count {
        let shape = Shape::ALL[rng.next_int(Shape::ALL.len() as u32) as usize];
        let anchor = CellPos::new(
            rng.next_int(GRID_COLS as u32) as i32 * CELL_SIZE,
            rng.next_int(GRID_ROWS as u32) as i32 * CELL_SIZE,
        );

        for &(dx, dy) in shape.offsets() {
            let cell = CellPos::new(anchor.x + dx * CELL_SIZE, anchor.y + dy * CELL_SIZE);
            if !grid::in_bounds(cell.x, cell.y) || grid::is_corner(cell) {
                continue;
            }
            if obstacles.iter().any(|existing| existing.cell() == cell) {
                continue;
            }
            let destructible = rng.next_int(100) < OBSTACLE_DESTRUCTIBLE_PCT;
            obstacles.push(Obstacle::at_cell(cell, destructible));
        }
    }

    obstacles
}
