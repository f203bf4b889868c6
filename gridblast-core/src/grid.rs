//! Board validity predicates and corner helpers.

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, CELL_SIZE};
use crate::types::{CellPos, Direction};

/// `(x, y)` lies on the board.
#[inline]
pub const fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && x < BOARD_WIDTH && y >= 0 && y < BOARD_HEIGHT
}

/// `(x, y)` sits exactly on the cell grid.
#[inline]
pub const fn is_cell_aligned(x: i32, y: i32) -> bool {
    x % CELL_SIZE == 0 && y % CELL_SIZE == 0
}

/// A position names a cell iff it is on the board and grid-aligned.
#[inline]
pub const fn is_valid_cell(pos: CellPos) -> bool {
    in_bounds(pos.x, pos.y) && is_cell_aligned(pos.x, pos.y)
}

/// The four spawn-safe corner cells, clockwise from the origin.
pub const fn corner_cells() -> [CellPos; 4] {
    [
        CellPos::new(0, 0),
        CellPos::new(BOARD_WIDTH - CELL_SIZE, 0),
        CellPos::new(BOARD_WIDTH - CELL_SIZE, BOARD_HEIGHT - CELL_SIZE),
        CellPos::new(0, BOARD_HEIGHT - CELL_SIZE),
    ]
}

/// Corner cells are reserved for spawns and never hold obstacles.
pub fn is_corner(pos: CellPos) -> bool {
    corner_cells().contains(&pos)
}

/// Cell `steps` cells away from `from` in direction `dir`.
#[inline]
pub const fn step(from: CellPos, dir: Direction, steps: i32) -> CellPos {
    let (dx, dy) = dir.delta();
    CellPos::new(from.x + dx * CELL_SIZE * steps, from.y + dy * CELL_SIZE * steps)
}
