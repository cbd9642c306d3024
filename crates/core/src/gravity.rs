//! Gravity ("settling")
//!
//! Each column is compacted toward `y = 0` independently. Surviving tiles keep
//! their relative order and their identity; every hole ends up above every tile.

use crate::grid::Grid;
use crate::types::{Pos, TileHandle, TileId};

/// A tile that moved during settling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    pub id: TileId,
    pub handle: TileHandle,
    pub from: Pos,
    pub to: Pos,
}

impl Fall {
    pub fn distance(&self) -> u8 {
        self.from.y - self.to.y
    }
}

/// Compact every column downward and report the moves, column by column,
/// bottom to top.
///
/// Two-pointer pass per column: `write` trails `read` and marks the lowest hole.
pub fn settle(grid: &mut Grid) -> Vec<Fall> {
    let (width, height) = grid.dimensions();
    let mut falls = Vec::new();

    for x in 0..width {
        let mut write = 0u8;
        for read in 0..height {
            let from = Pos::new(x, read);
            // Positions come from the grid's own dimensions.
            let Ok(Some(tile)) = grid.at(from) else {
                continue;
            };
            if read != write {
                // Everything between `write` and `read` is already a hole.
                let to = Pos::new(x, write);
                grid.exchange(from, to);
                falls.push(Fall {
                    id: tile.id,
                    handle: tile.handle,
                    from,
                    to,
                });
            }
            write += 1;
        }
    }

    falls
}

/// True when no column has a hole below a tile
pub fn is_settled(grid: &Grid) -> bool {
    let (width, height) = grid.dimensions();
    (0..width).all(|x| {
        let mut seen_hole = false;
        for y in 0..height {
            match grid.kind_at(Pos::new(x, y)) {
                None => seen_hole = true,
                Some(_) if seen_hole => return false,
                Some(_) => {}
            }
        }
        true
    })
}
