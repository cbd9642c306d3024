//! Match detection
//!
//! A tile matches when the straight run of its kind through it, vertically or
//! horizontally, reaches the match requirement. A whole-board pass walks cells in
//! raster order, grows each hit into a chain by repeatedly unioning the local
//! matches of every member (a fixed point over the pre-clear board), and marks
//! the members consumed so later cells skip them.
//!
//! Runs stop at a kind change, an empty cell, or the board edge. Diagonal
//! neighbours never connect.

use crate::grid::Grid;
use crate::types::{Direction, Pos, TileKind};

/// Positions cleared together in one pass. Sorted in raster order, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchGroup {
    positions: Vec<Pos>,
}

impl MatchGroup {
    fn from_unsorted(mut positions: Vec<Pos>) -> Self {
        positions.sort_by_key(|p| (p.y, p.x));
        positions.dedup();
        Self { positions }
    }

    pub fn positions(&self) -> &[Pos] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.positions
            .binary_search_by_key(&(pos.y, pos.x), |p| (p.y, p.x))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pos> {
        self.positions.iter()
    }
}

/// Walk from `start` in `dir` while cells hold `kind`, recording each visited
/// position. Returns the number of positions visited.
///
/// `start` itself is included when it matches, so callers decide which of the
/// two scans along an axis owns the origin.
fn scan(grid: &Grid, start: Option<Pos>, dir: Direction, kind: TileKind, acc: &mut Vec<Pos>) -> usize {
    let mut count = 0;
    let mut cur = start;
    while let Some(pos) = cur {
        if grid.kind_at(pos) != Some(kind) {
            break;
        }
        acc.push(pos);
        count += 1;
        cur = pos.step(dir);
    }
    count
}

/// Tiles matched through `origin`, deduplicated. Empty when `origin` is empty,
/// off the board, or part of no run long enough.
///
/// The vertical run is `up(origin) + down(origin - 1)`; the horizontal run is
/// `left(origin) + right(origin + 1)`. Each axis qualifies on its own.
pub fn match_at(grid: &Grid, origin: Pos, match_requirement: u8) -> Vec<Pos> {
    let Some(kind) = grid.kind_at(origin) else {
        return Vec::new();
    };
    let need = match_requirement as usize;

    let mut vertical = Vec::new();
    let v = scan(grid, Some(origin), Direction::Up, kind, &mut vertical)
        + scan(grid, origin.step(Direction::Down), Direction::Down, kind, &mut vertical);

    let mut horizontal = Vec::new();
    let h = scan(grid, Some(origin), Direction::Left, kind, &mut horizontal)
        + scan(grid, origin.step(Direction::Right), Direction::Right, kind, &mut horizontal);

    let mut out = Vec::new();
    if v >= need {
        out.extend(vertical);
    }
    if h >= need {
        // The two axes only ever share the origin.
        let skip_origin = !out.is_empty();
        out.extend(horizontal.into_iter().filter(|&p| !(skip_origin && p == origin)));
    }
    out
}

/// Every match group on the board, in discovery (raster) order.
///
/// Groups are disjoint: anything reachable from a group's members through a
/// qualifying run is already part of that group.
pub fn find_matches(grid: &Grid, match_requirement: u8) -> Vec<MatchGroup> {
    let mut consumed = vec![false; grid.len()];
    let mut groups = Vec::new();

    for origin in grid.positions() {
        if consumed[grid.flat_index(origin)] {
            continue;
        }
        let seed = match_at(grid, origin, match_requirement);
        if seed.is_empty() {
            continue;
        }

        let mut members = Vec::with_capacity(seed.len());
        for pos in seed {
            let idx = grid.flat_index(pos);
            if !consumed[idx] {
                consumed[idx] = true;
                members.push(pos);
            }
        }

        // Fixed-point union: `members` grows while we walk it.
        let mut i = 0;
        while i < members.len() {
            for pos in match_at(grid, members[i], match_requirement) {
                let idx = grid.flat_index(pos);
                if !consumed[idx] {
                    consumed[idx] = true;
                    members.push(pos);
                }
            }
            i += 1;
        }

        groups.push(MatchGroup::from_unsorted(members));
    }

    groups
}

/// Longest same-kind run in any row or column
pub fn longest_run(grid: &Grid) -> usize {
    let (w, h) = grid.dimensions();
    let rows = (0..h).map(|y| (0..w).map(move |x| Pos::new(x, y)).collect::<Vec<_>>());
    let cols = (0..w).map(|x| (0..h).map(move |y| Pos::new(x, y)).collect::<Vec<_>>());

    let mut best = 0;
    for line in rows.chain(cols) {
        let mut run = 0;
        let mut prev: Option<TileKind> = None;
        for pos in line {
            let kind = grid.kind_at(pos);
            if kind.is_some() && kind == prev {
                run += 1;
            } else {
                run = if kind.is_some() { 1 } else { 0 };
            }
            prev = kind;
            best = best.max(run);
        }
    }
    best
}

/// True when some row or column holds a run of at least `match_requirement`.
///
/// Counts runs directly rather than going through [`match_at`], so it doubles
/// as an independent check of the stable-board invariant.
pub fn has_any_match(grid: &Grid, match_requirement: u8) -> bool {
    longest_run(grid) >= match_requirement as usize
}
