//! Grid tests - bounds, storage and orientation

use gem_cascade::core::{Grid, Tile};
use gem_cascade::types::{BoardError, Pos, TileHandle, TileId, TileKind};

fn tile(id: u64, kind: TileKind) -> Tile {
    Tile {
        id: TileId(id),
        kind,
        handle: TileHandle(id),
    }
}

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new(6, 5);
    assert_eq!(grid.dimensions(), (6, 5));
    assert_eq!(grid.len(), 30);
    assert_eq!(grid.empty_count(), 30);
    assert!(!grid.is_full());

    for y in 0..5i16 {
        for x in 0..6i16 {
            assert_eq!(grid.get(x, y), Ok(None), "cell ({}, {}) should be empty", x, y);
        }
    }
}

#[test]
fn test_grid_out_of_bounds() {
    let mut grid = Grid::new(6, 5);

    assert_eq!(grid.get(-1, 0), Err(BoardError::OutOfBounds { x: -1, y: 0 }));
    assert_eq!(grid.get(0, -1), Err(BoardError::OutOfBounds { x: 0, y: -1 }));
    assert_eq!(grid.get(6, 0), Err(BoardError::OutOfBounds { x: 6, y: 0 }));
    assert_eq!(grid.get(0, 5), Err(BoardError::OutOfBounds { x: 0, y: 5 }));

    let before = grid.clone();
    assert!(grid.set(6, 5, Some(tile(1, TileKind::Boot))).is_err());
    assert_eq!(grid, before);
}

#[test]
fn test_grid_set_returns_previous() {
    let mut grid = Grid::new(3, 3);
    assert_eq!(grid.set(1, 2, Some(tile(1, TileKind::Sword))), Ok(None));
    assert_eq!(grid.kind_at(Pos::new(1, 2)), Some(TileKind::Sword));

    let prev = grid.set(1, 2, Some(tile(2, TileKind::Shield))).unwrap();
    assert_eq!(prev.map(|t| t.kind), Some(TileKind::Sword));
    assert_eq!(grid.kind_at(Pos::new(1, 2)), Some(TileKind::Shield));

    let taken = grid.take(Pos::new(1, 2)).unwrap();
    assert_eq!(taken.map(|t| t.id), Some(TileId(2)));
    assert_eq!(grid.kind_at(Pos::new(1, 2)), None);
}

#[test]
fn test_from_letters_bottom_row_is_last() {
    let grid = Grid::from_letters(&["ES", "HB"]).unwrap();
    // y = 0 is the bottom row.
    assert_eq!(grid.kind_at(Pos::new(0, 0)), Some(TileKind::Shield));
    assert_eq!(grid.kind_at(Pos::new(1, 0)), Some(TileKind::Boot));
    assert_eq!(grid.kind_at(Pos::new(0, 1)), Some(TileKind::Estus));
    assert_eq!(grid.kind_at(Pos::new(1, 1)), Some(TileKind::Sword));
    assert_eq!(grid.to_letters(), vec!["ES".to_string(), "HB".to_string()]);
}

#[test]
fn test_from_letters_rejects_ragged_and_unknown() {
    assert!(Grid::from_letters(&["ES", "H"]).is_none());
    assert!(Grid::from_letters(&["EX"]).is_none());
}

#[test]
fn test_from_letters_empty_cells() {
    let grid = Grid::from_letters(&["E.", ".S"]).unwrap();
    assert_eq!(grid.empty_count(), 2);
    assert_eq!(grid.to_letters(), vec!["E.".to_string(), ".S".to_string()]);
}

#[test]
fn test_swap_cells_is_self_inverse() {
    let mut grid = Grid::from_letters(&["ESH", "BJE"]).unwrap();
    let original = grid.clone();
    let a = Pos::new(0, 0);
    let b = Pos::new(1, 0);

    grid.swap_cells(a, b).unwrap();
    assert_eq!(grid.kind_at(a), Some(TileKind::Jammer));
    assert_eq!(grid.kind_at(b), Some(TileKind::Boot));

    grid.swap_cells(a, b).unwrap();
    assert_eq!(grid, original);
}

#[test]
fn test_neighbours_respect_edges() {
    let grid = Grid::new(6, 5);
    assert_eq!(grid.neighbours(Pos::new(0, 0)).len(), 2);
    assert_eq!(grid.neighbours(Pos::new(5, 4)).len(), 2);
    assert_eq!(grid.neighbours(Pos::new(3, 0)).len(), 3);
    assert_eq!(grid.neighbours(Pos::new(2, 2)).len(), 4);
    for n in grid.neighbours(Pos::new(2, 2)) {
        assert!(n.is_adjacent(Pos::new(2, 2)));
    }
}

#[test]
fn test_positions_raster_order() {
    let grid = Grid::new(3, 2);
    let order: Vec<(u8, u8)> = grid.positions().map(|p| (p.x, p.y)).collect();
    assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
}
