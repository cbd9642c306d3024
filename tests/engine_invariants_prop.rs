//! Property tests for the board engine.
//!
//! Invariants covered:
//! - Every `Stable` board is full and holds no qualifying run.
//! - Cascades terminate for any seed, size and kind set.
//! - Gravity keeps per-column order and leaves no gap below a tile.
//! - A kept swap applied twice restores the board.
//! - Same seed and same swaps give the same board.
//! - The presenter's view never drifts from the grid.

use proptest::prelude::*;

use gem_cascade::adapter::RecordingPresenter;
use gem_cascade::core::gravity::is_settled;
use gem_cascade::core::{
    has_any_match, settle, BoardConfig, BoardEngine, Grid, NullPresenter, SwapOutcome, Tile,
};
use gem_cascade::types::{Pos, SwapPolicy, TileHandle, TileId, TileKind};

fn config_for(seed: u32, width: u8, height: u8, kinds: usize, req: u8) -> BoardConfig {
    BoardConfig {
        width,
        height,
        match_requirement: req,
        kinds: TileKind::ALL[..kinds].to_vec(),
        seed,
        ..BoardConfig::default()
    }
}

fn swap_for(i: usize, salt: u64, grid: &Grid) -> (Pos, Pos) {
    let positions: Vec<Pos> = grid.positions().collect();
    let a = positions[((salt as usize).wrapping_add(i * 31)) % positions.len()];
    let neighbours = grid.neighbours(a);
    let b = neighbours[(i + salt as usize) % neighbours.len()];
    (a, b)
}

proptest! {
    #[test]
    fn stable_boards_never_hold_runs(
        seed in any::<u32>(),
        salt in any::<u64>(),
        width in 3u8..9,
        height in 3u8..9,
        kinds in 2usize..=5,
        moves in 1usize..25,
    ) {
        let config = config_for(seed, width, height, kinds, 3);
        let mut presenter = RecordingPresenter::new();
        let mut engine = BoardEngine::initialize(config, &mut presenter).unwrap();

        prop_assert!(engine.is_stable());
        prop_assert!(engine.grid().is_full());
        prop_assert!(!has_any_match(engine.grid(), 3));

        for i in 0..moves {
            let (a, b) = swap_for(i, salt, engine.grid());
            if let Ok(SwapOutcome::Committed { .. }) = engine.swap(a, b, &mut presenter) {
                let summary = engine.run_to_stable(&mut presenter);
                prop_assert!(summary.tiles_cleared >= 3);
                prop_assert_eq!(summary.tiles_cleared, summary.tiles_spawned);
            }
            prop_assert!(engine.is_stable());
            prop_assert!(engine.grid().is_full());
            prop_assert!(!has_any_match(engine.grid(), 3));
            prop_assert!(presenter.mirrors(engine.grid()));
        }
    }

    #[test]
    fn same_seed_same_board(
        seed in any::<u32>(),
        salt in any::<u64>(),
        moves in 0usize..15,
    ) {
        let run = || {
            let mut presenter = NullPresenter::new();
            let mut engine =
                BoardEngine::initialize(config_for(seed, 6, 5, 5, 3), &mut presenter).unwrap();
            for i in 0..moves {
                let (a, b) = swap_for(i, salt, engine.grid());
                if let Ok(SwapOutcome::Committed { .. }) = engine.swap(a, b, &mut presenter) {
                    engine.run_to_stable(&mut presenter);
                }
            }
            engine.snapshot()
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn gravity_preserves_column_order(
        cells in proptest::collection::vec(proptest::option::of(0usize..5), 30),
    ) {
        let mut grid = Grid::new(6, 5);
        for (i, cell) in cells.iter().enumerate() {
            let pos = Pos::new((i % 6) as u8, (i / 6) as u8);
            let tile = cell.map(|k| Tile {
                id: TileId(i as u64 + 1),
                kind: TileKind::ALL[k],
                handle: TileHandle(i as u64 + 1),
            });
            grid.put(pos, tile).unwrap();
        }

        let before: Vec<Vec<TileId>> = (0..6)
            .map(|x| (0..5).filter_map(|y| grid.at(Pos::new(x, y)).unwrap().map(|t| t.id)).collect())
            .collect();

        let falls = settle(&mut grid);
        prop_assert!(is_settled(&grid));

        for x in 0..6u8 {
            let after: Vec<TileId> =
                (0..5).filter_map(|y| grid.at(Pos::new(x, y)).unwrap().map(|t| t.id)).collect();
            prop_assert_eq!(&after, &before[x as usize]);
            // Compacted to the bottom.
            for (y, _) in after.iter().enumerate() {
                prop_assert!(grid.at(Pos::new(x, y as u8)).unwrap().is_some());
            }
        }
        for fall in falls {
            prop_assert_eq!(fall.from.x, fall.to.x);
            prop_assert!(fall.to.y < fall.from.y);
        }
    }

    #[test]
    fn kept_swap_is_self_inverse(seed in any::<u32>(), salt in any::<u64>()) {
        let config = BoardConfig {
            swap_policy: SwapPolicy::AlwaysKeep,
            ..config_for(seed, 6, 5, 5, 3)
        };
        let mut presenter = NullPresenter::new();
        let mut engine = BoardEngine::initialize(config, &mut presenter).unwrap();
        let (a, b) = swap_for(0, salt, engine.grid());
        let before = engine.grid().clone();

        if engine.swap(a, b, &mut presenter) == Ok(SwapOutcome::Kept) {
            prop_assert_eq!(engine.swap(a, b, &mut presenter), Ok(SwapOutcome::Kept));
            prop_assert_eq!(engine.grid(), &before);
        }
    }
}
