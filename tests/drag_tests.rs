//! Drag tests - carrying one tile along a path of adjacent cells

use gem_cascade::adapter::{PresenterCall, RecordingPresenter};
use gem_cascade::core::{BoardConfig, BoardEngine, Grid, SwapOutcome, SwapRequest};
use gem_cascade::types::{
    BoardError, BusyPolicy, InvalidSwapReason, Phase, Pos, SwapPolicy, TileHandle,
};

fn p(x: u8, y: u8) -> Pos {
    Pos::new(x, y)
}

// The Estus at (0,1) dragged right, down and right lands at (2,0) and pulls
// the Estus it crosses into (1,0): E E E on the bottom row.
const DRAG_BOARD: [&str; 3] = [
    "SHBJ", //
    "EBSH", //
    "EJES",
];

const DRAG_TO_MATCH: [(u8, u8); 4] = [(0, 1), (1, 1), (1, 0), (2, 0)];

fn engine_with(rows: &[&str], config: BoardConfig) -> (BoardEngine, RecordingPresenter) {
    let grid = Grid::from_letters(rows).unwrap();
    let mut presenter = RecordingPresenter::new();
    presenter.adopt(&grid);
    let engine = BoardEngine::from_grid(config, grid).unwrap();
    (engine, presenter)
}

fn path(cells: &[(u8, u8)]) -> Vec<Pos> {
    cells.iter().map(|&(x, y)| p(x, y)).collect()
}

#[test]
fn test_three_step_drag_forms_match() {
    let (mut engine, mut presenter) = engine_with(&DRAG_BOARD, BoardConfig::default());
    let held = engine.tile(p(0, 1)).unwrap().unwrap();

    let outcome = engine
        .swap_path(&path(&DRAG_TO_MATCH), &mut presenter)
        .unwrap();

    assert!(matches!(outcome, SwapOutcome::Committed { .. }));
    assert_eq!(engine.phase(), Phase::Scanning);
    assert_eq!(engine.grid().to_letters(), vec!["SHBJ", "BJSH", "EEES"]);
    assert_eq!(engine.tile(p(2, 0)).unwrap(), Some(held));

    // Each step relocates both of its tiles; one change notice for the path.
    let h = TileHandle;
    assert_eq!(
        presenter.take_calls(),
        vec![
            PresenterCall::Relocate { handle: h(6), to: p(0, 1) },
            PresenterCall::Relocate { handle: h(5), to: p(1, 1) },
            PresenterCall::Relocate { handle: h(2), to: p(1, 1) },
            PresenterCall::Relocate { handle: h(5), to: p(1, 0) },
            PresenterCall::Relocate { handle: h(3), to: p(1, 0) },
            PresenterCall::Relocate { handle: h(5), to: p(2, 0) },
            PresenterCall::BoardChanged,
        ]
    );

    engine.run_to_stable(&mut presenter);
    assert!(engine.is_stable());
    assert!(presenter.mirrors(engine.grid()));
}

#[test]
fn test_drag_without_match_is_reverted() {
    let (mut engine, mut presenter) = engine_with(&DRAG_BOARD, BoardConfig::default());
    let before = engine.grid().clone();

    let outcome = engine
        .swap_path(&path(&[(3, 2), (3, 1), (2, 1)]), &mut presenter)
        .unwrap();

    assert_eq!(outcome, SwapOutcome::Reverted);
    assert_eq!(engine.grid(), &before);
    assert!(engine.is_stable());
    assert!(presenter.mirrors(engine.grid()));

    let calls = presenter.take_calls();
    let relocations = calls
        .iter()
        .filter(|c| matches!(c, PresenterCall::Relocate { .. }))
        .count();
    assert_eq!(relocations, 8);
    assert_eq!(calls.last(), Some(&PresenterCall::BoardChanged));
    assert!(presenter.calls().is_empty());
}

#[test]
fn test_drag_kept_under_keep_policy() {
    let config = BoardConfig {
        swap_policy: SwapPolicy::AlwaysKeep,
        ..BoardConfig::default()
    };
    let (mut engine, mut presenter) = engine_with(&DRAG_BOARD, config);

    let outcome = engine
        .swap_path(&path(&[(3, 2), (3, 1), (2, 1)]), &mut presenter)
        .unwrap();

    assert_eq!(outcome, SwapOutcome::Kept);
    assert_eq!(engine.grid().to_letters(), vec!["SHBH", "EBJS", "EJES"]);
    assert_eq!(presenter.stable_count(), 1);
    assert!(presenter.mirrors(engine.grid()));
}

#[test]
fn test_path_with_gap_is_rejected_untouched() {
    let (mut engine, mut presenter) = engine_with(&DRAG_BOARD, BoardConfig::default());
    let before = engine.grid().clone();

    assert_eq!(
        engine.swap_path(&path(&[(0, 0), (1, 0), (3, 0)]), &mut presenter),
        Err(BoardError::InvalidSwap(InvalidSwapReason::NotAdjacent))
    );
    assert_eq!(
        engine.swap_path(&path(&[(0, 0), (1, 0), (1, 0)]), &mut presenter),
        Err(BoardError::InvalidSwap(InvalidSwapReason::SameCell))
    );
    assert_eq!(
        engine.swap_path(&path(&[(2, 2), (3, 2), (4, 2)]), &mut presenter),
        Err(BoardError::OutOfBounds { x: 4, y: 2 })
    );
    assert_eq!(
        engine.swap_path(&path(&[(1, 1)]), &mut presenter),
        Err(BoardError::InvalidSwap(InvalidSwapReason::SameCell))
    );

    assert_eq!(engine.grid(), &before);
    assert!(engine.is_stable());
    assert!(presenter.calls().is_empty());
}

#[test]
fn test_drag_steps_stay_adjacent_when_swaps_are_relaxed() {
    let config = BoardConfig {
        enforce_adjacency: false,
        ..BoardConfig::default()
    };
    let (mut engine, mut presenter) = engine_with(&DRAG_BOARD, config);

    assert_eq!(
        engine.swap_path(&path(&[(0, 0), (0, 1), (3, 1)]), &mut presenter),
        Err(BoardError::InvalidSwap(InvalidSwapReason::NotAdjacent))
    );
    assert!(presenter.calls().is_empty());
}

#[test]
fn test_drag_over_empty_cell_is_rejected() {
    let (mut engine, mut presenter) = engine_with(&["SH.J", "EBSH", "EJES"], BoardConfig::default());
    assert_eq!(
        engine.swap_path(&path(&[(0, 1), (1, 1), (1, 2), (2, 2)]), &mut presenter),
        Err(BoardError::InvalidSwap(InvalidSwapReason::EmptyCell(p(2, 2))))
    );
    assert!(presenter.calls().is_empty());
}

#[test]
fn test_drag_queues_whole_path_while_busy() {
    let config = BoardConfig {
        busy_policy: BusyPolicy::Queue,
        ..BoardConfig::default()
    };
    let (mut engine, mut presenter) = engine_with(&DRAG_BOARD, config);
    engine
        .swap_path(&path(&DRAG_TO_MATCH), &mut presenter)
        .unwrap();

    let queued = path(&[(3, 2), (3, 1), (2, 1)]);
    assert_eq!(
        engine.swap_path(&queued, &mut presenter),
        Ok(SwapOutcome::Queued { depth: 1 })
    );
    // A gap is caught at queue time, not at replay.
    assert_eq!(
        engine.swap_path(&path(&[(0, 0), (2, 0)]), &mut presenter),
        Err(BoardError::InvalidSwap(InvalidSwapReason::NotAdjacent))
    );

    engine.run_to_stable(&mut presenter);
    let (req, result) = engine.apply_queued(&mut presenter).unwrap();
    assert_eq!(req, SwapRequest::drag(&queued).unwrap());
    assert_eq!(req.path(), queued);
    assert!(result.is_ok());
    assert!(presenter.mirrors(engine.grid()));
}

#[test]
fn test_two_cell_drag_is_a_plain_swap() {
    let req = SwapRequest::drag(&[p(0, 0), p(1, 0)]).unwrap();
    assert_eq!(req, SwapRequest::new(p(0, 0), p(1, 0)));
    assert!(!req.is_drag());
    assert!(SwapRequest::drag(&[p(0, 0)]).is_none());
    assert!(SwapRequest::drag(&[]).is_none());
}
