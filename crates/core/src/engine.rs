//! Board engine - owns one board and drives its cascade
//!
//! The engine is a small state machine:
//!
//! ```text
//!            swap (match formed)
//! Stable ───────────────────────► Scanning ──(no groups)──► Stable
//!                                    │  ▲
//!                            groups  │  │ refilled
//!                                    ▼  │
//!                Clearing ──► Settling ──► Refilling
//! ```
//!
//! Every [`BoardEngine::step`] completes one phase atomically. Swaps and drags
//! are only applied in `Stable`; otherwise they are rejected or queued
//! according to [`BusyPolicy`].

use std::collections::VecDeque;

use crate::cascade::{CascadeSummary, StepEvent, StepReport};
use crate::config::BoardConfig;
use crate::grid::{Grid, Tile};
use crate::gravity::settle;
use crate::matcher::{find_matches, has_any_match, MatchGroup};
use crate::presenter::Presenter;
use crate::rng::{pick_run_avoiding, SimpleRng};
use crate::snapshot::BoardSnapshot;
use crate::types::{
    BoardError, BusyPolicy, InvalidSwapReason, Phase, Pos, SwapPolicy, TileId, TileKind,
};

/// A pending user swap or drag.
///
/// A drag picks a tile up at `a`, carries it across every cell in `via` and
/// drops it at `b`. Each crossed tile moves back one cell along the path. A
/// plain swap has an empty `via`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwapRequest {
    pub a: Pos,
    pub b: Pos,
    pub via: Vec<Pos>,
}

impl SwapRequest {
    pub fn new(a: Pos, b: Pos) -> Self {
        Self {
            a,
            b,
            via: Vec::new(),
        }
    }

    /// Drag along `path`, first cell to last. A two-cell path is a plain swap.
    /// Returns `None` for paths shorter than two cells.
    pub fn drag(path: &[Pos]) -> Option<Self> {
        let (&a, rest) = path.split_first()?;
        let (&b, via) = rest.split_last()?;
        Some(Self {
            a,
            b,
            via: via.to_vec(),
        })
    }

    pub fn is_drag(&self) -> bool {
        !self.via.is_empty()
    }

    /// Every visited cell, `a` first and `b` last
    pub fn path(&self) -> Vec<Pos> {
        let mut path = Vec::with_capacity(self.via.len() + 2);
        path.push(self.a);
        path.extend_from_slice(&self.via);
        path.push(self.b);
        path
    }
}

/// What happened to a swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Tiles exchanged and a match formed; the cascade starts after the hint
    Committed { delay_hint_ms: u32 },
    /// No match formed and the tiles were put back
    Reverted,
    /// No match formed and the tiles stay exchanged
    Kept,
    /// Board busy; the swap waits at this 1-based queue depth
    Queued { depth: usize },
}

#[derive(Debug, Clone)]
pub struct BoardEngine {
    config: BoardConfig,
    kinds: Vec<TileKind>,
    grid: Grid,
    rng: SimpleRng,
    phase: Phase,
    /// Groups found by the last scan, consumed by clearing
    pending: Vec<MatchGroup>,
    next_tile_id: u64,
    /// Completed passes in the current cascade
    pass: u32,
    /// Set once the current cascade destroys anything
    changed: bool,
    queue: VecDeque<SwapRequest>,
}

impl BoardEngine {
    fn with_grid(config: BoardConfig, grid: Grid) -> Self {
        let next_tile_id = grid.max_tile_id().map(|id| id.0 + 1).unwrap_or(1);
        Self {
            kinds: config.distinct_kinds(),
            rng: SimpleRng::new(config.seed),
            config,
            grid,
            phase: Phase::Stable,
            pending: Vec::new(),
            next_tile_id,
            pass: 0,
            changed: false,
            queue: VecDeque::new(),
        }
    }

    /// Generate a new board and resolve it to `Stable`.
    ///
    /// Every cell is spawned through `presenter` in raster order, preferring
    /// kinds that do not complete a run, so fresh boards rarely open with a
    /// cascade. Any leftover matches are cleared before returning.
    pub fn initialize<P: Presenter + ?Sized>(
        config: BoardConfig,
        presenter: &mut P,
    ) -> Result<Self, BoardError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        let mut engine = Self::with_grid(config, grid);

        let positions: Vec<Pos> = engine.grid.positions().collect();
        for pos in positions {
            let kind = pick_run_avoiding(
                &mut engine.rng,
                &engine.grid,
                pos,
                &engine.kinds,
                engine.config.match_requirement,
            );
            engine.place_new(pos, kind, presenter);
        }

        engine.resolve(presenter);
        Ok(engine)
    }

    /// Wrap an existing grid. Width and height come from the grid; tiles keep
    /// their ids and handles. The engine starts `Stable` even if the grid holds
    /// matches or holes; call [`BoardEngine::resolve`] to settle it.
    pub fn from_grid(config: BoardConfig, grid: Grid) -> Result<Self, BoardError> {
        let config = BoardConfig {
            width: grid.width(),
            height: grid.height(),
            ..config
        };
        config.validate()?;
        Ok(Self::with_grid(config, grid))
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_stable(&self) -> bool {
        self.phase.is_stable()
    }

    pub fn pass(&self) -> u32 {
        self.pass
    }

    pub fn queued_swaps(&self) -> usize {
        self.queue.len()
    }

    /// Groups waiting to be cleared (non-empty only in `Clearing`)
    pub fn pending_groups(&self) -> &[MatchGroup] {
        &self.pending
    }

    /// Tile at `pos`, bounds-checked
    pub fn tile(&self, pos: Pos) -> Result<Option<Tile>, BoardError> {
        self.grid.at(pos)
    }

    fn place_new<P: Presenter + ?Sized>(&mut self, pos: Pos, kind: TileKind, presenter: &mut P) {
        let handle = presenter.spawn(pos.x, pos.y, kind);
        let tile = Tile {
            id: TileId(self.next_tile_id),
            kind,
            handle,
        };
        self.next_tile_id += 1;
        // Callers only pass positions taken from this grid.
        self.grid.fill(pos, tile);
    }

    fn begin_cascade(&mut self) {
        self.pass = 0;
        self.changed = false;
        self.pending.clear();
        self.phase = if self.grid.is_full() {
            Phase::Scanning
        } else {
            Phase::Settling
        };
    }

    /// Run the cascade from wherever the board is until it is `Stable`.
    ///
    /// From `Stable` this starts a fresh cascade (useful after
    /// [`BoardEngine::from_grid`]); mid-cascade it simply finishes the current
    /// one.
    pub fn resolve<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> CascadeSummary {
        if self.phase.is_stable() {
            self.begin_cascade();
        }
        self.run_to_stable(presenter)
    }

    /// Step until `Stable`
    pub fn run_to_stable<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> CascadeSummary {
        let mut summary = CascadeSummary::default();
        while let Some(report) = self.step(presenter) {
            summary.record(&report);
        }
        summary
    }

    /// Execute the current phase. Returns `None` once `Stable`.
    pub fn step<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Option<StepReport> {
        let completed = self.phase;
        let req = self.config.match_requirement;

        let (next, delay_hint_ms, event) = match self.phase {
            Phase::Stable => return None,
            Phase::Scanning => {
                let groups = find_matches(&self.grid, req);
                if groups.is_empty() {
                    presenter.on_board_stable();
                    (
                        Phase::Stable,
                        0,
                        StepEvent::Stabilized {
                            passes: self.pass,
                            changed: self.changed,
                        },
                    )
                } else {
                    self.pending = groups.clone();
                    (Phase::Clearing, 0, StepEvent::Scanned { groups })
                }
            }
            Phase::Clearing => {
                let groups = std::mem::take(&mut self.pending);
                let mut positions = Vec::new();
                for pos in groups.iter().flat_map(|g| g.iter().copied()) {
                    if let Ok(Some(tile)) = self.grid.take(pos) {
                        presenter.destroy(tile.handle);
                        positions.push(pos);
                    }
                }
                self.changed = true;
                (
                    Phase::Settling,
                    self.config.clear_delay_ms,
                    StepEvent::Cleared { positions },
                )
            }
            Phase::Settling => {
                let falls = settle(&mut self.grid);
                for fall in &falls {
                    presenter.relocate(fall.handle, fall.to.x, fall.to.y);
                }
                (
                    Phase::Refilling,
                    self.config.fall_delay_ms,
                    StepEvent::Settled { falls },
                )
            }
            Phase::Refilling => {
                let spawned = self.refill(presenter);
                self.pass += 1;
                presenter.on_board_changed();
                (
                    Phase::Scanning,
                    self.config.refill_delay_ms,
                    StepEvent::Refilled { spawned },
                )
            }
        };

        self.phase = next;
        Some(StepReport {
            completed,
            next,
            pass: self.pass,
            delay_hint_ms,
            event,
        })
    }

    /// Fill every hole with a new tile.
    ///
    /// Kinds are uniform over the kind set until the cascade has run
    /// `max_cascade_passes` passes; after that each pick avoids completing a run
    /// so small kind sets still converge.
    fn refill<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Vec<(Pos, TileKind)> {
        let avoid_runs = self.pass >= self.config.max_cascade_passes;
        let holes: Vec<Pos> = self
            .grid
            .positions()
            .filter(|&pos| self.grid.kind_at(pos).is_none())
            .collect();

        let mut spawned = Vec::with_capacity(holes.len());
        for pos in holes {
            let kind = if avoid_runs {
                pick_run_avoiding(
                    &mut self.rng,
                    &self.grid,
                    pos,
                    &self.kinds,
                    self.config.match_requirement,
                )
            } else {
                self.rng.pick(&self.kinds)
            };
            self.place_new(pos, kind, presenter);
            spawned.push((pos, kind));
        }
        spawned
    }

    /// Checks that do not depend on what the cells hold.
    ///
    /// Every drag step must be orthogonally adjacent regardless of
    /// `enforce_adjacency`; that flag only relaxes plain swaps.
    fn validate_static(&self, req: &SwapRequest) -> Result<(), BoardError> {
        let path = req.path();
        if let Some(p) = path.iter().find(|&&p| !self.grid.contains(p)) {
            return Err(BoardError::OutOfBounds {
                x: p.x as i16,
                y: p.y as i16,
            });
        }
        for step in path.windows(2) {
            if step[0] == step[1] {
                return Err(BoardError::InvalidSwap(InvalidSwapReason::SameCell));
            }
            let must_touch = req.is_drag() || self.config.enforce_adjacency;
            if must_touch && !step[0].is_adjacent(step[1]) {
                return Err(BoardError::InvalidSwap(InvalidSwapReason::NotAdjacent));
            }
        }
        Ok(())
    }

    fn exchange<P: Presenter + ?Sized>(&mut self, a: Pos, b: Pos, presenter: &mut P) {
        self.grid.exchange(a, b);
        for pos in [a, b] {
            if let Ok(Some(tile)) = self.grid.at(pos) {
                presenter.relocate(tile.handle, pos.x, pos.y);
            }
        }
    }

    /// Apply every step of `path` in order
    fn carry<P: Presenter + ?Sized>(&mut self, path: &[Pos], presenter: &mut P) {
        for step in path.windows(2) {
            self.exchange(step[0], step[1], presenter);
        }
        presenter.on_board_changed();
    }

    /// Undo [`BoardEngine::carry`] step by step, last step first
    fn uncarry<P: Presenter + ?Sized>(&mut self, path: &[Pos], presenter: &mut P) {
        for step in path.windows(2).rev() {
            self.exchange(step[0], step[1], presenter);
        }
        presenter.on_board_changed();
    }

    /// Apply a user swap of the tiles at `a` and `b`.
    ///
    /// The swap is applied, then the board is scanned. With a match the engine
    /// enters `Scanning` and the caller drives the cascade (`step` /
    /// `run_to_stable`). Without one the [`SwapPolicy`] decides whether the
    /// tiles go back.
    ///
    /// While a cascade is running the request is rejected with
    /// [`BoardError::BoardBusy`] or queued, per [`BusyPolicy`]. Nothing is
    /// mutated on error.
    pub fn swap<P: Presenter + ?Sized>(
        &mut self,
        a: Pos,
        b: Pos,
        presenter: &mut P,
    ) -> Result<SwapOutcome, BoardError> {
        self.request_swap(SwapRequest::new(a, b), presenter)
    }

    /// Apply a drag along `path`: the tile at `path[0]` is carried to the last
    /// cell, swapping with each cell on the way.
    ///
    /// Every step is validated before anything moves. The board is scanned
    /// once, after the whole path; without a match the entire path is undone
    /// under [`SwapPolicy::RevertIfNoMatch`].
    pub fn swap_path<P: Presenter + ?Sized>(
        &mut self,
        path: &[Pos],
        presenter: &mut P,
    ) -> Result<SwapOutcome, BoardError> {
        let req = SwapRequest::drag(path)
            .ok_or(BoardError::InvalidSwap(InvalidSwapReason::SameCell))?;
        self.request_swap(req, presenter)
    }

    /// Apply a swap or drag request. [`BoardEngine::swap`] and
    /// [`BoardEngine::swap_path`] both land here.
    pub fn request_swap<P: Presenter + ?Sized>(
        &mut self,
        req: SwapRequest,
        presenter: &mut P,
    ) -> Result<SwapOutcome, BoardError> {
        if !self.phase.is_stable() {
            return self.enqueue(req);
        }

        self.validate_static(&req)?;
        let path = req.path();
        if let Some(&p) = path.iter().find(|&&p| self.grid.kind_at(p).is_none()) {
            return Err(BoardError::InvalidSwap(InvalidSwapReason::EmptyCell(p)));
        }

        self.carry(&path, presenter);

        if has_any_match(&self.grid, self.config.match_requirement) {
            self.begin_cascade();
            return Ok(SwapOutcome::Committed {
                delay_hint_ms: self.config.settle_delay_ms,
            });
        }

        match self.config.swap_policy {
            SwapPolicy::RevertIfNoMatch => {
                self.uncarry(&path, presenter);
                Ok(SwapOutcome::Reverted)
            }
            SwapPolicy::AlwaysKeep => {
                presenter.on_board_stable();
                Ok(SwapOutcome::Kept)
            }
        }
    }

    fn enqueue(&mut self, req: SwapRequest) -> Result<SwapOutcome, BoardError> {
        if self.config.busy_policy == BusyPolicy::Reject {
            return Err(BoardError::BoardBusy);
        }
        self.validate_static(&req)?;
        if self.queue.len() >= self.config.max_queued_swaps {
            return Err(BoardError::BoardBusy);
        }
        self.queue.push_back(req);
        Ok(SwapOutcome::Queued {
            depth: self.queue.len(),
        })
    }

    /// Apply the oldest queued swap, if the board is stable and one is waiting.
    ///
    /// Cells may have emptied or changed kind since the swap was queued; the
    /// result reports exactly what [`BoardEngine::swap`] would.
    pub fn apply_queued<P: Presenter + ?Sized>(
        &mut self,
        presenter: &mut P,
    ) -> Option<(SwapRequest, Result<SwapOutcome, BoardError>)> {
        if !self.phase.is_stable() {
            return None;
        }
        let req = self.queue.pop_front()?;
        let result = self.request_swap(req.clone(), presenter);
        Some((req, result))
    }

    /// Drop every queued swap, returning them oldest first
    pub fn drain_queue(&mut self) -> Vec<SwapRequest> {
        self.queue.drain(..).collect()
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        let (w, h) = self.grid.dimensions();
        out.width = w;
        out.height = h;
        out.cells.clear();
        out.cells.extend(
            self.grid
                .cells()
                .iter()
                .map(|c| c.map(|t| t.kind.code()).unwrap_or(0)),
        );
        out.rehash();
        out.phase = self.phase;
        out.pass = self.pass;
        out.queued_swaps = self.queue.len();
        out.tiles_created = self.next_tile_id - 1;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Mutable grid access for tests
    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravity::is_settled;
    use crate::presenter::NullPresenter;

    fn engine(rows: &[&str]) -> BoardEngine {
        BoardEngine::from_grid(BoardConfig::default(), Grid::from_letters(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_initialize_produces_stable_full_board() {
        let mut p = NullPresenter::new();
        let e = BoardEngine::initialize(BoardConfig::default(), &mut p).unwrap();
        assert!(e.is_stable());
        assert!(e.grid().is_full());
        assert!(!has_any_match(e.grid(), 3));
    }

    #[test]
    fn test_initialize_rejects_invalid_config() {
        let mut p = NullPresenter::new();
        let config = BoardConfig {
            kinds: vec![TileKind::Estus],
            ..BoardConfig::default()
        };
        assert!(BoardEngine::initialize(config, &mut p).is_err());
    }

    #[test]
    fn test_step_sequence_for_single_row_match() {
        let mut e = engine(&[
            "SHBSHB", //
            "HBSHBS", //
            "EEEBSB", //
            "SHBSHB", //
            "HBSHBS",
        ]);
        let mut p = NullPresenter::new();
        e.begin_cascade();

        let scan = e.step(&mut p).unwrap();
        assert_eq!(scan.completed, Phase::Scanning);
        assert_eq!(scan.next, Phase::Clearing);

        let clear = e.step(&mut p).unwrap();
        assert_eq!(clear.completed, Phase::Clearing);
        assert_eq!(
            clear.event,
            StepEvent::Cleared {
                positions: vec![Pos::new(0, 2), Pos::new(1, 2), Pos::new(2, 2)]
            }
        );
        assert_eq!(clear.delay_hint_ms, e.config().clear_delay_ms);
        assert_eq!(e.grid().empty_count(), 3);

        let settle = e.step(&mut p).unwrap();
        assert_eq!(settle.completed, Phase::Settling);
        assert!(is_settled(e.grid()));
        // Two tiles above each cleared cell, one row each.
        match settle.event {
            StepEvent::Settled { falls } => assert_eq!(falls.len(), 6),
            other => panic!("unexpected event {:?}", other),
        }

        let refill = e.step(&mut p).unwrap();
        assert_eq!(refill.completed, Phase::Refilling);
        assert_eq!(refill.pass, 1);
        assert!(e.grid().is_full());

        let summary = e.run_to_stable(&mut p);
        assert!(e.is_stable());
        assert!(!has_any_match(e.grid(), 3));
        assert!(summary.steps >= 1);
    }

    #[test]
    fn test_step_on_stable_returns_none() {
        let mut e = engine(&["EEB", "SSE", "BBS"]);
        let mut p = NullPresenter::new();
        assert!(e.step(&mut p).is_none());
    }

    #[test]
    fn test_resolve_fills_holes_in_a_loaded_grid() {
        let mut e = engine(&["E.B", "SSE", "BHS"]);
        let mut p = NullPresenter::new();
        e.resolve(&mut p);
        assert!(e.grid().is_full());
        assert!(e.is_stable());
    }

    #[test]
    fn test_busy_engine_rejects_swaps_without_mutation() {
        let mut e = engine(&["EEB", "SSE", "BBS"]);
        let mut p = NullPresenter::new();
        e.grid_mut().swap_cells(Pos::new(2, 2), Pos::new(2, 1)).unwrap();
        e.begin_cascade();
        let before = e.grid().clone();

        assert_eq!(
            e.swap(Pos::new(0, 0), Pos::new(1, 0), &mut p),
            Err(BoardError::BoardBusy)
        );
        assert_eq!(e.grid(), &before);
    }

    #[test]
    fn test_tile_ids_continue_after_loaded_grid() {
        let mut e = engine(&[
            "SHBSHB", //
            "HBSHBS", //
            "EEEBSB", //
            "SHBSHB", //
            "HBSHBS",
        ]);
        let mut p = NullPresenter::new();
        e.resolve(&mut p);
        let max = e.grid().max_tile_id().unwrap();
        assert!(max.0 > 30);
        let mut ids: Vec<u64> = e.grid().tiles().map(|(_, t)| t.id.0).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 30);
    }
}
