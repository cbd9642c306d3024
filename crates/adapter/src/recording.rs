//! Recording presenter
//!
//! Keeps its own model of where every visual tile is, the way a scene graph
//! would, plus a log of every call. Tests compare that model with the engine's
//! grid to prove the two never drift apart.

use std::collections::HashMap;

use gem_cascade_core::types::{Pos, TileHandle, TileKind};
use gem_cascade_core::{Grid, Presenter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterCall {
    Spawn {
        handle: TileHandle,
        at: Pos,
        kind: TileKind,
    },
    Destroy {
        handle: TileHandle,
    },
    Relocate {
        handle: TileHandle,
        to: Pos,
    },
    BoardStable,
    BoardChanged,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    next_handle: u64,
    live: HashMap<TileHandle, (Pos, TileKind)>,
    calls: Vec<PresenterCall>,
    stable_count: usize,
    changed_count: usize,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the tiles of a grid built outside the engine
    pub fn adopt(&mut self, grid: &Grid) {
        for (pos, tile) in grid.tiles() {
            self.live.insert(tile.handle, (pos, tile.kind));
            self.next_handle = self.next_handle.max(tile.handle.0);
        }
    }

    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<PresenterCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn stable_count(&self) -> usize {
        self.stable_count
    }

    pub fn changed_count(&self) -> usize {
        self.changed_count
    }

    /// Where the presenter believes `handle` is
    pub fn position_of(&self, handle: TileHandle) -> Option<Pos> {
        self.live.get(&handle).map(|&(pos, _)| pos)
    }

    /// True when every grid tile has a live visual at the same position with the
    /// same kind, and no visual exists without a tile
    pub fn mirrors(&self, grid: &Grid) -> bool {
        let mut seen = 0usize;
        for (pos, tile) in grid.tiles() {
            match self.live.get(&tile.handle) {
                Some(&(p, k)) if p == pos && k == tile.kind => seen += 1,
                _ => return false,
            }
        }
        seen == self.live.len()
    }
}

impl Presenter for RecordingPresenter {
    fn spawn(&mut self, x: u8, y: u8, kind: TileKind) -> TileHandle {
        self.next_handle += 1;
        let handle = TileHandle(self.next_handle);
        let at = Pos::new(x, y);
        self.live.insert(handle, (at, kind));
        self.calls.push(PresenterCall::Spawn { handle, at, kind });
        handle
    }

    fn destroy(&mut self, handle: TileHandle) {
        self.live.remove(&handle);
        self.calls.push(PresenterCall::Destroy { handle });
    }

    fn relocate(&mut self, handle: TileHandle, x: u8, y: u8) {
        let to = Pos::new(x, y);
        if let Some(entry) = self.live.get_mut(&handle) {
            entry.0 = to;
        }
        self.calls.push(PresenterCall::Relocate { handle, to });
    }

    fn on_board_stable(&mut self) {
        self.stable_count += 1;
        self.calls.push(PresenterCall::BoardStable);
    }

    fn on_board_changed(&mut self) {
        self.changed_count += 1;
        self.calls.push(PresenterCall::BoardChanged);
    }
}
