use crate::types::{Phase, TileKind};

/// Stable 64-bit FNV-1a over a byte stream.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions, and
/// board hashes are compared across runs.
pub fn fnv1a64(bytes: impl IntoIterator<Item = u8>) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

/// Plain-data copy of the engine state, cheap to hand to other layers.
///
/// `cells` is row-major, bottom row first, holding [`TileKind::code`] or 0 for
/// an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<u8>,
    pub board_hash: u64,
    pub phase: Phase,
    pub pass: u32,
    pub queued_swaps: usize,
    pub tiles_created: u64,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.board_hash = fnv1a64(std::iter::empty());
        self.phase = Phase::Stable;
        self.pass = 0;
        self.queued_swaps = 0;
        self.tiles_created = 0;
    }

    pub fn kind_at(&self, x: u8, y: u8) -> Option<TileKind> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let code = self.cells[y as usize * self.width as usize + x as usize];
        TileKind::from_code(code)
    }

    /// Recompute `board_hash` from `cells`
    pub fn rehash(&mut self) {
        self.board_hash = fnv1a64(self.cells.iter().copied());
    }

    pub fn is_stable(&self) -> bool {
        self.phase.is_stable()
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        let mut s = Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            board_hash: 0,
            phase: Phase::Stable,
            pass: 0,
            queued_swaps: 0,
            tiles_created: 0,
        };
        s.clear();
        s
    }
}
