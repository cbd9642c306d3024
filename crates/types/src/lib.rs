//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, presentation adapters, wire protocol).
//!
//! # Board Coordinates
//!
//! - **x**: column, 0 at the left edge
//! - **y**: row, 0 at the **bottom** (tiles fall toward y = 0)
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 6 | Columns |
//! | `DEFAULT_HEIGHT` | 5 | Rows |
//! | `DEFAULT_MATCH_REQUIREMENT` | 3 | Minimum run length that clears |
//! | `DEFAULT_CLEAR_DELAY_MS` | 2000 | Pause hint after tiles are destroyed |
//! | `DEFAULT_SETTLE_DELAY_MS` | 250 | Pause hint between swap and first scan |
//!
//! # Examples
//!
//! ```
//! use gem_cascade_types::{Direction, Pos, TileKind};
//!
//! let kind = TileKind::from_str("sword").unwrap();
//! assert_eq!(kind, TileKind::Sword);
//!
//! let p = Pos::new(2, 0);
//! assert_eq!(p.step(Direction::Up), Some(Pos::new(2, 1)));
//! assert_eq!(p.step(Direction::Down), None);
//! ```

use std::fmt;

/// Default board width (columns)
pub const DEFAULT_WIDTH: u8 = 6;

/// Default board height (rows)
pub const DEFAULT_HEIGHT: u8 = 5;

/// Minimum contiguous run length that forms a match
pub const DEFAULT_MATCH_REQUIREMENT: u8 = 3;

/// Presentation pause after a swap, before the first scan
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 250;

/// Presentation pause after matched tiles are destroyed
pub const DEFAULT_CLEAR_DELAY_MS: u32 = 2000;

/// Presentation pause while tiles fall
pub const DEFAULT_FALL_DELAY_MS: u32 = 150;

/// Presentation pause while new tiles drop in
pub const DEFAULT_REFILL_DELAY_MS: u32 = 150;

/// Cascade passes before refill switches to run-avoiding kind selection
pub const DEFAULT_MAX_CASCADE_PASSES: u32 = 64;

/// Swaps that may wait while a cascade is running (queue policy only)
pub const DEFAULT_MAX_QUEUED_SWAPS: usize = 4;

/// The five tile (orb) kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileKind {
    Estus,
    Sword,
    Shield,
    Boot,
    Jammer,
}

impl TileKind {
    /// Every kind, in declaration order
    pub const ALL: [TileKind; 5] = [
        TileKind::Estus,
        TileKind::Sword,
        TileKind::Shield,
        TileKind::Boot,
        TileKind::Jammer,
    ];

    /// Parse kind from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "estus" | "e", "sword" | "s",
    /// "shield" | "h", "boot" | "b", "jammer" | "j".
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_cascade_types::TileKind;
    ///
    /// assert_eq!(TileKind::from_str("Estus"), Some(TileKind::Estus));
    /// assert_eq!(TileKind::from_str("j"), Some(TileKind::Jammer));
    /// assert_eq!(TileKind::from_str("ruby"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "estus" | "e" => Some(TileKind::Estus),
            "sword" | "s" => Some(TileKind::Sword),
            "shield" | "h" => Some(TileKind::Shield),
            "boot" | "b" => Some(TileKind::Boot),
            "jammer" | "j" => Some(TileKind::Jammer),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Estus => "estus",
            TileKind::Sword => "sword",
            TileKind::Shield => "shield",
            TileKind::Boot => "boot",
            TileKind::Jammer => "jammer",
        }
    }

    /// Single uppercase letter used by text renderings of the board
    pub fn letter(&self) -> char {
        match self {
            TileKind::Estus => 'E',
            TileKind::Sword => 'S',
            TileKind::Shield => 'H',
            TileKind::Boot => 'B',
            TileKind::Jammer => 'J',
        }
    }

    /// Stable numeric code (1-based; 0 is reserved for an empty cell in snapshots)
    pub fn code(&self) -> u8 {
        match self {
            TileKind::Estus => 1,
            TileKind::Sword => 2,
            TileKind::Shield => 3,
            TileKind::Boot => 4,
            TileKind::Jammer => 5,
        }
    }

    /// Inverse of [`TileKind::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TileKind::Estus),
            2 => Some(TileKind::Sword),
            3 => Some(TileKind::Shield),
            4 => Some(TileKind::Boot),
            5 => Some(TileKind::Jammer),
            _ => None,
        }
    }
}

/// Engine-assigned tile identity. Unique for the lifetime of one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// Opaque handle the presentation layer returns from `spawn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileHandle(pub u64);

/// A board coordinate. `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Neighbouring position in `dir`, or `None` when it would underflow.
    ///
    /// Upper bounds are the grid's business; this only guards against
    /// stepping below zero or past `u8::MAX`.
    pub fn step(self, dir: Direction) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        if !(0..=u8::MAX as i16).contains(&x) || !(0..=u8::MAX as i16).contains(&y) {
            return None;
        }
        Some(Pos::new(x as u8, y as u8))
    }

    /// True when `other` shares an edge with `self`
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.x.abs_diff(other.x) as u16 + self.y.abs_diff(other.y) as u16 == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four scan directions. Diagonals never participate in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (dx, dy) with y growing upward
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Cascade state machine phases.
///
/// The cycle is `Scanning → Clearing → Settling → Refilling → Scanning`, leaving
/// through `Stable` once a scan finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Stable,
    Scanning,
    Clearing,
    Settling,
    Refilling,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Stable => "stable",
            Phase::Scanning => "scanning",
            Phase::Clearing => "clearing",
            Phase::Settling => "settling",
            Phase::Refilling => "refilling",
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, Phase::Stable)
    }
}

/// What to do with a swap that produces no match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapPolicy {
    /// Swap the tiles back and report the move as reverted
    #[default]
    RevertIfNoMatch,
    /// Keep the swapped tiles where they are
    AlwaysKeep,
}

impl SwapPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "revert" | "revert_if_no_match" => Some(SwapPolicy::RevertIfNoMatch),
            "keep" | "always_keep" => Some(SwapPolicy::AlwaysKeep),
            _ => None,
        }
    }
}

/// What to do with a swap that arrives while a cascade is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyPolicy {
    /// Fail with [`BoardError::BoardBusy`]
    #[default]
    Reject,
    /// Hold it until the board is stable (bounded queue)
    Queue,
}

impl BusyPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Some(BusyPolicy::Reject),
            "queue" => Some(BusyPolicy::Queue),
            _ => None,
        }
    }
}

/// Why a swap request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSwapReason {
    EmptyCell(Pos),
    SameCell,
    NotAdjacent,
}

/// Why a configuration was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssue {
    ZeroDimension,
    MatchRequirementTooSmall,
    MatchRequirementTooLarge,
    TooFewKinds,
}

/// Errors surfaced by board operations.
///
/// Every variant is raised before any state is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    OutOfBounds { x: i16, y: i16 },
    InvalidSwap(InvalidSwapReason),
    BoardBusy,
    InvalidConfig(ConfigIssue),
}

impl BoardError {
    pub fn code(self) -> &'static str {
        match self {
            BoardError::OutOfBounds { .. } => "out_of_bounds",
            BoardError::InvalidSwap(_) => "invalid_swap",
            BoardError::BoardBusy => "board_busy",
            BoardError::InvalidConfig(_) => "invalid_config",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            BoardError::OutOfBounds { .. } => "coordinate outside the board",
            BoardError::InvalidSwap(InvalidSwapReason::EmptyCell(_)) => {
                "swap requested on an empty cell"
            }
            BoardError::InvalidSwap(InvalidSwapReason::SameCell) => "swap requires two cells",
            BoardError::InvalidSwap(InvalidSwapReason::NotAdjacent) => {
                "swap cells are not adjacent"
            }
            BoardError::BoardBusy => "board is resolving a cascade",
            BoardError::InvalidConfig(ConfigIssue::ZeroDimension) => {
                "board width and height must be non-zero"
            }
            BoardError::InvalidConfig(ConfigIssue::MatchRequirementTooSmall) => {
                "match requirement must be at least 2"
            }
            BoardError::InvalidConfig(ConfigIssue::MatchRequirementTooLarge) => {
                "match requirement exceeds both board dimensions"
            }
            BoardError::InvalidConfig(ConfigIssue::TooFewKinds) => {
                "at least two distinct tile kinds are required"
            }
        }
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds { x, y } => write!(f, "{} at ({}, {})", self.message(), x, y),
            BoardError::InvalidSwap(InvalidSwapReason::EmptyCell(p)) => {
                write!(f, "{} at {}", self.message(), p)
            }
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for BoardError {}
