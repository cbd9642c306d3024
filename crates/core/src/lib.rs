//! Core board logic - pure, deterministic, and testable
//!
//! This crate holds the match-3 rules: the grid, match detection, gravity,
//! refill, and the cascade state machine that ties them together. It has
//! **zero dependencies** on rendering, input, or I/O:
//!
//! - **Deterministic**: same seed and same swaps produce identical boards
//! - **Headless**: presentation is a [`Presenter`] the caller supplies
//! - **Step-wise**: the cascade advances one phase per [`BoardEngine::step`],
//!   so callers can pause between phases for animation
//!
//! # Module Structure
//!
//! - [`grid`]: bounds-checked cell storage (`y = 0` is the bottom row)
//! - [`matcher`]: directional run scans, chain propagation, whole-board scan
//! - [`gravity`]: per-column compaction
//! - [`rng`]: seedable kind selection, including run-avoiding picks
//! - [`engine`]: the cascade state machine and swap handling
//! - [`cascade`]: step reports and cascade summaries
//! - [`config`]: board configuration and validation
//! - [`snapshot`]: plain-data board copies with a stable hash
//!
//! # Rules
//!
//! - A run is a straight, contiguous, same-kind line in a row or column.
//!   Runs of at least `match_requirement` (default 3) clear.
//! - Runs that share a tile clear together as one group, and the union keeps
//!   growing through every member's own runs (L, T and stair shapes).
//! - After clearing, tiles fall straight down; new tiles fill the holes; the
//!   board is scanned again until nothing matches.
//! - A swap that forms no match is put back (configurable).
//!
//! # Example
//!
//! ```
//! use gem_cascade_core::{BoardConfig, BoardEngine, NullPresenter, SwapOutcome};
//! use gem_cascade_core::types::Pos;
//!
//! let mut presenter = NullPresenter::new();
//! let mut engine = BoardEngine::initialize(BoardConfig::default(), &mut presenter).unwrap();
//! assert!(engine.is_stable());
//!
//! match engine.swap(Pos::new(0, 0), Pos::new(1, 0), &mut presenter).unwrap() {
//!     SwapOutcome::Committed { .. } => {
//!         let summary = engine.run_to_stable(&mut presenter);
//!         assert!(summary.tiles_cleared >= 3);
//!     }
//!     SwapOutcome::Reverted => {}
//!     other => panic!("unexpected {:?}", other),
//! }
//! assert!(engine.is_stable());
//! ```

pub mod cascade;
pub mod config;
pub mod engine;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod presenter;
pub mod rng;
pub mod snapshot;

pub use gem_cascade_types as types;

// Re-export commonly used types for convenience
pub use cascade::{CascadeSummary, StepEvent, StepReport};
pub use config::BoardConfig;
pub use engine::{BoardEngine, SwapOutcome, SwapRequest};
pub use gravity::{settle, Fall};
pub use grid::{Cell, Grid, Tile};
pub use matcher::{find_matches, has_any_match, match_at, MatchGroup};
pub use presenter::{NullPresenter, Presenter};
pub use rng::SimpleRng;
pub use snapshot::{fnv1a64, BoardSnapshot};
