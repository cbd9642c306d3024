//! Cascade step reports
//!
//! Each call to [`BoardEngine::step`](crate::BoardEngine::step) finishes exactly
//! one phase and describes what it did. Presentation layers use the
//! `delay_hint_ms` to pace animations; the engine itself never waits.

use crate::gravity::Fall;
use crate::matcher::MatchGroup;
use crate::types::{Phase, Pos, TileKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    /// A scan found groups; they are cleared by the next step
    Scanned { groups: Vec<MatchGroup> },
    /// Tiles destroyed, in group order
    Cleared { positions: Vec<Pos> },
    /// Tiles moved down by gravity
    Settled { falls: Vec<Fall> },
    /// New tiles placed into the holes, raster order
    Refilled { spawned: Vec<(Pos, TileKind)> },
    /// A scan found nothing; the board is stable
    Stabilized { passes: u32, changed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Phase this step executed
    pub completed: Phase,
    /// Phase the engine is in now
    pub next: Phase,
    /// Completed clear/settle/refill passes in the current cascade
    pub pass: u32,
    pub delay_hint_ms: u32,
    pub event: StepEvent,
}

/// Totals for one cascade, from the first scan to `Stable`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub passes: u32,
    pub steps: usize,
    pub tiles_cleared: usize,
    pub tiles_spawned: usize,
    /// Number of groups found by each scan that found any
    pub groups_per_pass: Vec<usize>,
    /// Sum of every step's delay hint
    pub total_delay_hint_ms: u64,
}

impl CascadeSummary {
    pub fn record(&mut self, report: &StepReport) {
        self.steps += 1;
        self.total_delay_hint_ms += report.delay_hint_ms as u64;
        self.passes = report.pass;
        match &report.event {
            StepEvent::Scanned { groups } => self.groups_per_pass.push(groups.len()),
            StepEvent::Cleared { positions } => self.tiles_cleared += positions.len(),
            StepEvent::Refilled { spawned } => self.tiles_spawned += spawned.len(),
            StepEvent::Settled { .. } | StepEvent::Stabilized { .. } => {}
        }
    }

    /// Largest single-pass group count; 2+ means simultaneous matches
    pub fn max_groups_in_pass(&self) -> usize {
        self.groups_per_pass.iter().copied().max().unwrap_or(0)
    }

    /// True when at least one tile was cleared
    pub fn cleared_any(&self) -> bool {
        self.tiles_cleared > 0
    }
}
