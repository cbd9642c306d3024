//! Swap adapter - synchronous boundary between input and the engine
//!
//! Takes "the user swapped A and B" commits, applies them, and when a match
//! forms runs the cascade to `Stable` in one go. Delay hints are collected but
//! not waited on; use [`crate::driver`] for paced playback.

use gem_cascade_core::types::{BoardError, Pos};
use gem_cascade_core::{BoardConfig, BoardEngine, CascadeSummary, Presenter, SwapOutcome};

use crate::protocol::{build_observation, event_from_swap, BoardEvent, BoardObservation, SwapCommit};

/// Result of one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    pub outcome: SwapOutcome,
    /// Present when the swap formed a match and the cascade ran
    pub summary: Option<CascadeSummary>,
}

pub struct SwapAdapter<P: Presenter> {
    engine: BoardEngine,
    presenter: P,
}

impl<P: Presenter> SwapAdapter<P> {
    pub fn new(engine: BoardEngine, presenter: P) -> Self {
        Self { engine, presenter }
    }

    /// Generate a fresh board through `presenter`
    pub fn from_config(config: BoardConfig, mut presenter: P) -> Result<Self, BoardError> {
        let engine = BoardEngine::initialize(config, &mut presenter)?;
        Ok(Self { engine, presenter })
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Split into engine and presenter for callers that drive steps themselves
    pub fn parts_mut(&mut self) -> (&mut BoardEngine, &mut P) {
        (&mut self.engine, &mut self.presenter)
    }

    pub fn into_parts(self) -> (BoardEngine, P) {
        (self.engine, self.presenter)
    }

    /// Apply a swap and, if it matched, resolve the whole cascade.
    ///
    /// Swaps queued by the engine are not replayed here; see
    /// [`SwapAdapter::commit_queued`].
    pub fn commit(&mut self, commit: &SwapCommit) -> Result<CommitResult, BoardError> {
        let outcome = self
            .engine
            .request_swap(commit.request(), &mut self.presenter)?;
        Ok(self.finish(outcome))
    }

    /// Drag the tile at `path[0]` along `path` and resolve any cascade, like
    /// [`SwapAdapter::commit`]
    pub fn commit_path(&mut self, path: &[Pos]) -> Result<CommitResult, BoardError> {
        let outcome = self.engine.swap_path(path, &mut self.presenter)?;
        Ok(self.finish(outcome))
    }

    /// Apply the oldest queued swap, if any, the same way [`SwapAdapter::commit`] does
    pub fn commit_queued(&mut self) -> Option<Result<CommitResult, BoardError>> {
        let (_, result) = self.engine.apply_queued(&mut self.presenter)?;
        Some(result.map(|outcome| self.finish(outcome)))
    }

    fn finish(&mut self, outcome: SwapOutcome) -> CommitResult {
        let summary = match outcome {
            SwapOutcome::Committed { .. } => Some(self.engine.run_to_stable(&mut self.presenter)),
            _ => None,
        };
        CommitResult { outcome, summary }
    }

    /// [`SwapAdapter::commit`], reported as a wire event
    pub fn commit_event(&mut self, commit: &SwapCommit) -> (BoardEvent, Option<CascadeSummary>) {
        let result = self.commit(commit);
        let event = event_from_swap(commit, &result.as_ref().map(|r| r.outcome).map_err(|e| *e));
        (event, result.ok().and_then(|r| r.summary))
    }

    pub fn observation(&self) -> BoardObservation {
        build_observation(&self.engine.snapshot())
    }
}
