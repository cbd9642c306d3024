//! Paced driver - async cascade playback
//!
//! Runs the cascade one phase at a time and sleeps for each phase's delay hint
//! so a presentation layer can animate in between. Commits keep arriving while
//! the driver sleeps; the engine rejects or queues them (per its busy policy)
//! and queued swaps are replayed in order once the board is stable again.
//!
//! # Environment Variables
//!
//! - `GEM_CASCADE_LOG_PATH`: append every emitted event to this JSONL file
//! - `GEM_CASCADE_TIME_SCALE`: percent applied to every delay hint (0 = no pauses)

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use gem_cascade_core::types::Phase;
use gem_cascade_core::{Presenter, SwapOutcome};

use crate::adapter::SwapAdapter;
use crate::event_log::EventLog;
use crate::protocol::{event_from_step, event_from_swap, BoardEvent, SwapCommit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub log_path: Option<String>,
    /// Delay hints are multiplied by this percentage
    pub time_scale_percent: u32,
    /// Emit a full observation at start-up and whenever the board settles
    pub emit_observations: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            time_scale_percent: 100,
            emit_observations: true,
        }
    }
}

impl DriverConfig {
    pub fn from_env() -> Self {
        use std::env;

        let log_path = env::var("GEM_CASCADE_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let time_scale_percent = env::var("GEM_CASCADE_TIME_SCALE")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(100);

        Self {
            log_path,
            time_scale_percent,
            ..Self::default()
        }
    }

    pub fn scaled(&self, delay_hint_ms: u32) -> Duration {
        Duration::from_millis(delay_hint_ms as u64 * self.time_scale_percent as u64 / 100)
    }
}

pub struct PacedDriver<P: Presenter> {
    adapter: SwapAdapter<P>,
    config: DriverConfig,
    events: mpsc::UnboundedSender<BoardEvent>,
    log: Option<EventLog>,
    /// Sequence numbers of swaps waiting in the engine's queue, oldest first
    queued_seqs: VecDeque<u64>,
    inbound_open: bool,
}

impl<P: Presenter> PacedDriver<P> {
    /// Build a driver; opens the event log when one is configured
    pub async fn new(
        adapter: SwapAdapter<P>,
        config: DriverConfig,
        events: mpsc::UnboundedSender<BoardEvent>,
    ) -> Result<Self> {
        let log = match config.log_path.as_deref() {
            Some(path) => Some(EventLog::open(path).await?),
            None => None,
        };
        Ok(Self {
            adapter,
            config,
            events,
            log,
            queued_seqs: VecDeque::new(),
            inbound_open: true,
        })
    }

    fn emit(&self, event: BoardEvent) {
        if let Some(log) = &self.log {
            log.record(&event);
        }
        let _ = self.events.send(event);
    }

    fn observe(&self) {
        if self.config.emit_observations {
            self.emit(BoardEvent::Observation(self.adapter.observation()));
        }
    }

    /// Hand a commit to the engine. Returns the settle hint when the swap
    /// started a cascade.
    fn offer(&mut self, commit: SwapCommit) -> Option<u32> {
        let (engine, presenter) = self.adapter.parts_mut();
        let result = engine.request_swap(commit.request(), presenter);
        if let Ok(SwapOutcome::Queued { .. }) = result {
            self.queued_seqs.push_back(commit.seq);
        }
        self.emit(event_from_swap(&commit, &result));
        match result {
            Ok(SwapOutcome::Committed { delay_hint_ms }) => Some(delay_hint_ms),
            _ => None,
        }
    }

    /// Sleep for a scaled delay hint while still accepting commits
    async fn pause(&mut self, delay_hint_ms: u32, commits: &mut mpsc::Receiver<SwapCommit>) {
        let sleep = tokio::time::sleep(self.config.scaled(delay_hint_ms));
        tokio::pin!(sleep);

        loop {
            if !self.inbound_open {
                (&mut sleep).await;
                return;
            }
            tokio::select! {
                _ = &mut sleep => return,
                maybe = commits.recv() => match maybe {
                    Some(commit) => {
                        let _ = self.offer(commit);
                    }
                    None => self.inbound_open = false,
                },
            }
        }
    }

    /// Drive until the commit channel closes and every queued swap has
    /// resolved. Returns the adapter so callers can inspect the final board.
    pub async fn run(mut self, mut commits: mpsc::Receiver<SwapCommit>) -> Result<SwapAdapter<P>> {
        self.observe();

        loop {
            if self.adapter.engine().is_stable() {
                let (engine, presenter) = self.adapter.parts_mut();
                if let Some((req, result)) = engine.apply_queued(presenter) {
                    let seq = self.queued_seqs.pop_front().unwrap_or(0);
                    let commit = SwapCommit::from_request(seq, &req);
                    self.emit(event_from_swap(&commit, &result));
                    if let Ok(SwapOutcome::Committed { delay_hint_ms }) = result {
                        self.pause(delay_hint_ms, &mut commits).await;
                    }
                    continue;
                }

                if !self.inbound_open {
                    break;
                }
                match commits.recv().await {
                    Some(commit) => {
                        if let Some(delay_hint_ms) = self.offer(commit) {
                            self.pause(delay_hint_ms, &mut commits).await;
                        }
                    }
                    None => self.inbound_open = false,
                }
                continue;
            }

            let (engine, presenter) = self.adapter.parts_mut();
            let Some(report) = engine.step(presenter) else {
                continue;
            };
            self.emit(event_from_step(&report));

            if report.next == Phase::Stable {
                self.observe();
            } else {
                self.pause(report.delay_hint_ms, &mut commits).await;
            }
        }

        if let Some(log) = self.log.take() {
            log.close().await;
        }
        Ok(self.adapter)
    }
}

/// Spawn-friendly wrapper: build a driver and run it to completion
pub async fn run_driver<P: Presenter>(
    adapter: SwapAdapter<P>,
    config: DriverConfig,
    commits: mpsc::Receiver<SwapCommit>,
    events: mpsc::UnboundedSender<BoardEvent>,
) -> Result<SwapAdapter<P>> {
    PacedDriver::new(adapter, config, events)
        .await?
        .run(commits)
        .await
}
