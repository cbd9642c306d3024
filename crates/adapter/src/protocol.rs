//! Protocol module - JSON message types for the swap adapter
//!
//! Inbound: one [`SwapCommit`] per line. Outbound: [`BoardEvent`]s, tagged by
//! `type`, one per line. Kinds and phases travel as lowercase strings.

use serde::{Deserialize, Serialize};

use gem_cascade_core::types::{BoardError, Pos, TileKind};
use gem_cascade_core::{BoardSnapshot, StepEvent, StepReport, SwapOutcome, SwapRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKindLower {
    Estus,
    Sword,
    Shield,
    Boot,
    Jammer,
}

impl From<TileKind> for TileKindLower {
    fn from(value: TileKind) -> Self {
        match value {
            TileKind::Estus => TileKindLower::Estus,
            TileKind::Sword => TileKindLower::Sword,
            TileKind::Shield => TileKindLower::Shield,
            TileKind::Boot => TileKindLower::Boot,
            TileKind::Jammer => TileKindLower::Jammer,
        }
    }
}

impl From<TileKindLower> for TileKind {
    fn from(value: TileKindLower) -> Self {
        match value {
            TileKindLower::Estus => TileKind::Estus,
            TileKindLower::Sword => TileKind::Sword,
            TileKindLower::Shield => TileKind::Shield,
            TileKindLower::Boot => TileKind::Boot,
            TileKindLower::Jammer => TileKind::Jammer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosMsg {
    pub x: u8,
    pub y: u8,
}

impl From<Pos> for PosMsg {
    fn from(p: Pos) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PosMsg> for Pos {
    fn from(p: PosMsg) -> Self {
        Pos::new(p.x, p.y)
    }
}

// ============== Presentation -> Engine ==============

/// "The user swapped the tiles at `a` and `b`", or dragged the tile at `a`
/// across `via` and released it at `b`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCommit {
    #[serde(default)]
    pub seq: u64,
    pub a: PosMsg,
    pub b: PosMsg,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<PosMsg>,
}

impl SwapCommit {
    pub fn new(seq: u64, a: Pos, b: Pos) -> Self {
        Self {
            seq,
            a: a.into(),
            b: b.into(),
            via: Vec::new(),
        }
    }

    /// Drag along `path`; `None` when it has fewer than two cells
    pub fn drag(seq: u64, path: &[Pos]) -> Option<Self> {
        SwapRequest::drag(path).map(|req| Self::from_request(seq, &req))
    }

    pub fn from_request(seq: u64, req: &SwapRequest) -> Self {
        Self {
            seq,
            a: req.a.into(),
            b: req.b.into(),
            via: req.via.iter().map(|&p| p.into()).collect(),
        }
    }

    pub fn request(&self) -> SwapRequest {
        SwapRequest {
            a: self.a.into(),
            b: self.b.into(),
            via: self.via.iter().map(|&p| p.into()).collect(),
        }
    }
}

pub fn parse_commit(line: &str) -> Result<SwapCommit, serde_json::Error> {
    serde_json::from_str(line.trim())
}

// ============== Engine -> Presentation ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallMsg {
    pub id: u64,
    pub from: PosMsg,
    pub to: PosMsg,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnMsg {
    pub at: PosMsg,
    pub kind: TileKindLower,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardObservation {
    pub width: u8,
    pub height: u8,
    /// Letter rows, top row first; `.` is empty
    pub rows: Vec<String>,
    pub phase: String,
    pub pass: u32,
    pub queued_swaps: usize,
    pub board_hash: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    SwapCommitted {
        seq: u64,
        a: PosMsg,
        b: PosMsg,
        delay_hint_ms: u32,
    },
    SwapReverted {
        seq: u64,
        a: PosMsg,
        b: PosMsg,
    },
    SwapKept {
        seq: u64,
        a: PosMsg,
        b: PosMsg,
    },
    SwapQueued {
        seq: u64,
        depth: usize,
    },
    SwapRejected {
        seq: u64,
        code: String,
        message: String,
    },
    Scanned {
        pass: u32,
        groups: Vec<Vec<PosMsg>>,
    },
    Cleared {
        pass: u32,
        positions: Vec<PosMsg>,
        delay_hint_ms: u32,
    },
    Settled {
        pass: u32,
        falls: Vec<FallMsg>,
        delay_hint_ms: u32,
    },
    Refilled {
        pass: u32,
        spawned: Vec<SpawnMsg>,
        delay_hint_ms: u32,
    },
    Stable {
        passes: u32,
        changed: bool,
    },
    Observation(BoardObservation),
}

impl BoardEvent {
    pub fn is_swap_result(&self) -> bool {
        matches!(
            self,
            BoardEvent::SwapCommitted { .. }
                | BoardEvent::SwapReverted { .. }
                | BoardEvent::SwapKept { .. }
                | BoardEvent::SwapQueued { .. }
                | BoardEvent::SwapRejected { .. }
        )
    }
}

pub fn event_from_swap(commit: &SwapCommit, result: &Result<SwapOutcome, BoardError>) -> BoardEvent {
    let (seq, a, b) = (commit.seq, commit.a, commit.b);
    match result {
        Ok(SwapOutcome::Committed { delay_hint_ms }) => BoardEvent::SwapCommitted {
            seq,
            a,
            b,
            delay_hint_ms: *delay_hint_ms,
        },
        Ok(SwapOutcome::Reverted) => BoardEvent::SwapReverted { seq, a, b },
        Ok(SwapOutcome::Kept) => BoardEvent::SwapKept { seq, a, b },
        Ok(SwapOutcome::Queued { depth }) => BoardEvent::SwapQueued { seq, depth: *depth },
        Err(e) => BoardEvent::SwapRejected {
            seq,
            code: e.code().to_string(),
            message: e.to_string(),
        },
    }
}

pub fn event_from_step(report: &StepReport) -> BoardEvent {
    let pass = report.pass;
    let delay_hint_ms = report.delay_hint_ms;
    match &report.event {
        StepEvent::Scanned { groups } => BoardEvent::Scanned {
            pass,
            groups: groups
                .iter()
                .map(|g| g.iter().map(|&p| p.into()).collect())
                .collect(),
        },
        StepEvent::Cleared { positions } => BoardEvent::Cleared {
            pass,
            positions: positions.iter().map(|&p| p.into()).collect(),
            delay_hint_ms,
        },
        StepEvent::Settled { falls } => BoardEvent::Settled {
            pass,
            falls: falls
                .iter()
                .map(|f| FallMsg {
                    id: f.id.0,
                    from: f.from.into(),
                    to: f.to.into(),
                })
                .collect(),
            delay_hint_ms,
        },
        StepEvent::Refilled { spawned } => BoardEvent::Refilled {
            pass,
            spawned: spawned
                .iter()
                .map(|&(at, kind)| SpawnMsg {
                    at: at.into(),
                    kind: kind.into(),
                })
                .collect(),
            delay_hint_ms,
        },
        StepEvent::Stabilized { passes, changed } => BoardEvent::Stable {
            passes: *passes,
            changed: *changed,
        },
    }
}

pub fn build_observation(snapshot: &BoardSnapshot) -> BoardObservation {
    let rows = (0..snapshot.height)
        .rev()
        .map(|y| {
            (0..snapshot.width)
                .map(|x| snapshot.kind_at(x, y).map(|k| k.letter()).unwrap_or('.'))
                .collect()
        })
        .collect();

    BoardObservation {
        width: snapshot.width,
        height: snapshot.height,
        rows,
        phase: snapshot.phase.as_str().to_string(),
        pass: snapshot.pass,
        queued_swaps: snapshot.queued_swaps,
        board_hash: snapshot.board_hash,
    }
}
