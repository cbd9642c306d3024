//! Adapter module - commit boundary and playback for the board engine
//!
//! The engine itself is synchronous and knows nothing about timing. This crate
//! sits between it and whatever produces swaps:
//!
//! - [`adapter::SwapAdapter`] applies one commit at a time and resolves the
//!   resulting cascade immediately (tests, headless runs)
//! - [`driver::PacedDriver`] runs on tokio, sleeps for each phase's delay hint
//!   and keeps accepting commits while the board is busy
//! - [`protocol`] defines the line-delimited JSON messages both sides speak
//! - [`event_log::EventLog`] appends every emitted event to a JSONL file
//! - [`recording::RecordingPresenter`] mirrors the grid the way a scene would
//!
//! # Wire Format
//!
//! ```text
//! -> {"seq":1,"a":{"x":2,"y":0},"b":{"x":2,"y":1}}
//! <- {"type":"swap_committed","seq":1,"a":{"x":2,"y":0},"b":{"x":2,"y":1},"delay_hint_ms":250}
//! <- {"type":"scanned","pass":0,"groups":[[{"x":0,"y":0},{"x":1,"y":0},{"x":2,"y":0}]]}
//! <- {"type":"cleared","pass":0,"positions":[...],"delay_hint_ms":2000}
//! <- {"type":"stable","passes":1,"changed":true}
//! ```
//!
//! # Environment Variables
//!
//! - `GEM_CASCADE_LOG_PATH`: JSONL event log file (unset = no log)
//! - `GEM_CASCADE_TIME_SCALE`: percent applied to delay hints (default: 100)

pub mod adapter;
pub mod driver;
pub mod event_log;
pub mod protocol;
pub mod recording;

pub use gem_cascade_core as core;
pub use gem_cascade_types as types;

pub use adapter::{CommitResult, SwapAdapter};
pub use driver::{run_driver, DriverConfig, PacedDriver};
pub use event_log::EventLog;
pub use protocol::*;
pub use recording::{PresenterCall, RecordingPresenter};
