//! Gem Cascade (workspace facade crate).
//!
//! Re-exports the board crates under one name so tests, benches and the demo
//! binary can use `gem_cascade::{core,adapter,types}` while the implementation
//! lives in dedicated crates under `crates/`.

pub mod demo;

pub use gem_cascade_adapter as adapter;
pub use gem_cascade_core as core;
pub use gem_cascade_types as types;
