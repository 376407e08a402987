//! Drop Merge (workspace facade crate).
//!
//! This package exposes `drop_merge::{types,core,engine}` while the implementation
//! lives in dedicated crates under `crates/`.

pub use drop_merge_core as core;
pub use drop_merge_engine as engine;
pub use drop_merge_types as types;
