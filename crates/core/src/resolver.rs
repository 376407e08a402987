//! Resolver module - turn resolution as a step-by-step state machine
//!
//! When a tile locks it gets resolution priority: it merges with every equal neighbor
//! and falls, over and over, until neither applies. Only then does the rest of the
//! board move. Board-wide gravity runs next, and every tile it moved is driven through
//! the same priority loop, until a gravity sweep moves nothing.
//!
//! [`Resolver::step`] performs exactly one discrete transition (a merge, a fall step,
//! or a gravity sweep) and reports it, so a frontend can play each one back before
//! asking for the next. [`Resolver::run`] drives it to completion in one go.
//!
//! Queued tiles may be stale or listed more than once; a tile that is gone or already
//! stable simply finishes without producing a step.

use std::collections::VecDeque;

use log::trace;

use crate::board::Board;
use crate::physics::{apply_gravity, fall_step, try_merge, MergeResult};
use crate::tile::{Tile, TileId};

/// One discrete board transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveStep {
    /// A priority tile absorbed its equal neighbors
    Merged(MergeResult),
    /// A priority tile fell one footprint step
    Fell { id: TileId, from_y: i8, to_y: i8 },
    /// Board-wide gravity moved these tiles (once per step taken)
    Settled { moved: Vec<TileId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Start of a priority iteration: try to merge
    Merge(TileId),
    /// Second half of a priority iteration: try to fall
    Fall { id: TileId, merged: bool },
    /// Board-wide gravity sweep
    Sweep,
    Done,
}

/// Drives one turn's resolution
#[derive(Debug, Clone)]
pub struct Resolver {
    phase: Phase,
    pending: VecDeque<TileId>,
}

impl Resolver {
    /// Resolve starting from a freshly placed tile
    pub fn new(priority: TileId) -> Self {
        Self {
            phase: Phase::Merge(priority),
            pending: VecDeque::new(),
        }
    }

    /// Resolve starting from a board-wide gravity sweep
    pub fn cascade() -> Self {
        Self {
            phase: Phase::Sweep,
            pending: VecDeque::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Tile currently holding priority, if any
    pub fn priority_tile(&self) -> Option<TileId> {
        match self.phase {
            Phase::Merge(id) | Phase::Fall { id, .. } => Some(id),
            Phase::Sweep | Phase::Done => None,
        }
    }

    fn next_priority(&mut self) {
        self.phase = match self.pending.pop_front() {
            Some(id) => Phase::Merge(id),
            None => Phase::Sweep,
        };
    }

    /// Perform the next transition; None once the board is stable
    pub fn step(&mut self, board: &mut Board) -> Option<ResolveStep> {
        loop {
            match self.phase {
                Phase::Done => return None,
                Phase::Merge(id) => {
                    if !board.is_at_recorded_position(id) {
                        self.next_priority();
                        continue;
                    }
                    match try_merge(board, id) {
                        Some(result) => {
                            self.phase = Phase::Fall { id, merged: true };
                            return Some(ResolveStep::Merged(result));
                        }
                        None => self.phase = Phase::Fall { id, merged: false },
                    }
                }
                Phase::Fall { id, merged } => {
                    if !board.is_at_recorded_position(id) {
                        self.next_priority();
                        continue;
                    }
                    let from_y = board.tile(id).map_or(0, Tile::y);
                    if fall_step(board, id) {
                        self.phase = Phase::Merge(id);
                        let to_y = board.tile(id).map_or(from_y, Tile::y);
                        return Some(ResolveStep::Fell { id, from_y, to_y });
                    }
                    if merged {
                        // The upgrade may have created a new equal neighbor
                        self.phase = Phase::Merge(id);
                    } else {
                        trace!("tile {} is stable", id);
                        self.next_priority();
                    }
                }
                Phase::Sweep => {
                    let moved = apply_gravity(board);
                    if moved.is_empty() {
                        self.phase = Phase::Done;
                        return None;
                    }
                    self.pending.extend(moved.iter().copied());
                    self.next_priority();
                    return Some(ResolveStep::Settled { moved });
                }
            }
        }
    }

    /// Run to completion, collecting every transition
    pub fn run(mut self, board: &mut Board) -> Vec<ResolveStep> {
        let mut steps = Vec::new();
        while let Some(step) = self.step(board) {
            steps.push(step);
        }
        steps
    }
}

/// Sum of base points over the merges in a list of steps
pub fn total_base_points(steps: &[ResolveStep]) -> u64 {
    steps
        .iter()
        .filter_map(|step| match step {
            ResolveStep::Merged(m) => Some(m.base_points),
            _ => None,
        })
        .fold(0u64, u64::saturating_add)
}
