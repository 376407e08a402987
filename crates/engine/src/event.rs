//! Turn events - what happened, in order, for frontends to play back
//!
//! The orchestrator records one event per discrete transition. Events carry tile ids
//! and grid-space coordinates only; presentation decides how to animate them.

use serde::Serialize;

use crate::core::{AbsorbedTile, TileId};

/// A tile that left the board, with where it stood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemovedTile {
    pub tile: TileId,
    pub k: u8,
    pub x: i8,
    pub y: i8,
}

impl From<AbsorbedTile> for RemovedTile {
    fn from(value: AbsorbedTile) -> Self {
        Self {
            tile: value.id,
            k: value.k,
            x: value.from_x,
            y: value.from_y,
        }
    }
}

/// Game event emitted by [`Game`](crate::Game)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// A new active tile entered the board
    Spawned {
        tile: TileId,
        k: u8,
        x: i8,
        y: i8,
        next_k: u8,
    },
    /// The active tile moved under player control or timed gravity
    Moved { tile: TileId, x: i8, y: i8 },
    /// The active tile was placed into the board
    Locked { tile: TileId, x: i8, y: i8 },
    /// A tile absorbed its equal neighbors
    Merged {
        tile: TileId,
        new_k: u8,
        absorbed: Vec<RemovedTile>,
        base_points: u64,
        points: u64,
        combo: u32,
    },
    /// A resolving tile fell one footprint step
    Fell { tile: TileId, from_y: i8, to_y: i8 },
    /// Board-wide gravity moved these tiles
    Settled { moved: Vec<TileId> },
    /// The spawnable tier window moved
    TiersUnlocked { max_unlocked: u8, min_tier: u8 },
    /// Tiles below the tier floor were cleared (not scored)
    TierEvicted { removed: Vec<RemovedTile> },
    Paused,
    Resumed,
    GameOver { score: u64, highest_value: u64 },
    Restarted { seed: u32 },
}

impl TurnEvent {
    /// Events that change board contents (as opposed to the active tile or status)
    pub fn touches_board(&self) -> bool {
        matches!(
            self,
            TurnEvent::Locked { .. }
                | TurnEvent::Merged { .. }
                | TurnEvent::Fell { .. }
                | TurnEvent::Settled { .. }
                | TurnEvent::TierEvicted { .. }
        )
    }
}
