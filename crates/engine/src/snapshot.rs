use serde::Serialize;

use crate::game::GameStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveSnapshot {
    pub k: u8,
    pub x: i8,
    pub y: i8,
}

/// Serializable view of a game, visible rows only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Exponent per visible cell, 0 for empty
    pub board: Vec<Vec<u8>>,
    pub active: Option<ActiveSnapshot>,
    pub next_k: u8,
    pub status: GameStatus,
    pub score: u64,
    pub combo: u32,
    pub highest_value: u64,
    pub max_unlocked: u8,
    pub min_tier: u8,
    pub turn: u32,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Number of non-empty visible cells
    pub fn filled_cells(&self) -> usize {
        self.board.iter().flatten().filter(|&&k| k != 0).count()
    }
}
