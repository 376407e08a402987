//! Shared types module - constants and player actions
//!
//! This crate defines the fundamental values used throughout the workspace.
//! Everything here is plain data with no external dependencies, so it can be used
//! by the resolution engine, the turn orchestrator and any frontend alike.
//!
//! # Board Geometry
//!
//! - **Width**: 10 cells (indexed 0-9), i.e. 5 tile columns
//! - **Tile footprint**: every tile covers a 2x2 block of cells
//! - **Spawn buffer**: 2 hidden rows above the visible area
//! - **Visible height**: configurable, 12 cells by default
//!
//! Grid rows are addressed in "grid space" where row 0 is the top of the spawn
//! buffer. A visible row converts with `grid_y = visible_y + SPAWN_BUFFER`.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `GRAVITY_INTERVAL_MS` | 700 | Active tile falls one step |
//! | `SOFT_DROP_INTERVAL_MS` | 70 | Fall interval while soft dropping |
//! | `MERGE_PAUSE_MS` | 80 | Pause before a merge is played back |
//! | `MERGE_ANIMATION_MS` | 330 | Absorb + pop playback of one merge |
//! | `FALL_STEP_MS` | 30 | Playback of one resolution fall step |
//!
//! # Examples
//!
//! ```
//! use drop_merge_types::{GameAction, BOARD_WIDTH, SPAWN_X, TILE_SIZE};
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(TILE_SIZE, 2);
//! assert_eq!(SPAWN_X % TILE_SIZE, 0);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//! assert_eq!(GameAction::from_str("dropToColumn:3"), Some(GameAction::DropToColumn(3)));
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Edge length of a tile footprint in cells (tiles are 2x2)
pub const TILE_SIZE: u8 = 2;

/// Number of hidden rows above the visible area
pub const SPAWN_BUFFER: u8 = 2;

/// Default visible height in cells (6 tiles tall)
pub const DEFAULT_VISIBLE_HEIGHT: u8 = 12;

/// Largest visible height accepted by the board (keeps grid rows inside `i8`)
pub const MAX_VISIBLE_HEIGHT: u8 = 120;

/// Number of tile-aligned columns across the board
pub const COLUMN_COUNT: u8 = BOARD_WIDTH / TILE_SIZE;

/// Default spawn column in cells, aligned to the footprint grid
pub const SPAWN_X: u8 = (BOARD_WIDTH - TILE_SIZE) / 2 / TILE_SIZE * TILE_SIZE;

/// Spawn row in grid space (top of the hidden spawn buffer)
pub const SPAWN_Y: u8 = 0;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Timed gravity interval for the active tile
pub const GRAVITY_INTERVAL_MS: u32 = 700;

/// Timed gravity interval while soft dropping
pub const SOFT_DROP_INTERVAL_MS: u32 = 70;

/// Pause before a merge is played back
pub const MERGE_PAUSE_MS: u32 = 80;

/// Absorb (150ms) plus pop (180ms) playback of a single merge
pub const MERGE_ANIMATION_MS: u32 = 330;

/// Playback of one fall step during resolution
pub const FALL_STEP_MS: u32 = 30;

/// Combo multiplier denominator.
///
/// The combo multiplier `1 + (combo - 1) / 2` is evaluated as `(combo + 1) / 2`
/// so scoring stays in integer arithmetic.
pub const COMBO_DENOMINATOR: u64 = 2;


/// Player actions that can be applied to the game
///
/// These actions are produced by any input source (keyboard, touch, scripts).
/// Each action maps to one orchestrator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move the active tile one footprint step left
    MoveLeft,
    /// Move the active tile one footprint step right
    MoveRight,
    /// Move the active tile one footprint step down, locking it when blocked
    SoftDrop,
    /// Drop the active tile as far as it goes and lock it
    HardDrop,
    /// Slide the active tile to a tile column (0-based) and hard drop it
    DropToColumn(u8),
    /// Toggle pause state
    Pause,
    /// Restart the game
    Restart,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    ///
    /// Drop-to-column actions are written as `dropToColumn:<column>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use drop_merge_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("down"), Some(GameAction::SoftDrop));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if let Some(column) = lower.strip_prefix("droptocolumn:") {
            let column: u8 = column.parse().ok()?;
            return (column < COLUMN_COUNT).then_some(GameAction::DropToColumn(column));
        }
        match lower.as_str() {
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "softdrop" | "down" => Some(GameAction::SoftDrop),
            "harddrop" | "drop" => Some(GameAction::HardDrop),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameAction::MoveLeft => f.write_str("moveLeft"),
            GameAction::MoveRight => f.write_str("moveRight"),
            GameAction::SoftDrop => f.write_str("softDrop"),
            GameAction::HardDrop => f.write_str("hardDrop"),
            GameAction::DropToColumn(column) => write!(f, "dropToColumn:{}", column),
            GameAction::Pause => f.write_str("pause"),
            GameAction::Restart => f.write_str("restart"),
        }
    }
}
