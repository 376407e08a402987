//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the board, the tiles, and the merge/gravity resolution
//! engine. It has **no dependencies** on rendering, input, or timing, making it:
//!
//! - **Deterministic**: the same seed and the same moves produce the same game
//! - **Testable**: every rule is a synchronous function over in-memory state
//! - **Total**: illegal moves and stale tiles are reported as `false`/`None`, never
//!   as errors
//!
//! # Module Structure
//!
//! - [`board`]: 10-column grid with a hidden spawn buffer and atomic 2x2 footprints
//! - [`tile`]: numbered tiles and their generational arena
//! - [`physics`]: movement legality, neighbor detection, merges, gravity, and
//!   full-board stabilization
//! - [`resolver`]: step-by-step turn resolution (priority tile, then cascade)
//! - [`spawner`]: seeded weighted exponent generation with an unlock window
//! - [`rng`]: small restartable LCG
//! - [`scoring`]: points per merge with multi-merge and combo multipliers
//! - [`config`]: JSON configuration with defaults
//!
//! # Game Rules
//!
//! - **Tiles**: each tile shows `2^k` and covers 2x2 cells
//! - **Merging**: a tile absorbs all equal orthogonal neighbors at once; absorbing N
//!   tiles raises `k` by N
//! - **Gravity**: tiles fall in whole-tile steps, lowest first
//! - **Priority**: the tile that just locked resolves completely before the rest of
//!   the board cascades
//!
//! # Example
//!
//! ```
//! use drop_merge_core::{physics, Board};
//!
//! let mut board = Board::default();
//! let a = board.create_tile(2, 4, 4);
//! let b = board.create_tile(2, 4, 6);
//! assert!(board.place_tile(a));
//! assert!(board.place_tile(b));
//!
//! let merge = physics::try_merge(&mut board, a).unwrap();
//! assert_eq!(merge.tiles_absorbed(), 1);
//! assert_eq!(merge.new_exponent, 3);
//! assert_eq!(merge.base_points, 8);
//! ```

pub mod board;
pub mod config;
pub mod physics;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod spawner;
pub mod tile;

pub use drop_merge_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardGeometry};
pub use config::{ConfigError, GameConfig, SpawnWeights};
pub use physics::{AbsorbedTile, MergeResult, Neighbors, ResolutionResult, Side};
pub use resolver::{ResolveStep, Resolver};
pub use rng::SimpleRng;
pub use scoring::calculate_points;
pub use spawner::{SpawnTier, Spawner};
pub use tile::{Tile, TileId};
