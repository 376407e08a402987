//! Turn orchestration - drives the core engine through complete turns
//!
//! The core crate answers "what does the board look like after this move"; this
//! crate decides when moves happen. It owns the falling tile, timed gravity, the
//! busy gate during resolution, scoring, tier eviction and game over.
//!
//! # Module Structure
//!
//! - [`game`]: [`Game`], the synchronous, deterministic turn state machine
//! - [`event`]: [`TurnEvent`], what happened, for playback and logging
//! - [`snapshot`]: serializable view of a game
//! - [`service`]: a tokio task that owns a game and serves it over channels
//!
//! # Example
//!
//! ```
//! use drop_merge_engine::{Game, GameStatus};
//! use drop_merge_engine::core::{types::GameAction, GameConfig};
//!
//! let mut game = Game::new(GameConfig::default(), 12345);
//! game.start();
//! assert!(game.apply_action(GameAction::HardDrop));
//! assert_eq!(game.status(), GameStatus::Resolving);
//!
//! game.resolve_all();
//! assert_eq!(game.status(), GameStatus::Playing);
//! assert_eq!(game.turn(), 1);
//! ```

pub mod event;
pub mod game;
pub mod service;
pub mod snapshot;

pub use drop_merge_core as core;

pub use event::{RemovedTile, TurnEvent};
pub use game::{Game, GameStatus};
pub use service::{spawn_game, spawn_game_with, GameCommand, GameHandle, ServiceConfig};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
