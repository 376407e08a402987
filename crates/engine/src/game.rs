//! Game module - the turn orchestrator
//!
//! [`Game`] owns the board, the spawner and the falling tile. A turn runs:
//!
//! 1. spawn a tile at the spawn row (or end the game when the spot is taken);
//! 2. the player moves it, or timed gravity drops it, until it locks;
//! 3. resolution plays out one discrete step at a time (`Resolving` blocks input);
//! 4. the tier window is updated, tiles below its floor are evicted and the board
//!    settles again;
//! 5. back to 1.
//!
//! Every transition is recorded as a [`TurnEvent`]; drain them with
//! [`Game::drain_events`].

use log::{debug, info};
use serde::Serialize;

use crate::core::physics::{self, Side};
use crate::core::tile::exponent_value;
use crate::core::types::{
    GameAction, COLUMN_COUNT, FALL_STEP_MS, GRAVITY_INTERVAL_MS, MERGE_ANIMATION_MS,
    MERGE_PAUSE_MS, SOFT_DROP_INTERVAL_MS, SPAWN_X, SPAWN_Y, TILE_SIZE,
};
use crate::core::{
    calculate_points, Board, GameConfig, ResolveStep, Resolver, Spawner, Tile, TileId,
};
use crate::event::{RemovedTile, TurnEvent};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};

/// Where the game is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// A tile is falling and accepts input
    Playing,
    Paused,
    /// Resolution is playing out; player input is rejected
    Resolving,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    spawner: Spawner,
    seed: u32,
    status: GameStatus,
    started: bool,
    active: Option<TileId>,
    next_k: u8,
    /// Column of the last locked tile; the next spawn reuses it
    spawn_x: i8,
    score: u64,
    highest_k: u8,
    /// Merges since the last spawn
    combo: u32,
    /// Locked tiles since the start of the game
    turn: u32,
    gravity_timer_ms: u32,
    resolver: Option<Resolver>,
    /// Remaining playback time of the last resolution step
    step_delay_ms: u32,
    events: Vec<TurnEvent>,
}

impl Game {
    /// Create a game; call [`Game::start`] to spawn the first tile
    pub fn new(config: GameConfig, seed: u32) -> Self {
        let mut spawner = Spawner::with_config(seed, &config);
        let next_k = spawner.next_exponent();

        Self {
            config,
            board: Board::new(config.board_geometry()),
            spawner,
            seed,
            status: GameStatus::Playing,
            started: false,
            active: None,
            next_k,
            spawn_x: SPAWN_X as i8,
            score: 0,
            highest_k: 1,
            combo: 0,
            turn: 0,
            gravity_timer_ms: 0,
            resolver: None,
            step_delay_ms: 0,
            events: Vec::new(),
        }
    }

    /// Start the game and spawn the first tile
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_tile();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// True while resolution is in progress and input is gated
    pub fn is_busy(&self) -> bool {
        self.status == GameStatus::Resolving
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Value of the highest tile ever reached this game
    pub fn highest_value(&self) -> u64 {
        exponent_value(self.highest_k)
    }

    /// Exponent of the tile that spawns next
    pub fn next_exponent(&self) -> u8 {
        self.next_k
    }

    pub fn active_id(&self) -> Option<TileId> {
        self.active
    }

    /// The falling tile, if any
    pub fn active(&self) -> Option<Tile> {
        self.active.and_then(|id| self.board.tile(id).copied())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board (for tests and scripted setups)
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Take every event recorded since the last call
    pub fn drain_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.exponent_rows(),
            active: self.active().map(|tile| ActiveSnapshot {
                k: tile.exponent(),
                x: tile.x(),
                y: Board::to_visible_y(tile.y()),
            }),
            next_k: self.next_k,
            status: self.status,
            score: self.score,
            combo: self.combo,
            highest_value: self.highest_value(),
            max_unlocked: self.spawner.max_unlocked_exponent(),
            min_tier: self.spawner.min_tier_exponent(),
            turn: self.turn,
            seed: self.seed,
        }
    }

    /// Spawn the next tile at the spawn row, or end the game if it is blocked
    fn spawn_tile(&mut self) -> bool {
        let x = self.spawn_x;
        let y = SPAWN_Y as i8;
        if !self.board.can_place_tile(x, y) {
            self.end_game();
            return false;
        }

        let k = self.spawner.validate_exponent(self.next_k);
        let id = self.board.create_tile(k, x, y);
        self.next_k = self.spawner.next_exponent();
        self.active = Some(id);
        self.combo = 0;
        self.gravity_timer_ms = 0;
        self.status = GameStatus::Playing;

        debug!("spawned {} with k={} at ({}, {})", id, k, x, y);
        self.events.push(TurnEvent::Spawned {
            tile: id,
            k,
            x,
            y,
            next_k: self.next_k,
        });
        true
    }

    fn end_game(&mut self) {
        self.status = GameStatus::GameOver;
        self.active = None;
        info!(
            "game over after {} turns: score {}, highest tile {}",
            self.turn,
            self.score,
            self.highest_value()
        );
        self.events.push(TurnEvent::GameOver {
            score: self.score,
            highest_value: self.highest_value(),
        });
    }

    /// Move the active tile one step; no event when blocked
    fn try_shift(&mut self, side: Side) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        if !physics::shift(&mut self.board, id, side) {
            return false;
        }
        self.push_moved(id);
        true
    }

    fn push_moved(&mut self, id: TileId) {
        if let Some(tile) = self.board.tile(id) {
            self.events.push(TurnEvent::Moved {
                tile: id,
                x: tile.x(),
                y: tile.y(),
            });
        }
    }

    fn hard_drop(&mut self) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        if physics::hard_drop(&mut self.board, id) > 0 {
            self.push_moved(id);
        }
        self.lock_active();
        true
    }

    /// Slide towards a tile column, stopping at obstructions, then hard drop
    fn drop_to_column(&mut self, column: u8) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        if column >= COLUMN_COUNT {
            return false;
        }
        let target = (column * TILE_SIZE) as i8;

        let mut moved = false;
        loop {
            let Some(x) = self.board.tile(id).map(Tile::x) else {
                return false;
            };
            let side = match x.cmp(&target) {
                std::cmp::Ordering::Less => Side::Right,
                std::cmp::Ordering::Greater => Side::Left,
                std::cmp::Ordering::Equal => break,
            };
            if !physics::shift(&mut self.board, id, side) {
                break;
            }
            moved = true;
        }
        if moved {
            self.push_moved(id);
        }
        self.hard_drop()
    }

    /// Put the active tile on the board and start resolving from it
    fn lock_active(&mut self) {
        let Some(id) = self.active.take() else {
            return;
        };
        let Some(&tile) = self.board.tile(id) else {
            return;
        };

        self.turn = self.turn.wrapping_add(1);
        self.spawn_x = tile.x();
        self.gravity_timer_ms = 0;

        if !self.board.place_tile(id) {
            // Moves are checked before they happen, so this means the board was
            // edited underneath the tile.
            self.board.release_tile(id);
            self.finish_resolution();
            return;
        }

        debug!("locked {} at ({}, {})", id, tile.x(), tile.y());
        self.events.push(TurnEvent::Locked {
            tile: id,
            x: tile.x(),
            y: tile.y(),
        });
        self.status = GameStatus::Resolving;
        self.resolver = Some(Resolver::new(id));
        self.step_delay_ms = 0;
    }

    /// Apply a game action
    ///
    /// Returns false when the action had no effect or was rejected (wrong status,
    /// blocked move).
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if !self.started {
            return false;
        }

        match action {
            GameAction::Restart => {
                if self.is_busy() {
                    return false;
                }
                self.restart(self.seed);
                true
            }
            GameAction::Pause => match self.status {
                GameStatus::Playing => {
                    self.status = GameStatus::Paused;
                    self.events.push(TurnEvent::Paused);
                    true
                }
                GameStatus::Paused => {
                    self.status = GameStatus::Playing;
                    self.events.push(TurnEvent::Resumed);
                    true
                }
                GameStatus::Resolving | GameStatus::GameOver => false,
            },
            _ if self.status != GameStatus::Playing => false,
            GameAction::MoveLeft => self.try_shift(Side::Left),
            GameAction::MoveRight => self.try_shift(Side::Right),
            GameAction::SoftDrop => {
                if !self.try_shift(Side::Down) {
                    self.lock_active();
                }
                self.gravity_timer_ms = 0;
                true
            }
            GameAction::HardDrop => self.hard_drop(),
            GameAction::DropToColumn(column) => self.drop_to_column(column),
        }
    }

    /// Advance timers by `elapsed_ms`
    ///
    /// While playing this runs timed gravity (a blocked fall locks the tile). While
    /// resolving it plays back one resolution step whenever the previous step's
    /// delay has elapsed. Returns true when something changed.
    pub fn tick(&mut self, elapsed_ms: u32, soft_drop: bool) -> bool {
        if !self.started {
            return false;
        }

        match self.status {
            GameStatus::Playing => {
                let interval = if soft_drop {
                    SOFT_DROP_INTERVAL_MS
                } else {
                    GRAVITY_INTERVAL_MS
                };
                self.gravity_timer_ms = self.gravity_timer_ms.saturating_add(elapsed_ms);
                if self.gravity_timer_ms < interval {
                    return false;
                }
                self.gravity_timer_ms = 0;
                if !self.try_shift(Side::Down) {
                    self.lock_active();
                }
                true
            }
            GameStatus::Resolving => {
                if self.step_delay_ms > elapsed_ms {
                    self.step_delay_ms -= elapsed_ms;
                    return false;
                }
                self.step_delay_ms = 0;
                self.step_resolution()
            }
            GameStatus::Paused | GameStatus::GameOver => false,
        }
    }

    /// Perform one resolution step, or finish the turn once the board is stable
    pub fn step_resolution(&mut self) -> bool {
        let Some(resolver) = self.resolver.as_mut() else {
            return false;
        };
        match resolver.step(&mut self.board) {
            Some(step) => self.record_step(step),
            None => {
                self.resolver = None;
                self.finish_resolution();
            }
        }
        true
    }

    /// Play out the whole resolution at once, ignoring pacing
    pub fn resolve_all(&mut self) {
        while self.status == GameStatus::Resolving {
            if !self.step_resolution() {
                // Resolving without a resolver cannot make progress
                self.finish_resolution();
            }
        }
        self.step_delay_ms = 0;
    }

    fn record_step(&mut self, step: ResolveStep) {
        match step {
            ResolveStep::Merged(merge) => {
                self.combo += 1;
                let points =
                    calculate_points(merge.base_points, merge.tiles_absorbed(), self.combo);
                self.score = self.score.saturating_add(points);
                self.highest_k = self.highest_k.max(merge.new_exponent);
                self.step_delay_ms = MERGE_PAUSE_MS + MERGE_ANIMATION_MS;

                self.events.push(TurnEvent::Merged {
                    tile: merge.upgraded,
                    new_k: merge.new_exponent,
                    absorbed: merge.absorbed.iter().copied().map(RemovedTile::from).collect(),
                    base_points: merge.base_points,
                    points,
                    combo: self.combo,
                });
            }
            ResolveStep::Fell { id, from_y, to_y } => {
                self.step_delay_ms = FALL_STEP_MS;
                self.events.push(TurnEvent::Fell {
                    tile: id,
                    from_y,
                    to_y,
                });
            }
            ResolveStep::Settled { moved } => {
                self.step_delay_ms = FALL_STEP_MS;
                self.events.push(TurnEvent::Settled { moved });
            }
        }
    }

    /// Update the tier window, evict what fell out of it, then spawn
    fn finish_resolution(&mut self) {
        let max_k = self.board.max_exponent().unwrap_or(1);
        self.highest_k = self.highest_k.max(max_k);

        let before = (
            self.spawner.max_unlocked_exponent(),
            self.spawner.min_tier_exponent(),
        );
        let floor_raised = self.spawner.update_max_tile(max_k);
        let after = (
            self.spawner.max_unlocked_exponent(),
            self.spawner.min_tier_exponent(),
        );
        if after != before {
            self.events.push(TurnEvent::TiersUnlocked {
                max_unlocked: after.0,
                min_tier: after.1,
            });
        }

        if floor_raised {
            let removed = self.evict_below(after.1);
            if !removed.is_empty() {
                info!("evicted {} tile(s) below k={}", removed.len(), after.1);
                self.events.push(TurnEvent::TierEvicted { removed });
                self.status = GameStatus::Resolving;
                self.resolver = Some(Resolver::cascade());
                return;
            }
        }

        self.spawn_tile();
    }

    /// Release every placed tile whose exponent is below `min_k`
    fn evict_below(&mut self, min_k: u8) -> Vec<RemovedTile> {
        let doomed: Vec<RemovedTile> = self
            .board
            .distinct_tiles()
            .into_iter()
            .filter_map(|id| {
                let tile = self.board.tile(id)?;
                (tile.exponent() < min_k).then(|| RemovedTile {
                    tile: id,
                    k: tile.exponent(),
                    x: tile.x(),
                    y: tile.y(),
                })
            })
            .collect();

        for removed in &doomed {
            self.board.release_tile(removed.tile);
        }
        doomed
    }

    /// Start over with a fresh board and the given seed
    pub fn restart(&mut self, seed: u32) {
        self.board.clear();
        self.spawner.set_seed(seed);
        self.spawner.reset_unlocks();
        self.seed = seed;
        self.next_k = self.spawner.next_exponent();
        self.active = None;
        self.spawn_x = SPAWN_X as i8;
        self.score = 0;
        self.highest_k = 1;
        self.combo = 0;
        self.turn = 0;
        self.gravity_timer_ms = 0;
        self.resolver = None;
        self.step_delay_ms = 0;
        self.status = GameStatus::Playing;
        self.started = true;

        info!("restarting with seed {}", seed);
        self.events.push(TurnEvent::Restarted { seed });
        self.spawn_tile();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default(), 1)
    }
}
