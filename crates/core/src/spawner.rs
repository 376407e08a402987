//! Spawner module - weighted exponent generation with an unlock window
//!
//! The spawner draws the exponent of each new tile from a weighted distribution over
//! the currently unlocked tiers:
//!
//! - exponents 1 and 2 carry fixed base weights;
//! - each tier `k` with `3 <= k < max_unlocked` weighs
//!   `max(min_weight, weight(k - 1) * multiplier)`, so higher tiers get rare but never
//!   impossible;
//! - tiers below `min_tier = max(1, max_unlocked - window)` are excluded.
//!
//! Both bounds only move up (until [`Spawner::reset_unlocks`]). Identical seeds give
//! identical sequences, and previews never perturb them.

use arrayvec::ArrayVec;
use log::info;

use crate::board::Board;
use crate::config::{GameConfig, SpawnWeights};
use crate::rng::SimpleRng;
use crate::tile::TileId;

/// Highest exponent ever unlocked at game start
pub const INITIAL_MAX_UNLOCKED: u8 = 2;

/// Tier list capacity; exponents never exceed `u8` range in practice
const MAX_TIERS: usize = 64;

/// One spawnable exponent and its relative weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTier {
    pub k: u8,
    pub weight: f64,
}

/// Seeded tile exponent generator
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SimpleRng,
    weights: SpawnWeights,
    window_size: u8,
    max_unlocked: u8,
    min_tier: u8,
}

impl Spawner {
    /// Create a spawner with default weights
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, &GameConfig::default())
    }

    pub fn with_config(seed: u32, config: &GameConfig) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            weights: config.spawn_weights,
            window_size: config.tier_window_size.max(1),
            max_unlocked: INITIAL_MAX_UNLOCKED,
            min_tier: 1,
        }
    }

    /// Restart the random sequence
    pub fn set_seed(&mut self, seed: u32) {
        self.rng.set_seed(seed);
    }

    pub fn max_unlocked_exponent(&self) -> u8 {
        self.max_unlocked
    }

    pub fn min_tier_exponent(&self) -> u8 {
        self.min_tier
    }

    /// Raise the unlock ceiling to `max_k` if higher
    ///
    /// Returns true when the window floor moved up, i.e. tiles below
    /// [`Spawner::min_tier_exponent`] should now leave the board.
    pub fn update_max_tile(&mut self, max_k: u8) -> bool {
        if max_k > self.max_unlocked {
            self.max_unlocked = max_k;
            info!("max unlocked exponent raised to k={}", max_k);
        }

        let floor = self.max_unlocked.saturating_sub(self.window_size).max(1);
        if floor > self.min_tier {
            info!("tier floor raised from k={} to k={}", self.min_tier, floor);
            self.min_tier = floor;
            return true;
        }
        false
    }

    /// Clamp a previously drawn exponent up to the current window floor
    pub fn validate_exponent(&self, k: u8) -> u8 {
        k.max(self.min_tier)
    }

    /// Back to the new-game window (exponents 1 and 2)
    pub fn reset_unlocks(&mut self) {
        self.max_unlocked = INITIAL_MAX_UNLOCKED;
        self.min_tier = 1;
    }

    /// Currently spawnable tiers, ascending by exponent
    pub fn unlocked_tiers(&self) -> ArrayVec<SpawnTier, MAX_TIERS> {
        let mut tiers = ArrayVec::new();
        let mut push = |k: u8, weight: f64| {
            if k >= self.min_tier && !tiers.is_full() {
                tiers.push(SpawnTier { k, weight });
            }
        };

        push(1, self.weights.base2);
        push(2, self.weights.base4);

        let mut weight = self.weights.base4;
        for k in 3..self.max_unlocked {
            weight = (weight * self.weights.tier_multiplier).max(self.weights.min_weight);
            push(k, weight);
        }
        tiers
    }

    /// Draw the next exponent, advancing the RNG
    pub fn next_exponent(&mut self) -> u8 {
        let tiers = self.unlocked_tiers();
        let Some(last) = tiers.last() else {
            return self.min_tier;
        };

        let total: f64 = tiers.iter().map(|t| t.weight).sum();
        let roll = self.rng.next_f64() * total;
        let mut cumulative = 0.0;
        for tier in &tiers {
            cumulative += tier.weight;
            if roll < cumulative {
                return tier.k;
            }
        }
        last.k
    }

    /// What [`Spawner::next_exponent`] would return, without consuming it
    pub fn preview_next_exponent(&mut self) -> u8 {
        let saved = self.rng.state();
        let k = self.next_exponent();
        self.rng.set_state(saved);
        k
    }

    /// Allocate an unplaced tile with a freshly drawn exponent
    pub fn create_tile(&mut self, board: &mut Board, x: i8, y: i8) -> TileId {
        let k = self.next_exponent();
        board.create_tile(k, x, y)
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(1)
    }
}
