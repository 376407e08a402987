//! RNG module - seeded, restartable random source
//!
//! A small LCG is enough for spawn weighting and keeps every game reproducible
//! from its seed. The full generator state is a single `u32`, so callers can save
//! and restore it to look ahead without consuming draws.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            state: Self::normalize(seed),
        }
    }

    // Avoid 0 seed which would degenerate the sequence
    fn normalize(seed: u32) -> u32 {
        if seed == 0 {
            1
        } else {
            seed
        }
    }

    /// Restart the sequence from a new seed
    pub fn set_seed(&mut self, seed: u32) {
        self.state = Self::normalize(seed);
    }

    /// Current generator state
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Restore a state previously obtained from [`SimpleRng::state`]
    pub fn set_state(&mut self, state: u32) {
        self.state = state;
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate a float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Generate an integer in the inclusive range [min, max]
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max as i64 - min as i64 + 1) as f64;
        min + (self.next_f64() * span) as i32
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_f64_unit_interval() {
        let mut rng = SimpleRng::new(42);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "{} out of range", v);
        }
    }

    #[test]
    fn test_next_int_inclusive() {
        let mut rng = SimpleRng::new(456);
        let mut seen = [false; 5];
        for _ in 0..200 {
            let v = rng.next_int(1, 5);
            assert!((1..=5).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(rng.next_int(7, 7), 7);
    }

    #[test]
    fn test_state_save_restore() {
        let mut rng = SimpleRng::new(100);
        rng.next_u32();
        let saved = rng.state();
        let a = rng.next_u32();
        rng.set_state(saved);
        assert_eq!(rng.next_u32(), a);
    }

    #[test]
    fn test_set_seed_restarts_sequence() {
        let mut rng = SimpleRng::new(100);
        rng.next_u32();
        rng.set_seed(200);
        let mut fresh = SimpleRng::new(200);
        assert_eq!(rng.next_u32(), fresh.next_u32());
    }
}
