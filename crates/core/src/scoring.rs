//! Scoring module - points awarded per merge
//!
//! A merge is worth its base points (the upgraded tile's value) times two bonuses:
//!
//! - **Multi-merge**: absorbing N tiles at once multiplies by N.
//! - **Combo**: the n-th merge since the last spawn multiplies by `1 + 0.5 * (n - 1)`
//!   (1x, 1.5x, 2x, 2.5x, ...).
//!
//! The result is floored. Everything is computed in integers.

use crate::types::COMBO_DENOMINATOR;

/// Points for one merge
///
/// `combo_index` is 1 for the first merge after a spawn; 0 is treated as 1.
///
/// ```
/// use drop_merge_core::calculate_points;
///
/// assert_eq!(calculate_points(8, 1, 1), 8);
/// assert_eq!(calculate_points(8, 1, 2), 12);
/// assert_eq!(calculate_points(32, 3, 3), 192);
/// ```
pub fn calculate_points(base_points: u64, tiles_absorbed: u32, combo_index: u32) -> u64 {
    let combo = combo_index.max(1) as u64;
    base_points
        .saturating_mul(tiles_absorbed as u64)
        .saturating_mul(combo + 1)
        / COMBO_DENOMINATOR
}

/// Combo multiplier as a float, for display
pub fn combo_multiplier(combo_index: u32) -> f64 {
    1.0 + 0.5 * (combo_index.max(1) - 1) as f64
}
