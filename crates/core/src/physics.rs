//! Physics module - movement legality, merges and gravity
//!
//! Everything here is synchronous and operates directly on a [`Board`]:
//!
//! - **Legality**: a tile may shift by one footprint step when every destination cell
//!   is in bounds and either empty or already held by the tile itself.
//! - **Merging**: a tile absorbs *all* orthogonal neighbors that share its exponent at
//!   once; each absorbed neighbor raises the exponent by one.
//! - **Gravity**: tiles fall one footprint step at a time, lowest first, until a full
//!   sweep moves nothing.
//! - **Stabilization**: merge passes and gravity passes alternate, merge first, until
//!   an iteration changes nothing.
//!
//! Operations on a tile that is no longer at its recorded position (released, or
//! never placed) are no-ops.

use arrayvec::ArrayVec;
use log::{debug, trace};

use crate::board::Board;
use crate::tile::{exponent_value, Tile, TileId};
use crate::types::TILE_SIZE;

/// One of the four orthogonal directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Down,
    Left,
    Right,
    Up,
}

impl Side {
    /// Probe order used when collecting neighbors
    pub const ALL: [Side; 4] = [Side::Down, Side::Left, Side::Right, Side::Up];

    /// Offset of one footprint step in this direction
    pub fn step(self) -> (i8, i8) {
        let s = TILE_SIZE as i8;
        match self {
            Side::Down => (0, s),
            Side::Left => (-s, 0),
            Side::Right => (s, 0),
            Side::Up => (0, -s),
        }
    }
}

/// First distinct tile found on each side of a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub down: Option<TileId>,
    pub left: Option<TileId>,
    pub right: Option<TileId>,
    pub up: Option<TileId>,
}

impl Neighbors {
    pub fn get(&self, side: Side) -> Option<TileId> {
        match side {
            Side::Down => self.down,
            Side::Left => self.left,
            Side::Right => self.right,
            Side::Up => self.up,
        }
    }

    /// Present neighbors in probe order (down, left, right, up)
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        Side::ALL.into_iter().filter_map(|side| self.get(side))
    }
}

/// A neighbor consumed by a merge, with where it stood before removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsorbedTile {
    pub id: TileId,
    pub k: u8,
    pub from_x: i8,
    pub from_y: i8,
}

/// Outcome of one successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// The tile that absorbed its neighbors (still on the board)
    pub upgraded: TileId,
    /// Exponent of the upgraded tile after the merge
    pub new_exponent: u8,
    /// Removed neighbors; their ids are already stale
    pub absorbed: ArrayVec<AbsorbedTile, 4>,
    /// `2^new_exponent`
    pub base_points: u64,
}

impl MergeResult {
    pub fn tiles_absorbed(&self) -> u32 {
        self.absorbed.len() as u32
    }
}

/// Merges produced by a board-wide pass or a full stabilization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    pub merges: Vec<MergeResult>,
    pub total_points: u64,
}

impl ResolutionResult {
    fn push(&mut self, merge: MergeResult) {
        self.total_points = self.total_points.saturating_add(merge.base_points);
        self.merges.push(merge);
    }

    fn extend(&mut self, other: ResolutionResult) {
        self.total_points = self.total_points.saturating_add(other.total_points);
        self.merges.extend(other.merges);
    }
}

/// Check whether a tile could shift one footprint step towards `side`
///
/// Cells held by the tile itself do not block it, so this works for placed tiles
/// as well as for the active tile that is not on the grid yet.
pub fn can_move(board: &Board, id: TileId, side: Side) -> bool {
    let Some(tile) = board.tile(id) else {
        return false;
    };
    let (dx, dy) = side.step();
    let (nx, ny) = (tile.x + dx, tile.y + dy);
    let size = TILE_SIZE as i8;

    (0..size).all(|oy| {
        (0..size).all(|ox| {
            let (cx, cy) = (nx + ox, ny + oy);
            board.is_in_bounds(cx, cy) && board.get(cx, cy).map_or(true, |other| other == id)
        })
    })
}

pub fn can_move_down(board: &Board, id: TileId) -> bool {
    can_move(board, id, Side::Down)
}

pub fn can_move_left(board: &Board, id: TileId) -> bool {
    can_move(board, id, Side::Left)
}

pub fn can_move_right(board: &Board, id: TileId) -> bool {
    can_move(board, id, Side::Right)
}

/// Shift a tile one footprint step if legal
///
/// A placed tile is moved with remove + place so the footprint stays whole; a tile
/// that is not on the grid only has its position updated.
pub fn shift(board: &mut Board, id: TileId, side: Side) -> bool {
    if !can_move(board, id, side) {
        return false;
    }
    let Some(&tile) = board.tile(id) else {
        return false;
    };
    let (dx, dy) = side.step();
    let placed = board.is_at_recorded_position(id);

    if placed {
        board.remove_tile_from_grid(id);
    }
    board.set_tile_position(id, tile.x + dx, tile.y + dy);
    if placed && !board.place_tile(id) {
        // Unreachable after a successful legality check; put the tile back.
        board.set_tile_position(id, tile.x, tile.y);
        board.place_tile(id);
        return false;
    }
    true
}

/// Let a placed tile fall one footprint step
pub fn fall_step(board: &mut Board, id: TileId) -> bool {
    if !board.is_at_recorded_position(id) {
        return false;
    }
    let moved = shift(board, id, Side::Down);
    if moved {
        trace!("tile {} fell to row {}", id, board.tile(id).map_or(-1, Tile::y));
    }
    moved
}

/// Drop a tile as far as it can fall; returns the number of steps taken
pub fn hard_drop(board: &mut Board, id: TileId) -> u32 {
    let mut distance = 0;
    while shift(board, id, Side::Down) {
        distance += 1;
    }
    distance
}

/// First occupant of `cells` that is not the tile itself
fn first_other(board: &Board, id: TileId, cells: impl Iterator<Item = (i8, i8)>) -> Option<TileId> {
    cells
        .filter_map(|(x, y)| board.get(x, y))
        .find(|&other| other != id)
}

/// Probe the row/column of cells just outside each edge of the tile
pub fn neighbors(board: &Board, id: TileId) -> Neighbors {
    let Some(&tile) = board.tile(id) else {
        return Neighbors::default();
    };
    let size = TILE_SIZE as i8;
    let (x, y) = tile.position();

    Neighbors {
        down: first_other(board, id, (0..size).map(|dx| (x + dx, y + size))),
        left: first_other(board, id, (0..size).map(|dy| (x - 1, y + dy))),
        right: first_other(board, id, (0..size).map(|dy| (x + size, y + dy))),
        up: first_other(board, id, (0..size).map(|dx| (x + dx, y - 1))),
    }
}

/// Absorb every orthogonal neighbor with the same exponent
///
/// Returns None when the tile is not on the board or nothing matches. Absorbed
/// neighbors are released; the surviving tile's exponent grows by the number of
/// tiles absorbed.
pub fn try_merge(board: &mut Board, id: TileId) -> Option<MergeResult> {
    if !board.is_at_recorded_position(id) {
        return None;
    }
    let k = board.tile(id)?.exponent();

    let mut absorbed: ArrayVec<AbsorbedTile, 4> = ArrayVec::new();
    for other in neighbors(board, id).iter() {
        let Some(&tile) = board.tile(other) else {
            continue;
        };
        if tile.exponent() == k && absorbed.iter().all(|a| a.id != other) {
            absorbed.push(AbsorbedTile {
                id: other,
                k: tile.exponent(),
                from_x: tile.x,
                from_y: tile.y,
            });
        }
    }

    if absorbed.is_empty() {
        return None;
    }

    for info in &absorbed {
        board.release_tile(info.id);
    }

    let new_exponent = k.saturating_add(absorbed.len() as u8);
    if let Some(tile) = board.tile_mut(id) {
        tile.k = new_exponent;
    }

    debug!(
        "tile {} absorbed {} neighbor(s): k {} -> {}",
        id,
        absorbed.len(),
        k,
        new_exponent
    );

    Some(MergeResult {
        upgraded: id,
        new_exponent,
        absorbed,
        base_points: exponent_value(new_exponent),
    })
}

fn sorted_tiles(board: &Board, key: impl Fn(&Tile) -> (i16, i16)) -> Vec<TileId> {
    let mut ids = board.distinct_tiles();
    ids.sort_by_key(|&id| board.tile(id).map(&key).unwrap_or((i16::MAX, i16::MAX)));
    ids
}

/// Apply gravity until a full sweep moves nothing
///
/// Tiles are visited bottom to top so lower tiles vacate space first. Returns every
/// tile that moved, once per step taken (duplicates included).
pub fn apply_gravity(board: &mut Board) -> Vec<TileId> {
    let mut moved_tiles = Vec::new();

    loop {
        let mut moved = false;
        for id in sorted_tiles(board, |t| (-(t.y as i16), 0)) {
            if fall_step(board, id) {
                moved_tiles.push(id);
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }

    moved_tiles
}

/// One merge attempt per tile, top to bottom then left to right
pub fn merge_pass(board: &mut Board) -> ResolutionResult {
    let mut result = ResolutionResult::default();
    for id in sorted_tiles(board, |t| (t.y as i16, t.x as i16)) {
        // Skip tiles consumed earlier in this pass
        if !board.is_at_recorded_position(id) {
            continue;
        }
        if let Some(merge) = try_merge(board, id) {
            result.push(merge);
        }
    }
    result
}

/// Alternate merge and gravity passes until the board is stable
pub fn resolve_board(board: &mut Board) -> ResolutionResult {
    let mut result = ResolutionResult::default();

    loop {
        let pass = merge_pass(board);
        let merged = !pass.merges.is_empty();
        result.extend(pass);

        let moved = !apply_gravity(board).is_empty();
        if !merged && !moved {
            break;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(board: &mut Board, k: u8, x: i8, y: i8) -> TileId {
        let id = board.create_tile(k, x, y);
        assert!(board.place_tile(id), "could not place k={} at ({}, {})", k, x, y);
        id
    }

    #[test]
    fn test_side_steps() {
        assert_eq!(Side::Down.step(), (0, 2));
        assert_eq!(Side::Left.step(), (-2, 0));
        assert_eq!(Side::Right.step(), (2, 0));
        assert_eq!(Side::Up.step(), (0, -2));
    }

    #[test]
    fn test_self_does_not_block() {
        let mut board = Board::default();
        let id = placed(&mut board, 1, 4, 4);
        assert!(can_move_down(&board, id));
        assert!(shift(&mut board, id, Side::Down));
        assert_eq!(board.tile(id).map(Tile::position), Some((4, 6)));
        assert_eq!(board.all_tiles().len(), 4);
        assert_eq!(board.get(4, 4), None);
        assert_eq!(board.get(5, 7), Some(id));
    }

    #[test]
    fn test_unplaced_tile_moves_without_touching_grid() {
        let mut board = Board::default();
        let id = board.create_tile(1, 4, 2);
        assert!(shift(&mut board, id, Side::Left));
        assert_eq!(board.tile(id).map(Tile::position), Some((2, 2)));
        assert!(board.all_tiles().is_empty());
        // Not on the grid, so it cannot merge or take a gravity step
        assert!(!fall_step(&mut board, id));
        assert!(try_merge(&mut board, id).is_none());
    }

    #[test]
    fn test_neighbors_each_side() {
        let mut board = Board::default();
        let center = placed(&mut board, 1, 4, 6);
        let down = placed(&mut board, 2, 4, 8);
        let left = placed(&mut board, 3, 2, 6);
        let right = placed(&mut board, 4, 6, 6);
        let up = placed(&mut board, 5, 4, 4);

        let n = neighbors(&board, center);
        assert_eq!(n.down, Some(down));
        assert_eq!(n.left, Some(left));
        assert_eq!(n.right, Some(right));
        assert_eq!(n.up, Some(up));
        assert_eq!(n.iter().collect::<Vec<_>>(), vec![down, left, right, up]);
    }

    #[test]
    fn test_merge_absorbs_all_matching() {
        let mut board = Board::default();
        let center = placed(&mut board, 2, 4, 6);
        placed(&mut board, 2, 4, 8);
        placed(&mut board, 2, 2, 6);
        placed(&mut board, 2, 6, 6);
        placed(&mut board, 3, 4, 4);

        let result = try_merge(&mut board, center).unwrap();
        assert_eq!(result.tiles_absorbed(), 3);
        assert_eq!(result.new_exponent, 5);
        assert_eq!(result.base_points, 32);
        assert_eq!(board.tile(center).map(Tile::exponent), Some(5));
        assert_eq!(board.tile_count(), 2);
        assert!(result.absorbed.iter().all(|a| board.tile(a.id).is_none()));
    }

    #[test]
    fn test_gravity_is_bottom_first() {
        let mut board = Board::default();
        let top = placed(&mut board, 1, 0, 2);
        let bottom = placed(&mut board, 2, 0, 4);
        let moved = apply_gravity(&mut board);
        assert!(moved.contains(&top) && moved.contains(&bottom));
        assert_eq!(board.tile(bottom).map(Tile::y), Some(12));
        assert_eq!(board.tile(top).map(Tile::y), Some(10));
    }
}
