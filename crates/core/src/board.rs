//! Board module - manages the game grid
//!
//! The board is a 10-column grid whose height is the configured visible height plus
//! a hidden spawn buffer. Each cell holds at most one [`TileId`]; a tile covers a
//! `TILE_SIZE x TILE_SIZE` block, so every cell of that block refers to the same id.
//! Footprints are placed and removed as a unit: the board never holds a partial tile.
//!
//! Coordinates: (x, y) in grid space, x in 0..10 (left to right), y in 0..height
//! (top to bottom, row 0 is the top of the spawn buffer).
//! Uses a flat row-major vector for storage.

use std::collections::HashSet;

use crate::tile::{Tile, TileArena, TileId};
use crate::types::{
    BOARD_WIDTH, DEFAULT_VISIBLE_HEIGHT, MAX_VISIBLE_HEIGHT, SPAWN_BUFFER, TILE_SIZE,
};

/// Board dimensions supplied at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    /// Visible rows (the spawn buffer is added on top)
    pub visible_height: u8,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            visible_height: DEFAULT_VISIBLE_HEIGHT,
        }
    }
}

/// The game board with its tile store
#[derive(Debug, Clone)]
pub struct Board {
    geometry: BoardGeometry,
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: Vec<Option<TileId>>,
    tiles: TileArena,
}

impl Board {
    /// Create an empty board with the given geometry
    ///
    /// The visible height is clamped to [`MAX_VISIBLE_HEIGHT`] so every grid row
    /// fits in `i8`.
    pub fn new(geometry: BoardGeometry) -> Self {
        let geometry = BoardGeometry {
            visible_height: geometry.visible_height.min(MAX_VISIBLE_HEIGHT),
        };
        let height = geometry.visible_height as usize + SPAWN_BUFFER as usize;
        Self {
            geometry,
            cells: vec![None; BOARD_WIDTH as usize * height],
            tiles: TileArena::new(),
        }
    }

    /// Calculate flat index from grid-space (x, y)
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Total height in grid space (visible rows plus spawn buffer)
    pub fn height(&self) -> u8 {
        self.geometry.visible_height + SPAWN_BUFFER
    }

    pub fn visible_height(&self) -> u8 {
        self.geometry.visible_height
    }

    /// Convert a visible row to grid space
    pub fn to_grid_y(visible_y: i8) -> i8 {
        visible_y + SPAWN_BUFFER as i8
    }

    /// Convert a grid row to visible space (negative inside the spawn buffer)
    pub fn to_visible_y(grid_y: i8) -> i8 {
        grid_y - SPAWN_BUFFER as i8
    }

    /// Occupant of a grid-space cell; None when empty or out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<TileId> {
        self.index(x, y).and_then(|idx| self.cells[idx])
    }

    /// Occupant of a visible-space cell; the spawn buffer reads as empty
    pub fn get_visible(&self, x: i8, visible_y: i8) -> Option<TileId> {
        if visible_y < 0 || visible_y >= self.geometry.visible_height as i8 {
            return None;
        }
        self.get(x, Self::to_grid_y(visible_y))
    }

    /// Check if a grid-space cell is in bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        self.get(x, y).is_some()
    }

    /// Check if a grid-space cell exists (spawn buffer included)
    pub fn is_in_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < self.height() as i8
    }

    /// Check if a grid-space cell lies in the visible area (spawn buffer excluded)
    pub fn is_in_visible_bounds(&self, x: i8, y: i8) -> bool {
        self.is_in_bounds(x, y) && y >= SPAWN_BUFFER as i8
    }

    /// Cells covered by a footprint anchored at (x, y)
    fn footprint(x: i8, y: i8) -> impl Iterator<Item = (i8, i8)> {
        let size = TILE_SIZE as i8;
        (0..size).flat_map(move |dy| (0..size).map(move |dx| (x + dx, y + dy)))
    }

    /// True iff every footprint cell is in bounds and unoccupied
    pub fn can_place_tile(&self, x: i8, y: i8) -> bool {
        Self::footprint(x, y).all(|(cx, cy)| self.is_in_bounds(cx, cy) && !self.is_occupied(cx, cy))
    }

    /// Allocate a tile without putting it on the grid
    pub fn create_tile(&mut self, k: u8, x: i8, y: i8) -> TileId {
        self.tiles.insert(Tile::new(k, x, y))
    }

    /// Look up a live tile
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id)
    }

    /// Check whether the tile still sits where it thinks it is
    pub fn is_at_recorded_position(&self, id: TileId) -> bool {
        match self.tile(id) {
            Some(tile) => self.get(tile.x, tile.y) == Some(id),
            None => false,
        }
    }

    /// Occupy the whole footprint of a tile at its recorded position
    ///
    /// Returns false, without touching any cell, if a cell is out of bounds or
    /// taken by another tile.
    pub fn place_tile(&mut self, id: TileId) -> bool {
        let Some(&tile) = self.tile(id) else {
            return false;
        };

        // First check every cell
        for (cx, cy) in Self::footprint(tile.x, tile.y) {
            if !self.is_in_bounds(cx, cy) {
                return false;
            }
            match self.get(cx, cy) {
                Some(other) if other != id => return false,
                _ => {}
            }
        }

        // Then occupy them all
        for (cx, cy) in Self::footprint(tile.x, tile.y) {
            if let Some(idx) = self.index(cx, cy) {
                self.cells[idx] = Some(id);
            }
        }
        true
    }

    /// Clear every footprint cell still held by this tile
    pub fn remove_tile_from_grid(&mut self, id: TileId) {
        let Some(&tile) = self.tile(id) else {
            return;
        };
        for (cx, cy) in Self::footprint(tile.x, tile.y) {
            if let Some(idx) = self.index(cx, cy) {
                if self.cells[idx] == Some(id) {
                    self.cells[idx] = None;
                }
            }
        }
    }

    /// Remove a tile from the grid and destroy it
    pub fn release_tile(&mut self, id: TileId) -> Option<Tile> {
        self.remove_tile_from_grid(id);
        self.tiles.remove(id)
    }

    /// Relocate the tile anchored at (from_x, from_y) so it is anchored at (to_x, to_y)
    ///
    /// The move is all-or-nothing: on failure the tile stays where it was.
    pub fn move_tile(&mut self, from_x: i8, from_y: i8, to_x: i8, to_y: i8) -> bool {
        let Some(id) = self.get(from_x, from_y) else {
            return false;
        };
        if self.tile(id).map(Tile::position) != Some((from_x, from_y)) {
            return false;
        }

        self.remove_tile_from_grid(id);
        if !self.can_place_tile(to_x, to_y) {
            self.place_tile(id);
            return false;
        }
        self.set_tile_position(id, to_x, to_y);
        self.place_tile(id)
    }

    pub(crate) fn set_tile_position(&mut self, id: TileId, x: i8, y: i8) {
        if let Some(tile) = self.tile_mut(id) {
            tile.x = x;
            tile.y = y;
        }
    }

    /// Every occupied cell's tile id in row-major scan order
    ///
    /// A tile appears once per covered cell; use [`Board::distinct_tiles`] to
    /// deduplicate.
    pub fn all_tiles(&self) -> Vec<TileId> {
        self.cells.iter().flatten().copied().collect()
    }

    /// Each placed tile once, in order of first appearance in a row-major scan
    pub fn distinct_tiles(&self) -> Vec<TileId> {
        let mut seen = HashSet::new();
        self.cells
            .iter()
            .flatten()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Number of distinct tiles on the grid
    pub fn tile_count(&self) -> usize {
        self.distinct_tiles().len()
    }

    /// Highest exponent on the grid
    pub fn max_exponent(&self) -> Option<u8> {
        self.distinct_tiles()
            .into_iter()
            .filter_map(|id| self.tile(id).map(Tile::exponent))
            .max()
    }

    /// Release all tiles and empty the grid
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
        self.tiles.clear();
    }

    /// Exponent per cell for the visible rows (0 = empty)
    pub fn exponent_rows(&self) -> Vec<Vec<u8>> {
        (SPAWN_BUFFER as i8..self.height() as i8)
            .map(|y| {
                (0..BOARD_WIDTH as i8)
                    .map(|x| {
                        self.get(x, y)
                            .and_then(|id| self.tile(id))
                            .map_or(0, Tile::exponent)
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardGeometry::default())
    }
}

impl std::fmt::Display for Board {
    /// One line per visible row, each cell shown as its exponent or `.`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.exponent_rows() {
            for k in row {
                if k == 0 {
                    f.write_str("  .")?;
                } else {
                    write!(f, "{:>3}", k)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
