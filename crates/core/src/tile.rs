//! Tile module - numbered tiles and their generational store
//!
//! A tile carries an exponent `k` (displayed value `2^k`) and the grid position of
//! its top-left cell. Identity is separate from value: two tiles can share `k`.
//!
//! Tiles are allocated in a [`TileArena`] and referred to by [`TileId`]. Releasing
//! a tile bumps its slot generation, so an id held past the tile's lifetime never
//! resolves to whatever tile reuses the slot later.

use serde::{Deserialize, Serialize};

/// Stable handle to a tile in a [`TileArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    index: u32,
    generation: u32,
}

impl TileId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A numbered tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub(crate) k: u8,
    pub(crate) x: i8,
    pub(crate) y: i8,
}

impl Tile {
    pub fn new(k: u8, x: i8, y: i8) -> Self {
        Self { k, x, y }
    }

    /// Exponent of the tile's value
    pub fn exponent(&self) -> u8 {
        self.k
    }

    /// Displayed value (`2^k`), saturating for absurd exponents
    pub fn value(&self) -> u64 {
        exponent_value(self.k)
    }

    /// Column of the top-left cell
    pub fn x(&self) -> i8 {
        self.x
    }

    /// Grid-space row of the top-left cell
    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn position(&self) -> (i8, i8) {
        (self.x, self.y)
    }
}

/// `2^k` as a `u64`, saturating at `u64::MAX`
pub fn exponent_value(k: u8) -> u64 {
    1u64.checked_shl(k as u32).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    tile: Option<Tile>,
}

/// Generational tile store
#[derive(Debug, Clone, Default)]
pub struct TileArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl TileArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tile and return its handle
    pub fn insert(&mut self, tile: Tile) -> TileId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.tile = Some(tile);
            return TileId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            tile: Some(tile),
        });
        TileId {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tile.as_ref())
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tile.as_mut())
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.get(id).is_some()
    }

    /// Drop a tile; its id (and every copy of it) goes stale
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let tile = slot.tile.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(tile)
    }

    /// Number of live tiles
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every tile, invalidating all outstanding ids
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.tile.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.live = 0;
    }
}
