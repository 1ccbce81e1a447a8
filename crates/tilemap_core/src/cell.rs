//! Tile cells and packed flip flags

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horizontal flip flag, stored in the top bit of a packed tile value.
pub const TILE_FLIP_X: u32 = 1 << 31;
/// Vertical flip flag.
pub const TILE_FLIP_Y: u32 = 1 << 30;
/// Anti-diagonal flip flag (used to express 90° rotations).
pub const TILE_FLIP_D: u32 = 1 << 29;
/// All flip flags combined.
pub const TILE_FLIP_MASK: u32 = TILE_FLIP_X | TILE_FLIP_Y | TILE_FLIP_D;

/// Strip the flip flags from a packed tile value, leaving the local index.
pub fn tile_index(packed: u32) -> u32 {
    packed & !TILE_FLIP_MASK
}

pub fn tile_flip_x(packed: u32) -> bool {
    packed & TILE_FLIP_X != 0
}

pub fn tile_flip_y(packed: u32) -> bool {
    packed & TILE_FLIP_Y != 0
}

pub fn tile_flip_d(packed: u32) -> bool {
    packed & TILE_FLIP_D != 0
}

/// A non-empty grid cell.
///
/// Empty cells are represented as `None` wherever an `Option<Cell>` is stored.
/// Two cells are equal only when tileset, local index and every flip flag
/// agree, which is exactly the comparison the automapping matcher needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// The tileset this tile belongs to
    pub tileset_id: Uuid,
    /// Local tile index with flip flags packed in the top bits
    pub tile: u32,
}

impl Cell {
    /// Create an unflipped cell
    pub fn new(tileset_id: Uuid, index: u32) -> Self {
        Self {
            tileset_id,
            tile: tile_index(index),
        }
    }

    /// Return a copy of this cell with the given flip flags
    pub fn flipped(mut self, flip_x: bool, flip_y: bool, flip_d: bool) -> Self {
        self.tile = tile_index(self.tile);
        if flip_x {
            self.tile |= TILE_FLIP_X;
        }
        if flip_y {
            self.tile |= TILE_FLIP_Y;
        }
        if flip_d {
            self.tile |= TILE_FLIP_D;
        }
        self
    }

    /// Local tile index without flip flags
    pub fn index(&self) -> u32 {
        tile_index(self.tile)
    }

    pub fn flip_x(&self) -> bool {
        tile_flip_x(self.tile)
    }

    pub fn flip_y(&self) -> bool {
        tile_flip_y(self.tile)
    }

    pub fn flip_d(&self) -> bool {
        tile_flip_d(self.tile)
    }
}
