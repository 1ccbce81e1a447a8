//! Core map model for tilemap_automap
//!
//! This crate provides the in-memory types the automapping engine reads and
//! writes:
//! - `Map` - An ordered stack of named layers plus tilesets and properties
//! - `Layer` - A single layer (tiles, objects or a group of layers)
//! - `TileLayer` - A rectangular grid of optional `Cell`s
//! - `Cell` - A tile reference: tileset, local index and flip flags
//! - `Tileset` - Per-tile properties such as the output probability
//! - `PropertyValue` - Custom property values on maps and layers
//! - `Rect` - Integer rectangles used for bounds, regions and search areas

mod cell;
mod geometry;
mod layer;
mod map;
mod tileset;
mod value;

pub use cell::{
    tile_flip_d, tile_flip_x, tile_flip_y, tile_index, Cell, TILE_FLIP_D, TILE_FLIP_MASK,
    TILE_FLIP_X, TILE_FLIP_Y,
};
pub use geometry::Rect;
pub use layer::{Layer, LayerData, LayerType, TileLayer};
pub use map::Map;
pub use tileset::{TileProperties, Tileset};
pub use value::{Properties, PropertyValue};
