//! Layer types for tile, object and group layers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Cell, Properties, Rect};

/// A layer (tiles, objects or a group of child layers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    pub data: LayerData,
}

impl Layer {
    /// Create a new empty tile layer covering `bounds`
    pub fn new_tile_layer(name: impl Into<String>, bounds: Rect) -> Self {
        Self::with_data(name, LayerData::Tiles(TileLayer::new(bounds)))
    }

    /// Create a new object layer
    pub fn new_object_layer(name: impl Into<String>) -> Self {
        Self::with_data(
            name,
            LayerData::Objects {
                entities: Vec::new(),
            },
        )
    }

    /// Create a new group layer holding `layers`
    pub fn new_group(name: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self::with_data(name, LayerData::Group { layers })
    }

    fn with_data(name: impl Into<String>, data: LayerData) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            visible: true,
            properties: Properties::new(),
            data,
        }
    }

    /// Get the type of this layer
    pub fn layer_type(&self) -> LayerType {
        match &self.data {
            LayerData::Tiles(_) => LayerType::Tiles,
            LayerData::Objects { .. } => LayerType::Objects,
            LayerData::Group { .. } => LayerType::Group,
        }
    }

    pub fn as_tile_layer(&self) -> Option<&TileLayer> {
        match &self.data {
            LayerData::Tiles(tiles) => Some(tiles),
            _ => None,
        }
    }

    pub fn as_tile_layer_mut(&mut self) -> Option<&mut TileLayer> {
        match &mut self.data {
            LayerData::Tiles(tiles) => Some(tiles),
            _ => None,
        }
    }

    /// Child layers if this is a group
    pub fn children(&self) -> Option<&[Layer]> {
        match &self.data {
            LayerData::Group { layers } => Some(layers),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Layer>> {
        match &mut self.data {
            LayerData::Group { layers } => Some(layers),
            _ => None,
        }
    }
}

/// The type of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerType {
    Tiles,
    Objects,
    Group,
}

/// The data contained in a layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayerData {
    Tiles(TileLayer),
    /// Object layer containing entity references. Ignored by automapping.
    Objects { entities: Vec<Uuid> },
    /// Child layers; names are unique within one group
    Group { layers: Vec<Layer> },
}

/// A rectangular grid of optional cells.
///
/// Reading outside `bounds` yields an empty cell. Writing outside `bounds`
/// grows the grid, which is how infinite maps extend their layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTileLayer")]
pub struct TileLayer {
    bounds: Rect,
    /// Row-major cells, `bounds.width * bounds.height` long
    cells: Vec<Option<Cell>>,
}

/// Serialized form of [`TileLayer`], checked before use.
#[derive(Deserialize)]
struct RawTileLayer {
    bounds: Rect,
    cells: Vec<Option<Cell>>,
}

impl TryFrom<RawTileLayer> for TileLayer {
    type Error = String;

    fn try_from(raw: RawTileLayer) -> Result<Self, Self::Error> {
        if raw.bounds.width < 0 || raw.bounds.height < 0 {
            return Err(format!(
                "tile layer has negative size {}x{}",
                raw.bounds.width, raw.bounds.height
            ));
        }
        if raw.cells.len() != raw.bounds.area() {
            return Err(format!(
                "tile layer of {}x{} has {} cells, expected {}",
                raw.bounds.width,
                raw.bounds.height,
                raw.cells.len(),
                raw.bounds.area()
            ));
        }
        Ok(Self {
            bounds: raw.bounds,
            cells: raw.cells,
        })
    }
}

impl TileLayer {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            cells: vec![None; bounds.area()],
        }
    }

    /// Build a layer from rows of cells, with its top-left corner at the origin
    pub fn from_rows(rows: Vec<Vec<Option<Cell>>>) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as i32;
        let mut layer = Self::new(Rect::new(0, 0, width, height));
        for (y, row) in rows.into_iter().enumerate() {
            for (x, cell) in row.into_iter().enumerate() {
                layer.set_cell(x as i32, y as i32, cell);
            }
        }
        layer
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let local_x = (x - self.bounds.x) as usize;
        let local_y = (y - self.bounds.y) as usize;
        Some(local_y * self.bounds.width as usize + local_x)
    }

    /// Cell at `(x, y)`; `None` for empty cells and positions outside the grid
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.offset(x, y)
            .and_then(|idx| self.cells.get(idx).copied().flatten())
    }

    /// Write a cell, returning the previous value
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Option<Cell>) -> Option<Cell> {
        if self.offset(x, y).is_none() {
            if cell.is_none() {
                return None;
            }
            self.grow_to(Rect::new(x, y, 1, 1));
        }
        match self.offset(x, y).and_then(|idx| self.cells.get_mut(idx)) {
            Some(slot) => std::mem::replace(slot, cell),
            None => None,
        }
    }

    /// Reallocate the grid so it also covers `rect`
    fn grow_to(&mut self, rect: Rect) {
        let new_bounds = self.bounds.union(&rect);
        if new_bounds == self.bounds {
            return;
        }
        let mut grown = TileLayer::new(new_bounds);
        for (x, y) in self.bounds.cells() {
            if let Some(cell) = self.cell(x, y) {
                if let Some(slot) = grown.offset(x, y).and_then(|idx| grown.cells.get_mut(idx)) {
                    *slot = Some(cell);
                }
            }
        }
        *self = grown;
    }

    /// `true` when no cell holds a tile
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Bounding rectangle of the non-empty cells
    pub fn used_bounds(&self) -> Rect {
        self.iter_cells()
            .fold(Rect::default(), |acc, (x, y, _)| acc.union(&Rect::new(x, y, 1, 1)))
    }

    /// Iterate the non-empty cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.bounds
            .cells()
            .filter_map(move |(x, y)| self.cell(x, y).map(|cell| (x, y, cell)))
    }
}
