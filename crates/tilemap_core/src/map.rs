//! The map: an ordered stack of layers with tilesets and properties

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Cell, Layer, LayerData, Properties, Rect, TileLayer, TileProperties, Tileset};

/// A tile map.
///
/// Used both as the target of automapping and as a rule map whose layer names
/// encode rules. Layers are ordered bottom to top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Infinite maps have no fixed size; their extent is the union of their tile layers
    #[serde(default)]
    pub infinite: bool,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Map {
    /// Create a finite map without layers
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            infinite: false,
            tilesets: Vec::new(),
            properties: Properties::new(),
            layers: Vec::new(),
        }
    }

    /// Create an infinite map without layers
    pub fn new_infinite(name: impl Into<String>) -> Self {
        Self {
            infinite: true,
            ..Self::new(name, 0, 0)
        }
    }

    /// The fixed map rectangle (`0, 0, width, height`)
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Extent of the map: the map rectangle, or for infinite maps the union of
    /// every tile layer's bounds.
    pub fn bounds(&self) -> Rect {
        if !self.infinite {
            return self.rect();
        }
        self.tile_layers()
            .iter()
            .filter_map(|layer| layer.as_tile_layer())
            .fold(Rect::default(), |acc, tiles| acc.union(&tiles.bounds()))
    }

    /// Append a layer on top of the stack
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Insert a top-level layer at `index`, appending if `index` is past the end.
    /// Returns the index the layer ended up at.
    pub fn insert_layer(&mut self, index: usize, layer: Layer) -> usize {
        let index = index.min(self.layers.len());
        self.layers.insert(index, layer);
        index
    }

    /// Remove a layer anywhere in the hierarchy by its id
    pub fn remove_layer(&mut self, id: Uuid) -> Option<Layer> {
        fn remove_from(layers: &mut Vec<Layer>, id: Uuid) -> Option<Layer> {
            if let Some(pos) = layers.iter().position(|l| l.id == id) {
                return Some(layers.remove(pos));
            }
            layers
                .iter_mut()
                .filter_map(Layer::children_mut)
                .find_map(|children| remove_from(children, id))
        }
        remove_from(&mut self.layers, id)
    }

    /// Every tile layer in depth-first, bottom-to-top order
    pub fn tile_layers(&self) -> Vec<&Layer> {
        fn collect<'a>(layers: &'a [Layer], out: &mut Vec<&'a Layer>) {
            for layer in layers {
                match &layer.data {
                    LayerData::Tiles(_) => out.push(layer),
                    LayerData::Group { layers } => collect(layers, out),
                    LayerData::Objects { .. } => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.layers, &mut out);
        out
    }

    pub fn tile_layer_names(&self) -> Vec<&str> {
        self.tile_layers()
            .into_iter()
            .map(|layer| layer.name.as_str())
            .collect()
    }

    /// Index path to the first tile layer called `name` (depth-first)
    pub fn find_tile_layer_path(&self, name: &str) -> Option<Vec<usize>> {
        fn find(layers: &[Layer], name: &str, path: &mut Vec<usize>) -> bool {
            for (idx, layer) in layers.iter().enumerate() {
                path.push(idx);
                match &layer.data {
                    LayerData::Tiles(_) if layer.name == name => return true,
                    LayerData::Group { layers } if find(layers, name, path) => return true,
                    _ => {}
                }
                path.pop();
            }
            false
        }
        let mut path = Vec::new();
        find(&self.layers, name, &mut path).then_some(path)
    }

    /// Layer at an index path produced by [`Map::find_tile_layer_path`]
    pub fn layer_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Layer> {
        let (first, rest) = path.split_first()?;
        let mut layer = self.layers.get_mut(*first)?;
        for idx in rest {
            layer = layer.children_mut()?.get_mut(*idx)?;
        }
        Some(layer)
    }

    /// First tile layer called `name`
    pub fn tile_layer(&self, name: &str) -> Option<&TileLayer> {
        self.tile_layers()
            .into_iter()
            .find(|layer| layer.name == name)
            .and_then(Layer::as_tile_layer)
    }

    pub fn tile_layer_mut(&mut self, name: &str) -> Option<&mut TileLayer> {
        let path = self.find_tile_layer_path(name)?;
        self.layer_at_path_mut(&path)?.as_tile_layer_mut()
    }

    /// Cell of the tile layer `layer` at `(x, y)`
    pub fn cell(&self, layer: &str, x: i32, y: i32) -> Option<Cell> {
        self.tile_layer(layer).and_then(|tiles| tiles.cell(x, y))
    }

    pub fn tileset(&self, id: Uuid) -> Option<&Tileset> {
        self.tilesets.iter().find(|ts| ts.id == id)
    }

    /// Properties of the tile a cell refers to, if its tileset is known
    pub fn tile_properties(&self, cell: &Cell) -> Option<&TileProperties> {
        self.tileset(cell.tileset_id)?.tile_properties(cell.index())
    }

    /// Output probability of the tile a cell refers to (1.0 when unknown)
    pub fn tile_probability(&self, cell: &Cell) -> f32 {
        self.tile_properties(cell)
            .map(|p| p.probability)
            .unwrap_or(1.0)
    }

    /// Whether the tile a cell refers to is marked as an erase tile
    pub fn is_erase_tile(&self, cell: &Cell) -> bool {
        self.tile_properties(cell).is_some_and(|p| p.erase)
    }
}
