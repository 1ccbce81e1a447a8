//! The single undoable edit produced by one automapping run.

use std::collections::BTreeMap;

use tilemap_core::{Cell, Layer, Map, Rect};
use uuid::Uuid;

/// Undo label of every automapping edit.
pub const AUTOMAP_EDIT_DESCRIPTION: &str = "Apply AutoMap rules";

/// `(x, y) -> (old, new)` for one layer
pub type CellChanges = BTreeMap<(i32, i32), (Option<Cell>, Option<Cell>)>;

/// A layer the run had to create, kept empty so it can be re-inserted on redo.
#[derive(Debug, Clone)]
pub struct CreatedLayer {
    pub index: usize,
    pub layer: Layer,
}

/// Cell changes recorded for one target layer.
#[derive(Debug, Clone)]
pub struct LayerChanges {
    pub layer_id: Uuid,
    pub layer_name: String,
    pub cells: CellChanges,
}

/// All mutations of one run, as one logical edit.
///
/// The engine mutates the map in place and records each write here, so the
/// surrounding undo system can revert or replay the whole run at once.
///
/// # Invariants
///
/// - Only net changes are kept: writing a cell back to its original value
///   removes its entry.
/// - For a cell written several times, `old` is the value before the run and
///   `new` the value after it.
#[derive(Debug, Clone)]
pub struct AutomapEdit {
    description: String,
    created_layers: Vec<CreatedLayer>,
    layers: Vec<LayerChanges>,
}

impl Default for AutomapEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomapEdit {
    pub fn new() -> Self {
        Self {
            description: AUTOMAP_EDIT_DESCRIPTION.to_string(),
            created_layers: Vec::new(),
            layers: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_layers(&self) -> &[CreatedLayer] {
        &self.created_layers
    }

    pub fn layer_changes(&self) -> &[LayerChanges] {
        &self.layers
    }

    /// Cell changes for the layer called `name`, if any were recorded
    pub fn changes_for(&self, name: &str) -> Option<&CellChanges> {
        self.layers
            .iter()
            .find(|l| l.layer_name == name)
            .map(|l| &l.cells)
    }

    /// Returns `true` if the run left the map untouched.
    pub fn is_empty(&self) -> bool {
        self.created_layers.is_empty() && self.layers.iter().all(|l| l.cells.is_empty())
    }

    pub fn changed_cells(&self) -> usize {
        self.layers.iter().map(|l| l.cells.len()).sum()
    }

    /// Bounding rectangle of every changed cell
    pub fn changed_bounds(&self) -> Rect {
        self.layers
            .iter()
            .flat_map(|l| l.cells.keys())
            .fold(Rect::default(), |acc, &(x, y)| {
                acc.union(&Rect::new(x, y, 1, 1))
            })
    }

    pub(crate) fn record_created_layer(&mut self, index: usize, layer: Layer) {
        self.created_layers.push(CreatedLayer { index, layer });
    }

    /// Record a write of `new` over `old` at `(x, y)` on the given layer.
    pub(crate) fn record(
        &mut self,
        layer_id: Uuid,
        layer_name: &str,
        x: i32,
        y: i32,
        old: Option<Cell>,
        new: Option<Cell>,
    ) {
        let pos = match self.layers.iter().position(|l| l.layer_id == layer_id) {
            Some(pos) => pos,
            None => {
                self.layers.push(LayerChanges {
                    layer_id,
                    layer_name: layer_name.to_string(),
                    cells: CellChanges::new(),
                });
                self.layers.len() - 1
            }
        };
        let cells = &mut self.layers[pos].cells;

        let original = cells.get(&(x, y)).map(|&(first, _)| first).unwrap_or(old);
        if original == new {
            cells.remove(&(x, y));
        } else {
            cells.insert((x, y), (original, new));
        }
    }

    /// Revert the edit: restore every old cell value and remove created layers.
    pub fn undo(&self, map: &mut Map) {
        for changes in &self.layers {
            if let Some(tiles) = tile_layer_by_id(map, changes.layer_id) {
                for (&(x, y), &(old, _)) in &changes.cells {
                    tiles.set_cell(x, y, old);
                }
            }
        }
        for created in self.created_layers.iter().rev() {
            map.remove_layer(created.layer.id);
        }
    }

    /// Re-apply the edit after an [`undo`](Self::undo).
    pub fn redo(&self, map: &mut Map) {
        for created in &self.created_layers {
            if find_layer(map, created.layer.id).is_none() {
                map.insert_layer(created.index, created.layer.clone());
            }
        }
        for changes in &self.layers {
            if let Some(tiles) = tile_layer_by_id(map, changes.layer_id) {
                for (&(x, y), &(_, new)) in &changes.cells {
                    tiles.set_cell(x, y, new);
                }
            }
        }
    }
}

fn find_layer(map: &Map, id: Uuid) -> Option<&Layer> {
    fn find(layers: &[Layer], id: Uuid) -> Option<&Layer> {
        layers.iter().find_map(|layer| {
            if layer.id == id {
                Some(layer)
            } else {
                layer.children().and_then(|children| find(children, id))
            }
        })
    }
    find(&map.layers, id)
}

fn tile_layer_by_id(map: &mut Map, id: Uuid) -> Option<&mut tilemap_core::TileLayer> {
    fn find(layers: &mut [Layer], id: Uuid) -> Option<&mut Layer> {
        for layer in layers {
            if layer.id == id {
                return Some(layer);
            }
            if let Some(children) = layer.children_mut() {
                if let Some(found) = find(children, id) {
                    return Some(found);
                }
            }
        }
        None
    }
    find(&mut map.layers, id)?.as_tile_layer_mut()
}
