//! Tilesets and per-tile properties

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::Properties;

fn default_probability() -> f32 {
    1.0
}

/// Per-tile properties the automapping engine cares about, plus custom metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileProperties {
    /// Relative weight when this tile is one of several stacked output candidates
    #[serde(default = "default_probability")]
    pub probability: f32,
    /// When used as an automapping output, this tile clears the target cell
    #[serde(default)]
    pub erase: bool,
    /// Custom user-defined properties
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub custom: Properties,
}

impl Default for TileProperties {
    fn default() -> Self {
        Self {
            probability: default_probability(),
            erase: false,
            custom: Properties::new(),
        }
    }
}

impl TileProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_erase(mut self, erase: bool) -> Self {
        self.erase = erase;
        self
    }

    /// Check if any properties differ from the defaults
    pub fn is_default(&self) -> bool {
        self.probability == default_probability() && !self.erase && self.custom.is_empty()
    }
}

/// A tileset as seen by the map model: an identity and per-tile properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tileset {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub tile_count: u32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tile_properties: HashMap<u32, TileProperties>,
}

impl Tileset {
    pub fn new(name: impl Into<String>, tile_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tile_count,
            tile_properties: HashMap::new(),
        }
    }

    /// Get properties for a tile, if any were set
    pub fn tile_properties(&self, tile_index: u32) -> Option<&TileProperties> {
        self.tile_properties.get(&tile_index)
    }

    /// Set properties for a tile; default properties are not stored
    pub fn set_tile_properties(&mut self, tile_index: u32, properties: TileProperties) {
        if properties.is_default() {
            self.tile_properties.remove(&tile_index);
        } else {
            self.tile_properties.insert(tile_index, properties);
        }
    }

    /// Output probability of a tile (1.0 unless configured)
    pub fn probability(&self, tile_index: u32) -> f32 {
        self.tile_properties
            .get(&tile_index)
            .map(|p| p.probability)
            .unwrap_or_else(default_probability)
    }

    pub fn is_erase(&self, tile_index: u32) -> bool {
        self.tile_properties
            .get(&tile_index)
            .map(|p| p.erase)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_tiles_use_defaults() {
        let tileset = Tileset::new("Test", 16);
        assert_eq!(tileset.probability(3), 1.0);
        assert!(!tileset.is_erase(3));
    }

    #[test]
    fn default_properties_are_not_stored() {
        let mut tileset = Tileset::new("Test", 16);
        tileset.set_tile_properties(2, TileProperties::new().with_probability(0.25));
        assert_eq!(tileset.probability(2), 0.25);

        tileset.set_tile_properties(2, TileProperties::new());
        assert!(tileset.tile_properties(2).is_none());
    }

    #[test]
    fn missing_probability_deserializes_to_one() {
        let props: TileProperties = serde_json::from_str(r#"{"erase": true}"#).unwrap();
        assert_eq!(props.probability, 1.0);
        assert!(props.erase);
    }
}
