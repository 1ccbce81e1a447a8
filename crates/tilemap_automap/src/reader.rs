//! Reading rule maps from disk.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tilemap_core::Map;

/// Error type for rule map loading failures
#[derive(Debug, Error)]
pub enum MapReadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Turns a file on disk into an in-memory [`Map`].
///
/// The engine only needs the in-memory model; other formats plug in here.
pub trait MapReader {
    fn read_map(&self, path: &Path) -> Result<Map, MapReadError>;
}

/// Reads maps stored as the JSON serialization of [`Map`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMapReader;

impl MapReader for JsonMapReader {
    fn read_map(&self, path: &Path) -> Result<Map, MapReadError> {
        let bytes = std::fs::read(path).map_err(|source| MapReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| MapReadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load a map from a JSON string
pub fn load_map_from_str(json: &str) -> Result<Map, serde_json::Error> {
    serde_json::from_str(json)
}
