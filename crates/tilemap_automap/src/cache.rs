//! Rule maps loaded from disk, reused until the file changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tilemap_core::Map;

use crate::{MapReadError, MapReader};

/// What a file looked like when it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl FileSignature {
    /// Current signature of the file at `path`
    pub fn of(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

#[derive(Debug)]
struct CachedRuleMap {
    signature: FileSignature,
    map: Map,
}

/// Cache of parsed rule maps keyed by path.
///
/// An entry is reused while the file's [`FileSignature`] is unchanged.
#[derive(Debug, Default)]
pub struct RuleMapCache {
    entries: HashMap<PathBuf, CachedRuleMap>,
}

impl RuleMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the rule map at `path`, reading it through `reader` if it is not
    /// cached or changed on disk since it was cached.
    pub fn load(&mut self, path: &Path, reader: &impl MapReader) -> Result<&Map, MapReadError> {
        let signature = FileSignature::of(path).map_err(|source| MapReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let fresh = self
            .entries
            .get(path)
            .is_some_and(|entry| entry.signature == signature);
        if !fresh {
            tracing::debug!(path = %path.display(), "loading rule map");
            let map = reader.read_map(path)?;
            self.entries
                .insert(path.to_path_buf(), CachedRuleMap { signature, map });
        }

        match self.entries.get(path) {
            Some(entry) => Ok(&entry.map),
            None => Err(MapReadError::Io {
                path: path.to_path_buf(),
                source: std::io::ErrorKind::NotFound.into(),
            }),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Drop the entry for `path`, forcing the next load to read the file
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as Counter;

    /// Counts reads and delegates to the JSON reader.
    struct CountingReader {
        reads: Counter<usize>,
    }

    impl MapReader for CountingReader {
        fn read_map(&self, path: &Path) -> Result<Map, MapReadError> {
            self.reads.set(self.reads.get() + 1);
            crate::JsonMapReader.read_map(path)
        }
    }

    fn write_map(path: &Path, name: &str) {
        let map = Map::new(name, 2, 2);
        std::fs::write(path, serde_json::to_string(&map).unwrap()).unwrap();
    }

    #[test]
    fn unchanged_file_is_read_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        write_map(&path, "rules");

        let reader = CountingReader { reads: Counter::new(0) };
        let mut cache = RuleMapCache::new();
        assert_eq!(cache.load(&path, &reader).unwrap().name, "rules");
        assert_eq!(cache.load(&path, &reader).unwrap().name, "rules");
        assert_eq!(reader.reads.get(), 1);
    }

    #[test]
    fn changed_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        write_map(&path, "old");

        let reader = CountingReader { reads: Counter::new(0) };
        let mut cache = RuleMapCache::new();
        cache.load(&path, &reader).unwrap();

        // A longer name changes the length, so the signature differs even
        // when the modification time has coarse resolution.
        write_map(&path, "a much longer rule map name");
        assert_eq!(
            cache.load(&path, &reader).unwrap().name,
            "a much longer rule map name"
        );
        assert_eq!(reader.reads.get(), 2);
    }

    #[test]
    fn invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        write_map(&path, "rules");

        let reader = CountingReader { reads: Counter::new(0) };
        let mut cache = RuleMapCache::new();
        cache.load(&path, &reader).unwrap();
        assert!(cache.invalidate(&path));
        assert!(!cache.contains(&path));
        cache.load(&path, &reader).unwrap();
        assert_eq!(reader.reads.get(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = RuleMapCache::new();
        let result = cache.load(&dir.path().join("gone.json"), &crate::JsonMapReader);
        assert!(matches!(result, Err(MapReadError::Io { .. })));
        assert!(cache.is_empty());
    }
}
