//! Address → coordinates side table, persisted as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{CacheError, write_json_file};
use crate::domain::Coordinates;

/// Geocoded coordinates keyed by address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCache {
    entries: BTreeMap<String, Coordinates>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache from disk.
    ///
    /// A missing or unreadable file yields an empty cache; the caller will
    /// simply geocode again.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No geocode cache");
                return Self::new();
            }
        };
        match serde_json::from_str::<Self>(&contents) {
            Ok(cache) => {
                debug!(path = %path.display(), entries = cache.len(), "Loaded geocode cache");
                cache
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt geocode cache");
                Self::new()
            }
        }
    }

    /// Write the cache to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        write_json_file(path, self)
    }

    pub fn get(&self, address: &str) -> Option<Coordinates> {
        self.entries.get(address).copied()
    }

    pub fn insert(&mut self, address: impl Into<String>, coordinates: Coordinates) {
        self.entries.insert(address.into(), coordinates);
    }

    pub fn remove(&mut self, address: &str) -> Option<Coordinates> {
        self.entries.remove(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(address)
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
    use tempfile::tempdir;

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");

        let mut cache = GeocodeCache::new();
        cache.insert("millbrae train station california", Coordinates::new(37.6, -122.39));
        cache.insert("tamien train station california", Coordinates::new(37.31, -121.88));
        cache.save(&path).unwrap();

        let loaded = GeocodeCache::load(&path);
        assert_eq!(loaded, cache);
        assert_eq!(
            loaded.get("tamien train station california"),
            Some(Coordinates::new(37.31, -121.88))
        );
    }

    #[test]
    fn missing_file_loads_empty() {
        let cache = GeocodeCache::load(Path::new("/nonexistent/path/geocode.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(GeocodeCache::load(&path).is_empty());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("geocode.json");
        GeocodeCache::new().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn insert_and_remove() {
        let mut cache = GeocodeCache::new();
        cache.insert("a", Coordinates::new(1.0, 2.0));
        assert!(cache.contains("a"));
        assert_eq!(cache.remove("a"), Some(Coordinates::new(1.0, 2.0)));
        assert!(!cache.contains("a"));
        assert_eq!(cache.len(), 0);
    }
}
