//! Explicit coordinate resolution.
//!
//! Resolution is a separate step from distance computation: the loader
//! resolves every station once, the caller resolves the rider's start point,
//! and only then are queries run against the frozen cache.

use std::path::Path;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::domain::{Coordinates, Location, StationRegistry};

use super::cache::GeocodeCache;
use super::client::Geocoder;
use super::error::GeocodeError;

/// Maximum concurrent geocoding requests when resolving stations.
const MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Pairs a geocoder with the address cache it fills.
pub struct Resolver<G> {
    geocoder: G,
    cache: GeocodeCache,
}

impl<G: Geocoder> Resolver<G> {
    pub fn new(geocoder: G, cache: GeocodeCache) -> Self {
        Self { geocoder, cache }
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    /// Finish resolving and hand over the cache for read-only use.
    pub fn into_cache(self) -> GeocodeCache {
        self.cache
    }

    /// Resolve a location's coordinates.
    ///
    /// Uses the location's own coordinates or the cached entry for its
    /// address when present; otherwise asks the geocoder. The result is
    /// stored on the location and, unless it is non-cacheable, in the cache.
    pub async fn resolve(&mut self, location: &mut Location) -> Result<Coordinates, GeocodeError> {
        if let Some(c) = location.coordinates(&self.cache) {
            if !location.is_geocoded() {
                location.set_lat_lon(Some(c), &mut self.cache);
            }
            return Ok(c);
        }

        let address = location
            .address()
            .ok_or(GeocodeError::MissingAddress)?
            .to_string();
        let c = self.geocoder.geocode(&address).await?;
        location.set_lat_lon(Some(c), &mut self.cache);
        Ok(c)
    }

    /// Resolve every registered station that is not cached yet.
    ///
    /// Returns the number of addresses looked up. Successful lookups are
    /// cached even when another lookup fails; the first failure is returned.
    pub async fn resolve_stations(
        &mut self,
        registry: &StationRegistry,
    ) -> Result<usize, GeocodeError> {
        let mut pending: Vec<String> = registry
            .iter()
            .filter_map(|st| st.location().address())
            .filter(|address| !self.cache.contains(address))
            .map(str::to_string)
            .collect();
        pending.sort_unstable();

        if pending.is_empty() {
            debug!(stations = registry.len(), "All stations already geocoded");
            return Ok(0);
        }

        info!(count = pending.len(), "Geocoding stations");

        let geocoder = &self.geocoder;
        let results: Vec<(String, Result<Coordinates, GeocodeError>)> = stream::iter(pending)
            .map(|address| async move {
                let result = geocoder.geocode(&address).await;
                (address, result)
            })
            .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await;

        let looked_up = results.len();
        let mut first_error = None;
        for (address, result) in results {
            match result {
                Ok(c) => self.cache.insert(address, c),
                Err(e) => {
                    debug!(address = %address, error = %e, "Station geocoding failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(looked_up),
        }
    }

    /// Resolve stations as [`Resolver::resolve_stations`] does, then write
    /// the cache to `path` if it gained entries.
    ///
    /// The cache is saved before any lookup error is returned, so addresses
    /// that did resolve are not looked up again next run. A failed write is
    /// logged only.
    pub async fn resolve_stations_and_save(
        &mut self,
        registry: &StationRegistry,
        path: &Path,
    ) -> Result<usize, GeocodeError> {
        let before = self.cache.len();
        let result = self.resolve_stations(registry).await;

        if self.cache.len() > before
            && let Err(e) = self.cache.save(path)
        {
            warn!(path = %path.display(), error = %e, "Failed to save geocode cache");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// In-memory geocoder that counts lookups.
    struct MockGeocoder {
        known: HashMap<String, Coordinates>,
        calls: Mutex<Vec<String>>,
    }

    impl MockGeocoder {
        fn new(entries: &[(&str, f64, f64)]) -> Self {
            Self {
                known: entries
                    .iter()
                    .map(|(a, lat, lon)| ((*a).to_string(), Coordinates::new(*lat, *lon)))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Geocoder for MockGeocoder {
        async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
            self.calls.lock().unwrap().push(address.to_string());
            self.known
                .get(address)
                .copied()
                .ok_or_else(|| GeocodeError::NoResult {
                    address: address.to_string(),
                })
        }
    }

    #[tokio::test]
    async fn resolve_explicit_coordinates_skips_geocoder() {
        let mut resolver = Resolver::new(MockGeocoder::new(&[]), GeocodeCache::new());
        let mut loc = Location::from_coordinates(37.0, -122.0);

        let c = resolver.resolve(&mut loc).await.unwrap();
        assert_eq!(c, Coordinates::new(37.0, -122.0));
        assert_eq!(resolver.geocoder.call_count(), 0);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn resolve_address_caches_once() {
        let geocoder = MockGeocoder::new(&[("sfo", 37.62, -122.38)]);
        let mut resolver = Resolver::new(geocoder, GeocodeCache::new());

        let mut first = Location::from_address("sfo");
        resolver.resolve(&mut first).await.unwrap();
        assert!(first.is_geocoded());

        let mut second = Location::from_address("sfo");
        let c = resolver.resolve(&mut second).await.unwrap();
        assert_eq!(c, Coordinates::new(37.62, -122.38));
        assert_eq!(resolver.geocoder.call_count(), 1);
        assert!(resolver.cache().contains("sfo"));
    }

    #[tokio::test]
    async fn non_cacheable_address_is_not_stored() {
        let geocoder = MockGeocoder::new(&[("my house", 37.5, -122.2)]);
        let mut resolver = Resolver::new(geocoder, GeocodeCache::new());

        let mut loc = Location::from_address("my house").non_cacheable();
        resolver.resolve(&mut loc).await.unwrap();
        assert!(loc.is_geocoded());
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn unresolvable_address_fails() {
        let mut resolver = Resolver::new(MockGeocoder::new(&[]), GeocodeCache::new());
        let mut loc = Location::from_address("atlantis");
        let err = resolver.resolve(&mut loc).await.unwrap_err();
        assert!(matches!(err, GeocodeError::NoResult { .. }));
        assert!(!loc.is_geocoded());
    }

    #[tokio::test]
    async fn resolve_stations_only_looks_up_uncached() {
        let mut registry = StationRegistry::new();
        registry.find("Millbrae");
        registry.find("Tamien");

        let geocoder = MockGeocoder::new(&[
            ("millbrae train station california", 37.6, -122.39),
            ("tamien train station california", 37.31, -121.88),
        ]);
        let mut cache = GeocodeCache::new();
        cache.insert("millbrae train station california", Coordinates::new(37.6, -122.39));

        let mut resolver = Resolver::new(geocoder, cache);
        let looked_up = resolver.resolve_stations(&registry).await.unwrap();
        assert_eq!(looked_up, 1);
        assert_eq!(resolver.geocoder.call_count(), 1);
        assert_eq!(resolver.cache().len(), 2);

        // Second pass has nothing left to do.
        assert_eq!(resolver.resolve_stations(&registry).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn resolve_stations_keeps_partial_results() {
        let mut registry = StationRegistry::new();
        registry.find("Millbrae");
        registry.find("Nowhere");

        let geocoder = MockGeocoder::new(&[("millbrae train station california", 37.6, -122.39)]);
        let mut resolver = Resolver::new(geocoder, GeocodeCache::new());

        assert!(resolver.resolve_stations(&registry).await.is_err());
        assert!(resolver.cache().contains("millbrae train station california"));
        assert_eq!(resolver.into_cache().len(), 1);
    }

    #[tokio::test]
    async fn partial_results_are_saved_before_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");

        let mut registry = StationRegistry::new();
        registry.find("Millbrae");
        registry.find("Nowhere");

        let geocoder = MockGeocoder::new(&[("millbrae train station california", 37.6, -122.39)]);
        let mut resolver = Resolver::new(geocoder, GeocodeCache::new());

        let err = resolver
            .resolve_stations_and_save(&registry, &path)
            .await
            .unwrap_err();
        assert!(matches!(err, GeocodeError::NoResult { .. }));

        let saved = GeocodeCache::load(&path);
        assert_eq!(saved.len(), 1);
        assert_eq!(
            saved.get("millbrae train station california"),
            Some(Coordinates::new(37.6, -122.39))
        );
    }

    #[tokio::test]
    async fn nothing_new_skips_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");

        let mut registry = StationRegistry::new();
        registry.find("Millbrae");
        let mut cache = GeocodeCache::new();
        cache.insert("millbrae train station california", Coordinates::new(37.6, -122.39));

        let mut resolver = Resolver::new(MockGeocoder::new(&[]), cache);
        let looked_up = resolver.resolve_stations_and_save(&registry, &path).await.unwrap();
        assert_eq!(looked_up, 0);
        assert!(!path.exists());
    }
}
