//! Application configuration.

use std::path::PathBuf;

use crate::cache::ScheduleCacheConfig;
use crate::geocode::GeocoderConfig;
use crate::timetable::TimetableConfig;

/// Environment variable holding the Google Maps API key.
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

/// Configuration for the geocode disk cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
}

impl GeocodeCacheConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self::new("caltrain_geocode_cache.json")
    }
}

/// Everything the command-line tool needs to load schedules and resolve
/// locations.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub timetable: TimetableConfig,
    pub geocoder: GeocoderConfig,
    pub schedule_cache: ScheduleCacheConfig,
    pub geocode_cache: GeocodeCacheConfig,
}

impl AppConfig {
    /// Defaults, with the geocoder key taken from the environment.
    pub fn from_env() -> Self {
        Self::with_api_key(std::env::var(API_KEY_VAR).ok())
    }

    /// Defaults with the given geocoder key. Blank keys count as absent.
    pub fn with_api_key(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self {
            geocoder: GeocoderConfig::new(api_key),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.timetable.base_url, "http://www.caltrain.com");
        assert_eq!(config.schedule_cache.path, PathBuf::from("caltrain_route_cache.json"));
        assert_eq!(config.schedule_cache.ttl.as_secs(), 7 * 24 * 60 * 60);
        assert_eq!(config.geocode_cache.path, PathBuf::from("caltrain_geocode_cache.json"));
        assert!(config.geocoder.api_key.is_none());
    }

    #[test]
    fn api_key() {
        let config = AppConfig::with_api_key(Some("secret".into()));
        assert_eq!(config.geocoder.api_key.as_deref(), Some("secret"));

        let config = AppConfig::with_api_key(Some("  ".into()));
        assert!(config.geocoder.api_key.is_none());
    }
}
