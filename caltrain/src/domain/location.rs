//! Geolocatable points.
//!
//! A `Location` is any place a rider or station can be: it has an address,
//! coordinates, or both. Coordinates for addresses are resolved separately
//! (see [`crate::geocode::Resolver`]) and stored in a [`GeocodeCache`]
//! keyed by address, so distance computation itself never touches the
//! network.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geocode::GeocodeCache;

/// Earth radius used for great-circle distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6367.0;

/// Error returned when a distance cannot be computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unable to compute distance from {from} to {to}")]
pub struct DistanceError {
    from: String,
    to: String,
}

impl DistanceError {
    fn new(from: &Location, to: &Location) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both values are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in kilometres.
    pub fn haversine_km(&self, other: &Coordinates) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// A place that may or may not have coordinates yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    address: Option<String>,
    coordinates: Option<Coordinates>,
    cacheable: bool,
}

impl Location {
    /// A location known only by address; coordinates are resolved on demand
    /// and shared through the geocode cache.
    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            coordinates: None,
            cacheable: true,
        }
    }

    /// A location with explicit coordinates. Never written to the cache.
    pub fn from_coordinates(lat: f64, lon: f64) -> Self {
        Self {
            address: None,
            coordinates: Some(Coordinates::new(lat, lon)),
            cacheable: false,
        }
    }

    /// Mark this location as one whose resolved coordinates must not be
    /// shared through the cache (one-off rider addresses).
    pub fn non_cacheable(mut self) -> Self {
        self.cacheable = false;
        self
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// Returns true if this location carries its own coordinates.
    pub fn is_geocoded(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Coordinates held by the location itself, falling back to the cache
    /// entry for its address.
    pub fn coordinates(&self, cache: &GeocodeCache) -> Option<Coordinates> {
        self.coordinates
            .or_else(|| self.address.as_deref().and_then(|a| cache.get(a)))
    }

    /// Set or clear coordinates.
    ///
    /// Setting coordinates on a cacheable location records them under its
    /// address. Clearing them evicts the address from the cache.
    pub fn set_lat_lon(&mut self, coordinates: Option<Coordinates>, cache: &mut GeocodeCache) {
        self.coordinates = coordinates;
        let Some(address) = self.address.as_deref() else {
            return;
        };
        match coordinates {
            None => {
                cache.remove(address);
            }
            Some(c) if self.cacheable => cache.insert(address, c),
            Some(_) => {}
        }
    }

    /// Great-circle distance to `other` in kilometres.
    ///
    /// Both sides must already be resolved, either directly or through the
    /// cache.
    pub fn distance_to(
        &self,
        other: &Location,
        cache: &GeocodeCache,
    ) -> Result<f64, DistanceError> {
        let from = self
            .coordinates(cache)
            .filter(Coordinates::is_valid)
            .ok_or_else(|| DistanceError::new(self, other))?;
        let to = other
            .coordinates(cache)
            .filter(Coordinates::is_valid)
            .ok_or_else(|| DistanceError::new(self, other))?;
        Ok(from.haversine_km(&to))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.address, &self.coordinates) {
            (Some(a), Some(c)) => write!(f, "{a} ({c})"),
            (Some(a), None) => write!(f, "{a} (unresolved)"),
            (None, Some(c)) => write!(f, "({c})"),
            (None, None) => f.write_str("(unknown location)"),
        }
    }
}
