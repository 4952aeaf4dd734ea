//! Stations and the station registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::geocode::GeocodeCache;

use super::location::{DistanceError, Location};

/// Suffix appended to a station name to form its geocoding address.
const ADDRESS_SUFFIX: &str = " train station california";

/// Fold case and whitespace so that "  Palo  Alto" and "palo alto" name the
/// same station.
///
/// # Examples
///
/// ```
/// use caltrain::domain::normalize_name;
///
/// assert_eq!(normalize_name("  San  Jose Diridon "), "san jose diridon");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A timetable stop.
///
/// Identity is the normalized name. Stations are created through a
/// [`StationRegistry`] so that every schedule mentioning a stop shares one
/// instance, and therefore one resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    name: String,
    location: Location,
}

impl Station {
    fn new(normalized: String) -> Self {
        let location = Location::from_address(format!("{normalized}{ADDRESS_SUFFIX}"));
        Self {
            name: normalized,
            location,
        }
    }

    /// The normalized station name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns true if `name` normalizes to this station's name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == normalize_name(name)
    }

    /// Distance in kilometres from this station to `point`.
    pub fn distance_to(
        &self,
        point: &Location,
        cache: &GeocodeCache,
    ) -> Result<f64, DistanceError> {
        self.location.distance_to(point, cache)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// At most one [`Station`] per normalized name.
///
/// Populated while schedules are built, then read-only for the rest of the
/// process.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: HashMap<String, Arc<Station>>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the registered station for `name`, creating it if absent.
    pub fn find(&mut self, name: &str) -> Arc<Station> {
        let normalized = normalize_name(name);
        self.stations
            .entry(normalized)
            .or_insert_with_key(|key| Arc::new(Station::new(key.clone())))
            .clone()
    }

    /// Look up a station without creating it.
    pub fn get(&self, name: &str) -> Option<&Arc<Station>> {
        self.stations.get(&normalize_name(name))
    }

    /// Drop a station from the registry.
    ///
    /// Schedules that already hold the station keep their reference; the
    /// registry simply stops handing it out and stops resolving it.
    pub fn forget(&mut self, name: &str) -> Option<Arc<Station>> {
        self.stations.remove(&normalize_name(name))
    }

    /// All registered stations, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Station>> {
        self.stations.values()
    }

    /// Registered station names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
