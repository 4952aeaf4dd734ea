//! Route planner error types.

use crate::cache::CacheError;
use crate::domain::DistanceError;
use crate::geocode::GeocodeError;
use crate::timetable::TimetableError;

/// Broad failure categories, for callers that only need to know who is at
/// fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A location could not be resolved or measured.
    Geocoding,
    /// No nearest station, or no run from it to the destination.
    Route,
    /// Fetching, parsing or caching schedules failed.
    Collaborator,
    /// The request itself was invalid.
    Usage,
}

/// Errors that can occur while loading schedules or answering a query.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Distance between two locations could not be computed
    #[error(transparent)]
    Distance(#[from] DistanceError),

    /// Geocoder failed to resolve a location
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// The nearest station has no run to the destination
    #[error("No routes from nearest station: {origin}")]
    NoRoute { origin: String },

    /// No station could be chosen as the origin
    #[error("Could not determine nearest station")]
    NoNearestStation,

    /// Destination is not on any schedule
    #[error("Unknown station name: {name}. Use -n to display list.")]
    UnknownStation { name: String },

    /// A schedule could not be fetched or parsed
    #[error("{source} ({schedule})")]
    Build {
        schedule: String,
        source: TimetableError,
    },

    /// Cache write failed
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl PlannerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Distance(_) | Self::Geocode(_) => ErrorKind::Geocoding,
            Self::NoRoute { .. } | Self::NoNearestStation => ErrorKind::Route,
            Self::Build { .. } | Self::Cache(_) => ErrorKind::Collaborator,
            Self::UnknownStation { .. } => ErrorKind::Usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use crate::geocode::GeocodeCache;

    #[test]
    fn error_display() {
        let err = PlannerError::NoRoute {
            origin: "millbrae".into(),
        };
        assert_eq!(err.to_string(), "No routes from nearest station: millbrae");
        assert_eq!(err.kind(), ErrorKind::Route);

        let err = PlannerError::NoNearestStation;
        assert_eq!(err.to_string(), "Could not determine nearest station");

        let err = PlannerError::UnknownStation {
            name: "atlantis".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown station name: atlantis. Use -n to display list."
        );
        assert_eq!(err.kind(), ErrorKind::Usage);

        let err = PlannerError::Build {
            schedule: "Weekday Northbound Schedule".into(),
            source: TimetableError::TableStartNotFound,
        };
        assert_eq!(
            err.to_string(),
            "can't find table start (Weekday Northbound Schedule)"
        );
        assert_eq!(err.kind(), ErrorKind::Collaborator);
    }

    #[test]
    fn geocoding_kinds() {
        let here = Location::from_address("here");
        let distance = here.distance_to(&Location::from_address("there"), &GeocodeCache::new());
        let err = PlannerError::from(distance.unwrap_err());
        assert_eq!(err.kind(), ErrorKind::Geocoding);

        let err = PlannerError::from(GeocodeError::MissingAddress);
        assert_eq!(err.kind(), ErrorKind::Geocoding);

        let err = PlannerError::from(GeocodeError::NoResult {
            address: "atlantis".into(),
        });
        assert_eq!(err.to_string(), "couldn't resolve \"atlantis\" to lat,lon. Try another.");
    }
}
