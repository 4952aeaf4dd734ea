//! Domain types for the Caltrain route planner.
//!
//! Timetable times, geolocatable points and stations. These carry no I/O;
//! coordinates for addresses come from the geocode cache, filled in by the
//! resolver before any query runs.

mod location;
mod station;
mod time;

pub use location::{Coordinates, DistanceError, EARTH_RADIUS_KM, Location};
pub use station::{Station, StationRegistry, normalize_name};
pub use time::{ClockTime, INVALID_TIME_PLACEHOLDER, Time, format_duration};
