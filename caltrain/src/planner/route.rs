//! Route queries over loaded schedules.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{ClockTime, Location, Station};
use crate::geocode::GeocodeCache;
use crate::schedule::{DayType, FastestGroup, Schedule};

use super::error::PlannerError;
use super::schedules::ScheduleSet;

/// The outcome of a route query.
///
/// `origin` is the station nearest the rider, when one could be found;
/// `result` is absent when no run goes from there to the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAnswer<T> {
    pub origin: Option<String>,
    pub result: Option<T>,
}

impl<T> RouteAnswer<T> {
    /// Turn a missing origin or result into the matching error.
    pub fn into_result(self) -> Result<(String, T), PlannerError> {
        match (self.origin, self.result) {
            (Some(origin), Some(result)) => Ok((origin, result)),
            (Some(origin), None) => Err(PlannerError::NoRoute { origin }),
            (None, _) => Err(PlannerError::NoNearestStation),
        }
    }
}

/// Origin station and the schedule to ride for one query.
struct Departure<'a> {
    origin: Option<&'a Arc<Station>>,
    schedule: Option<&'a Schedule>,
}

/// Answers route queries against the four loaded schedules.
///
/// Built once loading and station geocoding are finished; queries only
/// read the schedules and the geocode cache.
#[derive(Debug)]
pub struct RoutePlanner {
    schedules: ScheduleSet,
    geocodes: GeocodeCache,
}

impl RoutePlanner {
    pub fn new(schedules: ScheduleSet, geocodes: GeocodeCache) -> Self {
        Self {
            schedules,
            geocodes,
        }
    }

    /// Every station on any schedule, sorted, without duplicates.
    pub fn list_stations(&self) -> Vec<&str> {
        self.schedules
            .iter()
            .flat_map(Schedule::list_stations)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_valid_station_name(&self, name: &str) -> bool {
        self.schedules.serves(name)
    }

    /// Choose the origin station and the schedule to route on.
    ///
    /// The nearest station is found on the northbound schedule for the day
    /// type, on the assumption that both directions serve the same stops.
    /// The schedule is whichever direction reaches the destination from it.
    fn select_departure(
        &self,
        when: NaiveDateTime,
        start: &Location,
        destination: &str,
    ) -> Result<Departure<'_>, PlannerError> {
        let day = DayType::of(when.date());
        let (north, south) = self.schedules.pair(day);

        let Some(origin) = north.find_nearest_station(start, &self.geocodes)? else {
            return Ok(Departure {
                origin: None,
                schedule: None,
            });
        };

        let schedule = [north, south]
            .into_iter()
            .find(|s| s.is_valid_direction(origin.name(), destination));
        debug!(
            ?day,
            origin = origin.name(),
            destination,
            schedule = schedule.map(Schedule::name),
            "Selected departure"
        );

        Ok(Departure {
            origin: Some(origin),
            schedule,
        })
    }

    /// Earliest departure from the station nearest `start` that reaches
    /// `destination`.
    pub fn get_earliest(
        &self,
        when: NaiveDateTime,
        start: &Location,
        destination: &str,
    ) -> Result<RouteAnswer<ClockTime>, PlannerError> {
        let departure = self.select_departure(when, start, destination)?;
        let origin = departure.origin.map(|st| st.name().to_string());
        let result = match (&origin, departure.schedule) {
            (Some(o), Some(s)) => s.get_earliest(when.time(), o, destination),
            _ => None,
        };
        Ok(RouteAnswer { origin, result })
    }

    /// Departures from the station nearest `start`, grouped by trip
    /// duration, shortest first.
    pub fn get_fastest(
        &self,
        when: NaiveDateTime,
        start: &Location,
        destination: &str,
        want_all: bool,
    ) -> Result<RouteAnswer<Vec<FastestGroup>>, PlannerError> {
        let departure = self.select_departure(when, start, destination)?;
        let origin = departure.origin.map(|st| st.name().to_string());
        let result = match (&origin, departure.schedule) {
            (Some(o), Some(s)) => s.get_fastest(when.time(), o, destination, want_all),
            _ => None,
        };
        Ok(RouteAnswer { origin, result })
    }

    /// Listing of all four schedules, optionally for one station.
    pub fn details(&self, only_station: Option<&str>) -> String {
        self.schedules
            .iter()
            .map(|s| s.details(only_station).to_string())
            .collect()
    }
}
