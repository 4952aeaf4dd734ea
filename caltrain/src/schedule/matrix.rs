//! The station × run time matrix and the route computations over it.
//!
//! A schedule is a list of stations in direction of travel, and for each
//! station a row of times with one column per train run. Two stations are
//! connected by a run when both rows hold a valid time in that run's column.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveTime};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use crate::domain::{
    ClockTime, DistanceError, Location, Station, StationRegistry, Time, format_duration,
};
use crate::geocode::GeocodeCache;
use crate::timetable::Timetable;

use super::display::ScheduleDetails;

/// Departures sharing one trip duration.
///
/// Serializes as a single-entry map from the formatted duration to the
/// departure times, e.g. `{"0:45:00": ["08:00"]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastestGroup {
    pub duration: Duration,
    pub departures: Vec<ClockTime>,
}

impl Serialize for FastestGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let departures: Vec<String> = self.departures.iter().map(ToString::to_string).collect();
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&format_duration(self.duration), &departures)?;
        map.end()
    }
}

impl fmt::Display for FastestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", format_duration(self.duration))?;
        for (i, t) in self.departures.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{t}")?;
        }
        Ok(())
    }
}

/// One direction/day-type timetable.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    name: String,
    stations: Vec<Arc<Station>>,
    times: Vec<Vec<Time>>,
}

impl Schedule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stations: Vec::new(),
            times: Vec::new(),
        }
    }

    /// Build a schedule from parsed timetable rows, registering stations.
    pub fn from_timetable(timetable: Timetable, registry: &mut StationRegistry) -> Self {
        let mut schedule = Self::new(timetable.name);
        for row in timetable.rows {
            schedule.add_station_with_times(&row.station, row.times, registry);
        }
        schedule
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stations(&self) -> &[Arc<Station>] {
        &self.stations
    }

    /// The time row for the station at `index`.
    pub fn times(&self, index: usize) -> Option<&[Time]> {
        self.times.get(index).map(Vec::as_slice)
    }

    /// Number of train runs (columns).
    pub fn run_count(&self) -> usize {
        self.times.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Append a station and its time row.
    ///
    /// The first row fixes the number of runs; rows of a different length
    /// are kept but logged, and runs beyond the shorter row never connect.
    pub fn add_station_with_times(
        &mut self,
        name: &str,
        times: Vec<Time>,
        registry: &mut StationRegistry,
    ) {
        let runs = self.run_count();
        if !self.times.is_empty() && times.len() != runs {
            warn!(
                schedule = %self.name,
                station = name,
                expected = runs,
                got = times.len(),
                "Ragged timetable row"
            );
        }
        self.stations.push(registry.find(name));
        self.times.push(times);
    }

    /// Index of the station matching `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.stations.iter().position(|st| st.is_named(name))
    }

    /// The station matching `name`, if it is on this schedule.
    pub fn find_station(&self, name: &str) -> Option<&Arc<Station>> {
        self.position(name).map(|i| &self.stations[i])
    }

    /// Remove a station and its time row. Returns true if it was present.
    pub fn delete_station(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.stations.remove(idx);
                self.times.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Station names in schedule order.
    pub fn list_stations(&self) -> Vec<&str> {
        self.stations.iter().map(|st| st.name()).collect()
    }

    /// The station closest to `point`.
    ///
    /// Ties go to the station listed first. Every station and the point must
    /// already be resolved in `cache`.
    pub fn find_nearest_station(
        &self,
        point: &Location,
        cache: &GeocodeCache,
    ) -> Result<Option<&Arc<Station>>, DistanceError> {
        let mut nearest: Option<(&Arc<Station>, f64)> = None;
        for st in &self.stations {
            let dist = st.distance_to(point, cache)?;
            if nearest.is_none_or(|(_, best)| dist < best) {
                nearest = Some((st, dist));
            }
        }
        Ok(nearest.map(|(st, _)| st))
    }

    /// True if both stations are on this schedule and the destination is
    /// not behind the origin. A station is reachable from itself.
    pub fn is_valid_direction(&self, origin: &str, destination: &str) -> bool {
        match (self.position(origin), self.position(destination)) {
            (Some(o), Some(d)) => o <= d,
            _ => false,
        }
    }

    /// Runs serving both stations that leave the origin at or after `when`,
    /// as (departure, arrival) pairs in run order.
    fn qualifying_runs(
        &self,
        when: NaiveTime,
        origin: &str,
        destination: &str,
    ) -> Vec<(ClockTime, ClockTime)> {
        if !self.is_valid_direction(origin, destination) {
            return Vec::new();
        }
        let (Some(o), Some(d)) = (self.position(origin), self.position(destination)) else {
            return Vec::new();
        };
        let now = ClockTime::of_day(when);

        self.times[o]
            .iter()
            .zip(&self.times[d])
            .filter_map(|(dep, arr)| Some((dep.get()?, arr.get()?)))
            .filter(|(dep, _)| *dep >= now)
            .collect()
    }

    /// Earliest departure from `origin` at or after `when` on a run that
    /// also serves `destination`.
    pub fn get_earliest(
        &self,
        when: NaiveTime,
        origin: &str,
        destination: &str,
    ) -> Option<ClockTime> {
        self.qualifying_runs(when, origin, destination)
            .into_iter()
            .map(|(dep, _)| dep)
            .min()
    }

    /// Departures grouped by trip duration, shortest first.
    ///
    /// With `want_all` false only the shortest group is returned, cut down
    /// to its earliest departure.
    pub fn get_fastest(
        &self,
        when: NaiveTime,
        origin: &str,
        destination: &str,
        want_all: bool,
    ) -> Option<Vec<FastestGroup>> {
        let mut by_duration: BTreeMap<Duration, Vec<ClockTime>> = BTreeMap::new();
        for (dep, arr) in self.qualifying_runs(when, origin, destination) {
            by_duration.entry(dep.time_delta(arr)).or_default().push(dep);
        }

        let mut groups: Vec<FastestGroup> = by_duration
            .into_iter()
            .map(|(duration, mut departures)| {
                departures.sort_unstable();
                FastestGroup {
                    duration,
                    departures,
                }
            })
            .collect();

        if groups.is_empty() {
            return None;
        }
        if !want_all {
            groups.truncate(1);
            groups[0].departures.truncate(1);
        }
        Some(groups)
    }

    /// Render the station-by-station listing, optionally for one station.
    pub fn details<'a>(&'a self, only_station: Option<&'a str>) -> ScheduleDetails<'a> {
        ScheduleDetails::new(self, only_station)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> ClockTime {
        ClockTime::from_hm(h, m).unwrap()
    }

    /// Parse 24-hour "HH:MM" cells, "--" for none.
    fn row(cells: &[&str]) -> Vec<Time> {
        cells
            .iter()
            .map(|c| match c.split_once(':') {
                Some((h, m)) => Time::from(hm(h.parse().unwrap(), m.parse().unwrap())),
                None => Time::invalid(),
            })
            .collect()
    }

    fn schedule(rows: &[(&str, &[&str])]) -> (Schedule, StationRegistry) {
        let mut registry = StationRegistry::new();
        let mut s = Schedule::new("Test Northbound Schedule");
        for (name, cells) in rows {
            s.add_station_with_times(name, row(cells), &mut registry);
        }
        (s, registry)
    }

    fn abc() -> Schedule {
        schedule(&[
            ("A", &["08:00", "09:00"]),
            ("B", &["08:20", "--"]),
            ("C", &["08:45", "09:40"]),
        ])
        .0
    }

    #[test]
    fn earliest_scenarios() {
        let s = abc();
        assert_eq!(s.get_earliest(at(7, 0), "A", "C"), Some(hm(8, 0)));
        assert_eq!(s.get_earliest(at(7, 0), "B", "C"), Some(hm(8, 20)));
        assert_eq!(s.get_earliest(at(8, 30), "A", "C"), Some(hm(9, 0)));
        assert_eq!(s.get_earliest(at(8, 30), "B", "C"), None);
        assert_eq!(s.get_earliest(at(7, 0), "A", "C").unwrap().to_string(), "08:00");
    }

    #[test]
    fn earliest_includes_exact_departure() {
        let s = abc();
        assert_eq!(s.get_earliest(at(9, 0), "A", "C"), Some(hm(9, 0)));
    }

    #[test]
    fn earliest_rejects_wrong_direction() {
        let s = abc();
        assert!(!s.is_valid_direction("C", "A"));
        assert_eq!(s.get_earliest(at(7, 0), "C", "A"), None);
        assert_eq!(s.get_fastest(at(7, 0), "C", "A", true), None);
    }

    #[test]
    fn direction_validity() {
        let s = abc();
        assert!(s.is_valid_direction("A", "A"));
        assert!(s.is_valid_direction("A", "C"));
        assert!(s.is_valid_direction(" a ", "c"));
        assert!(!s.is_valid_direction("A", "Z"));
        assert!(!s.is_valid_direction("Z", "A"));
    }

    #[test]
    fn nothing_after_last_departure() {
        let s = abc();
        assert_eq!(s.get_earliest(at(22, 0), "A", "C"), None);
        assert_eq!(s.get_fastest(at(22, 0), "A", "C", true), None);
        assert_eq!(s.get_fastest(at(22, 0), "A", "C", false), None);
    }

    #[test]
    fn fastest_groups_by_duration() {
        let s = abc();
        let all = s.get_fastest(at(7, 0), "A", "C", true).unwrap();
        // 09:00 → 09:40 beats 08:00 → 08:45.
        assert_eq!(
            all,
            vec![
                FastestGroup {
                    duration: Duration::minutes(40),
                    departures: vec![hm(9, 0)],
                },
                FastestGroup {
                    duration: Duration::minutes(45),
                    departures: vec![hm(8, 0)],
                },
            ]
        );

        let one = s.get_fastest(at(7, 0), "A", "C", false).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].departures, vec![hm(9, 0)]);
    }

    #[test]
    fn fastest_json_shape() {
        let (s, _) = schedule(&[("A", &["08:00", "09:00"]), ("C", &["08:45", "09:55"])]);

        let all = s.get_fastest(at(7, 0), "A", "C", true).unwrap();
        assert_eq!(
            serde_json::to_value(&all).unwrap(),
            serde_json::json!([{"0:45:00": ["08:00"]}, {"0:55:00": ["09:00"]}])
        );

        let one = s.get_fastest(at(7, 0), "A", "C", false).unwrap();
        assert_eq!(
            serde_json::to_value(&one).unwrap(),
            serde_json::json!([{"0:45:00": ["08:00"]}])
        );
    }

    #[test]
    fn fastest_single_is_earliest_of_shortest_group() {
        let (s, _) = schedule(&[
            ("A", &["10:00", "08:00", "09:00", "11:00"]),
            ("C", &["10:30", "08:40", "09:30", "11:50"]),
        ]);
        let all = s.get_fastest(at(7, 0), "A", "C", true).unwrap();
        assert_eq!(all[0].duration, Duration::minutes(30));
        assert_eq!(all[0].departures, vec![hm(9, 0), hm(10, 0)]);
        assert_eq!(all.len(), 3);

        let one = s.get_fastest(at(7, 0), "A", "C", false).unwrap();
        assert_eq!(one, vec![FastestGroup {
            duration: Duration::minutes(30),
            departures: vec![hm(9, 0)],
        }]);
    }

    #[test]
    fn after_midnight_runs_sort_last() {
        let mut registry = StationRegistry::new();
        let mut s = Schedule::new("Late");
        let a_times = vec![Time::parse("11:04", 12), Time::parse("12:25", 24)];
        let c_times = vec![Time::parse("11:53", 12), Time::parse("1:14", 24)];
        s.add_station_with_times("A", a_times, &mut registry);
        s.add_station_with_times("C", c_times, &mut registry);

        assert_eq!(s.get_earliest(at(23, 30), "A", "C").unwrap().to_string(), "00:25");
        let all = s.get_fastest(at(22, 0), "A", "C", true).unwrap();
        assert_eq!(
            serde_json::to_value(&all).unwrap(),
            serde_json::json!([{"0:49:00": ["23:04", "00:25"]}])
        );
    }

    #[test]
    fn shared_registry_shares_stations() {
        let mut registry = StationRegistry::new();
        let mut north = Schedule::new("N");
        let mut south = Schedule::new("S");
        north.add_station_with_times("Palo Alto", row(&["08:00"]), &mut registry);
        south.add_station_with_times("palo alto", row(&["09:00"]), &mut registry);
        assert!(Arc::ptr_eq(
            north.find_station("PALO ALTO").unwrap(),
            south.find_station("palo alto").unwrap()
        ));
    }

    #[test]
    fn delete_station_keeps_rows_aligned() {
        let mut s = abc();
        assert!(s.delete_station("b"));
        assert!(!s.delete_station("b"));
        assert_eq!(s.list_stations(), vec!["a", "c"]);
        assert_eq!(s.times(1).unwrap(), row(&["08:45", "09:40"]).as_slice());
        assert_eq!(s.run_count(), 2);
    }

    #[test]
    fn nearest_station_scan() {
        let (s, _) = schedule(&[("A", &["08:00"]), ("B", &["08:10"]), ("C", &["08:20"])]);
        let mut cache = GeocodeCache::new();
        cache.insert("a train station california", Coordinates::new(37.0, -122.0));
        cache.insert("b train station california", Coordinates::new(37.5, -122.0));
        cache.insert("c train station california", Coordinates::new(37.5, -122.0));

        let rider = Location::from_coordinates(37.45, -122.0);
        let nearest = s.find_nearest_station(&rider, &cache).unwrap().unwrap();
        // B and C tie; the first listed wins.
        assert_eq!(nearest.name(), "b");
    }

    #[test]
    fn nearest_station_empty_schedule() {
        let s = Schedule::new("Empty");
        let rider = Location::from_coordinates(37.45, -122.0);
        assert!(s.find_nearest_station(&rider, &GeocodeCache::new()).unwrap().is_none());
    }

    #[test]
    fn nearest_station_unresolved_fails() {
        let (s, _) = schedule(&[("A", &["08:00"])]);
        let rider = Location::from_coordinates(37.45, -122.0);
        assert!(s.find_nearest_station(&rider, &GeocodeCache::new()).is_err());
    }

    #[test]
    fn from_timetable_builds_rows() {
        use crate::timetable::TimetableRow;

        let mut registry = StationRegistry::new();
        let timetable = Timetable {
            name: "Weekday Northbound Schedule".into(),
            rows: vec![
                TimetableRow {
                    station: "Tamien".into(),
                    times: row(&["06:00", "--"]),
                },
                TimetableRow {
                    station: "San Jose Diridon".into(),
                    times: row(&["06:07", "07:00"]),
                },
            ],
        };
        let s = Schedule::from_timetable(timetable, &mut registry);
        assert_eq!(s.name(), "Weekday Northbound Schedule");
        assert_eq!(s.list_stations(), vec!["tamien", "san jose diridon"]);
        assert_eq!(registry.len(), 2);
    }
}
