//! The four schedules a planner works from.

use crate::schedule::{DayType, Direction, Schedule, ScheduleKind};

/// Weekday and weekend schedules in both directions.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSet {
    pub weekday_northbound: Schedule,
    pub weekday_southbound: Schedule,
    pub weekend_northbound: Schedule,
    pub weekend_southbound: Schedule,
}

impl ScheduleSet {
    /// Build from schedules in [`ScheduleKind::ALL`] order.
    ///
    /// Returns `None` unless exactly four schedules are given.
    pub fn from_vec(schedules: Vec<Schedule>) -> Option<Self> {
        let [weekday_northbound, weekday_southbound, weekend_northbound, weekend_southbound] =
            <[Schedule; 4]>::try_from(schedules).ok()?;
        Some(Self {
            weekday_northbound,
            weekday_southbound,
            weekend_northbound,
            weekend_southbound,
        })
    }

    pub fn get(&self, kind: ScheduleKind) -> &Schedule {
        match (kind.day, kind.direction) {
            (DayType::Weekday, Direction::Northbound) => &self.weekday_northbound,
            (DayType::Weekday, Direction::Southbound) => &self.weekday_southbound,
            (DayType::Weekend, Direction::Northbound) => &self.weekend_northbound,
            (DayType::Weekend, Direction::Southbound) => &self.weekend_southbound,
        }
    }

    pub fn get_mut(&mut self, kind: ScheduleKind) -> &mut Schedule {
        match (kind.day, kind.direction) {
            (DayType::Weekday, Direction::Northbound) => &mut self.weekday_northbound,
            (DayType::Weekday, Direction::Southbound) => &mut self.weekday_southbound,
            (DayType::Weekend, Direction::Northbound) => &mut self.weekend_northbound,
            (DayType::Weekend, Direction::Southbound) => &mut self.weekend_southbound,
        }
    }

    /// Northbound and southbound schedules for a day type.
    pub fn pair(&self, day: DayType) -> (&Schedule, &Schedule) {
        (
            self.get(ScheduleKind::new(day, Direction::Northbound)),
            self.get(ScheduleKind::new(day, Direction::Southbound)),
        )
    }

    /// True if any schedule stops at `name`.
    pub fn serves(&self, name: &str) -> bool {
        self.iter().any(|s| s.find_station(name).is_some())
    }

    /// All four schedules in [`ScheduleKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &Schedule> {
        ScheduleKind::ALL.into_iter().map(|kind| self.get(kind))
    }
}
