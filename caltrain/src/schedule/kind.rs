//! Which of the four timetables a schedule is.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

/// Weekday or weekend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    /// Monday to Friday run the weekday timetable; Saturday and Sunday the
    /// weekend one.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }
}

/// Direction of travel along the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Northbound,
    Southbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Northbound => "Northbound",
            Direction::Southbound => "Southbound",
        })
    }
}

/// One (day type, direction) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleKind {
    pub day: DayType,
    pub direction: Direction,
}

impl ScheduleKind {
    pub const WEEKDAY_NORTHBOUND: Self = Self::new(DayType::Weekday, Direction::Northbound);
    pub const WEEKDAY_SOUTHBOUND: Self = Self::new(DayType::Weekday, Direction::Southbound);
    pub const WEEKEND_NORTHBOUND: Self = Self::new(DayType::Weekend, Direction::Northbound);
    pub const WEEKEND_SOUTHBOUND: Self = Self::new(DayType::Weekend, Direction::Southbound);

    /// All four kinds, in load order.
    pub const ALL: [Self; 4] = [
        Self::WEEKDAY_NORTHBOUND,
        Self::WEEKDAY_SOUTHBOUND,
        Self::WEEKEND_NORTHBOUND,
        Self::WEEKEND_SOUTHBOUND,
    ];

    pub const fn new(day: DayType, direction: Direction) -> Self {
        Self { day, direction }
    }

    /// The service label the timetable page uses for this day type.
    pub fn service_label(&self) -> &'static str {
        match self.day {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend and Holiday",
        }
    }

    /// Display name, e.g. "Weekday Northbound Schedule".
    pub fn schedule_name(&self) -> String {
        format!("{} {} Schedule", self.service_label(), self.direction)
    }
}
