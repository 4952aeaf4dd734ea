//! Timetable schedules and route computation.
//!
//! A [`Schedule`] is one of the four timetables (weekday/weekend ×
//! northbound/southbound): an ordered station list and an aligned matrix of
//! departure times, one column per train run.

mod display;
mod kind;
mod matrix;

pub use display::ScheduleDetails;
pub use kind::{DayType, Direction, ScheduleKind};
pub use matrix::{FastestGroup, Schedule};
