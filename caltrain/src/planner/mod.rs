//! Route planning across the four Caltrain schedules.
//!
//! Given where a rider is, when they want to leave, and which station they
//! are heading for, the planner picks the nearest station, the schedule
//! that runs from there toward the destination, and the earliest or fastest
//! departures on it.
//!
//! Loading happens once, up front: schedules come from the disk cache or
//! the timetable source, station coordinates are resolved, and only then is
//! a [`RoutePlanner`] built to answer queries.

mod error;
mod load;
mod route;
mod schedules;

pub use error::{ErrorKind, PlannerError};
pub use load::load_schedules;
pub use route::{RouteAnswer, RoutePlanner};
pub use schedules::ScheduleSet;
