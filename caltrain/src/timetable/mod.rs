//! Published timetable retrieval.
//!
//! Fetches the weekday and weekend timetable pages and extracts the table
//! for each direction. Times on the page are 12-hour clock text; morning
//! and afternoon are told apart by typography, which [`row_times`] turns
//! into hour offsets.

mod client;
mod error;
mod html;
mod parse;

pub use client::{ScheduleSource, TimetableClient, TimetableConfig};
pub use error::TimetableError;
pub use parse::{Cell, Timetable, TimetableRow, parse_timetable, row_times};
