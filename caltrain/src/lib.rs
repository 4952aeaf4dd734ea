//! Caltrain route planner.
//!
//! Answers: "I'm here, it's now, I want to get to that station. Which
//! station do I leave from, and when?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod geocode;
pub mod planner;
pub mod schedule;
pub mod timetable;
