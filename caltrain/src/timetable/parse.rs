//! Timetable rows and AM/PM reconstruction.

use crate::domain::Time;
use crate::schedule::ScheduleKind;

use super::error::TimetableError;
use super::html::{find_table, station_rows};

/// One timetable cell, classified by its typography.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// A morning time (set in italics).
    Morning(String),
    /// An afternoon time (set in bold).
    Afternoon(String),
    /// No stop on this run.
    Empty,
}

/// A station and its times, one per run.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableRow {
    pub station: String,
    pub times: Vec<Time>,
}

/// A parsed timetable, ready to become a [`crate::schedule::Schedule`].
#[derive(Debug, Clone, PartialEq)]
pub struct Timetable {
    pub name: String,
    pub rows: Vec<TimetableRow>,
}

/// Turn a row of 12-hour cells into instants.
///
/// Runs are ordered through the day, so the row starts in the morning. The
/// first afternoon cell shifts later cells by 12 hours; a morning cell after
/// that means the row has passed midnight and shifts by 24.
pub fn row_times(cells: &[Cell]) -> Vec<Time> {
    let mut hours_to_add = 0;
    let mut morning = true;

    cells
        .iter()
        .map(|cell| match cell {
            Cell::Morning(text) => {
                if !morning {
                    morning = true;
                    hours_to_add = 24;
                }
                Time::parse(text, hours_to_add)
            }
            Cell::Afternoon(text) => {
                if morning {
                    morning = false;
                    hours_to_add = 12;
                }
                Time::parse(text, hours_to_add)
            }
            Cell::Empty => Time::invalid(),
        })
        .collect()
}

/// Extract the timetable for `kind` from the published page.
pub fn parse_timetable(html: &str, kind: ScheduleKind) -> Result<Timetable, TimetableError> {
    let summary = format!("{} {} service", kind.service_label(), kind.direction);
    let table = find_table(html, &summary)?;

    let rows = station_rows(table)
        .into_iter()
        .map(|raw| TimetableRow {
            times: row_times(&raw.cells),
            station: raw.station,
        })
        .collect();

    Ok(Timetable {
        name: kind.schedule_name(),
        rows,
    })
}
