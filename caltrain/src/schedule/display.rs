//! Plain-text schedule listing.

use std::fmt;

use super::matrix::Schedule;

/// Width of the horizontal rules around a schedule name.
const RULE_WIDTH: usize = 80;

/// Column at which departure lists wrap.
const WRAP_WIDTH: usize = 72;

/// A schedule rendered station by station, with each station's valid
/// departures sorted and wrapped.
pub struct ScheduleDetails<'a> {
    schedule: &'a Schedule,
    only_station: Option<&'a str>,
}

impl<'a> ScheduleDetails<'a> {
    pub(super) fn new(schedule: &'a Schedule, only_station: Option<&'a str>) -> Self {
        Self {
            schedule,
            only_station,
        }
    }
}

impl fmt::Display for ScheduleDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "{}", self.schedule.name())?;
        writeln!(f, "{rule}")?;

        for (idx, station) in self.schedule.stations().iter().enumerate() {
            if let Some(only) = self.only_station
                && !station.is_named(only)
            {
                continue;
            }
            writeln!(f, "{station}")?;

            let mut departures: Vec<_> = self
                .schedule
                .times(idx)
                .unwrap_or_default()
                .iter()
                .filter_map(|t| t.get())
                .collect();
            departures.sort_unstable();

            let joined = departures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            for line in wrap(&joined, WRAP_WIDTH) {
                writeln!(f, "\t{line}")?;
            }
        }
        writeln!(f)
    }
}

/// Greedy word wrap on whitespace.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
