//! Timetable time handling.
//!
//! Timetable cells carry 12-hour clock text with no AM/PM marker ("8:05").
//! The marker is implied by the table's typography, so the parser supplies
//! an hour offset (0, 12 or 24) alongside the text. The resulting instants
//! are minutes from the start of the service day and may run past 24:00
//! for trains that leave after midnight.

use chrono::{Duration, NaiveTime, Timelike};
use std::fmt;

/// Minutes in a day, used for display wrap-around.
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Placeholder printed for a timetable cell with no time.
pub const INVALID_TIME_PLACEHOLDER: &str = "--:--";

/// A valid instant within the service day.
///
/// Ordered by instant. Values past midnight (hour offset 24) sort after
/// every same-day value even though they print as early-morning times.
///
/// # Examples
///
/// ```
/// use caltrain::domain::ClockTime;
///
/// let t = ClockTime::from_hm(17, 5).unwrap();
/// assert_eq!(t.to_string(), "17:05");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u32,
}

impl ClockTime {
    /// Create a time from minutes since the start of the service day.
    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Create a time from a 24-hour hour and minute.
    ///
    /// Hours up to 47 are accepted to express times on the following day.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 48 || minute >= 60 {
            return None;
        }
        Some(Self::from_minutes(hour * 60 + minute))
    }

    /// The query instant for a wall-clock time of day.
    ///
    /// Mirrors how timetable cells are read: the 12-hour reading of the
    /// time, shifted into the afternoon band when the hour is 12 or later.
    pub fn of_day(time: NaiveTime) -> Self {
        let hours_to_add = if time.hour() >= 12 { 12 } else { 0 };
        Self::from_minutes(((time.hour() % 12) + hours_to_add) * 60 + time.minute())
    }

    /// Minutes since the start of the service day.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Returns `other - self`.
    pub fn time_delta(&self, other: ClockTime) -> Duration {
        Duration::minutes(i64::from(other.minutes) - i64::from(self.minutes))
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({}+{}m)", self, self.minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let of_day = self.minutes % MINUTES_PER_DAY;
        write!(f, "{:02}:{:02}", of_day / 60, of_day % 60)
    }
}

/// A timetable cell: either a valid instant or nothing.
///
/// `Time` deliberately has no ordering. Callers take the instant out with
/// [`Time::get`] and compare [`ClockTime`] values, so an invalid cell can
/// never take part in a comparison.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Time(Option<ClockTime>);

impl Time {
    /// An invalid time, as produced by an empty or unparsable cell.
    pub fn invalid() -> Self {
        Self(None)
    }

    /// Parse 12-hour clock text and apply an hour offset.
    ///
    /// `hours_to_add` disambiguates AM/PM and day rollover. Unparsable text,
    /// or an offset too large to represent, gives an invalid time. This is
    /// the only way text becomes a `Time`, and the result never changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use caltrain::domain::Time;
    ///
    /// assert_eq!(Time::parse("8:05", 0).to_string(), "08:05");
    /// assert_eq!(Time::parse("5:40", 12).to_string(), "17:40");
    /// assert!(!Time::parse("13:00", 0).is_valid());
    /// ```
    pub fn parse(text: &str, hours_to_add: u32) -> Self {
        let minutes = parse_twelve_hour(text).and_then(|m| {
            hours_to_add
                .checked_mul(60)
                .and_then(|offset| m.checked_add(offset))
        });
        Self(minutes.map(ClockTime::from_minutes))
    }

    /// Returns true if this cell holds an instant.
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// The instant, if valid.
    pub fn get(&self) -> Option<ClockTime> {
        self.0
    }

    /// Returns `other - self`, or `None` unless both times are valid.
    pub fn time_delta(&self, other: &Time) -> Option<Duration> {
        Some(self.0?.time_delta(other.0?))
    }
}

impl From<ClockTime> for Time {
    fn from(time: ClockTime) -> Self {
        Self(Some(time))
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => write!(f, "Time({t:?})"),
            None => f.write_str("Time(invalid)"),
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => fmt::Display::fmt(&t, f),
            None => f.write_str(INVALID_TIME_PLACEHOLDER),
        }
    }
}

/// Parse "h:mm" on a 12-hour clock into minutes after midnight.
///
/// Without a marker the reading is AM, so "12:15" is a quarter past
/// midnight.
fn parse_twelve_hour(text: &str) -> Option<u32> {
    let (hour, minute) = text.split_once(':')?;
    let hour = parse_digits(hour)?;
    let minute = parse_digits(minute)?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    Some((hour % 12) * 60 + minute)
}

/// Parse one or two ASCII digits.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Format a duration the way trip lengths are reported: `H:MM:SS`.
///
/// Whole days are split off as `"N day(s), "`; negative durations borrow a
/// day, so minus fifteen minutes prints as `"-1 day, 23:45:00"`.
///
/// # Examples
///
/// ```
/// use caltrain::domain::format_duration;
/// use chrono::Duration;
///
/// assert_eq!(format_duration(Duration::minutes(45)), "0:45:00");
/// assert_eq!(format_duration(Duration::minutes(-15)), "-1 day, 23:45:00");
/// ```
pub fn format_duration(duration: Duration) -> String {
    const SECS_PER_DAY: i64 = 86_400;
    let total = duration.num_seconds();
    let days = total.div_euclid(SECS_PER_DAY);
    let rem = total.rem_euclid(SECS_PER_DAY);
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 | -1 => format!("{days} day, {clock}"),
        _ => format!("{days} days, {clock}"),
    }
}
