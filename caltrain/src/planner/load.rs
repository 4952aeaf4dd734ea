//! Loading the four schedules from cache or from the timetable source.

use futures::future::join_all;
use tracing::{info, warn};

use crate::cache::ScheduleCache;
use crate::domain::StationRegistry;
use crate::schedule::{Schedule, ScheduleKind};
use crate::timetable::{ScheduleSource, TimetableError};

use super::error::PlannerError;
use super::schedules::ScheduleSet;

/// Weekend bus stops that duplicate San Jose station, per direction. The
/// two timetables abbreviate it differently.
const WEEKEND_DUPLICATE_STOPS: [(ScheduleKind, &str); 2] = [
    (ScheduleKind::WEEKEND_NORTHBOUND, "s.j."),
    (ScheduleKind::WEEKEND_SOUTHBOUND, "sj"),
];

/// Wrap a fetch failure with the name of the schedule being built.
fn build_error(kind: ScheduleKind) -> impl FnOnce(TimetableError) -> PlannerError {
    move |source| PlannerError::Build {
        schedule: kind.schedule_name(),
        source,
    }
}

/// Load all four schedules.
///
/// Uses the disk cache unless `rebuild` is set or the cache is unusable.
/// Otherwise every timetable is fetched, the weekend duplicate stops are
/// dropped, and the result is written back to the cache. A failed cache
/// write is logged and does not fail the load.
pub async fn load_schedules<S: ScheduleSource>(
    source: &S,
    cache: &ScheduleCache,
    registry: &mut StationRegistry,
    rebuild: bool,
) -> Result<ScheduleSet, PlannerError> {
    if !rebuild && let Some(schedules) = cache.load(registry) {
        info!(stations = registry.len(), "Using cached schedules");
        return Ok(schedules);
    }

    info!(rebuild, "Fetching timetables");
    let fetched = join_all(ScheduleKind::ALL.map(|kind| source.fetch(kind))).await;

    let mut schedules = ScheduleSet::default();
    for (kind, result) in ScheduleKind::ALL.into_iter().zip(fetched) {
        let timetable = result.map_err(build_error(kind))?;
        *schedules.get_mut(kind) = Schedule::from_timetable(timetable, registry);
    }

    for (kind, stop) in WEEKEND_DUPLICATE_STOPS {
        schedules.get_mut(kind).delete_station(stop);
        registry.forget(stop);
    }

    if let Err(e) = cache.save(&schedules) {
        warn!(path = %cache.path().display(), error = %e, "Failed to save schedule cache");
    }

    Ok(schedules)
}
