//! Disk cache for the four parsed schedules.
//!
//! Fetching and parsing the timetable pages is slow and the timetables
//! rarely change, so the parsed schedules are written to a JSON file and
//! reused until the entry expires. Times are stored as minutes from the
//! start of the service day so that after-midnight runs survive the trip.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{ClockTime, StationRegistry, Time};
use crate::planner::ScheduleSet;
use crate::schedule::{Schedule, ScheduleKind};

/// Default cache TTL: one week.
const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Errors writing a cache file.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem operation failed
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("failed to serialize cache: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize `value` as pretty JSON to `path`, creating parent directories.
pub(crate) fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
    let io_err = |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(io_err)
}

/// One schedule as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
struct CachedSchedule {
    name: String,
    stations: Vec<String>,
    /// Per station, per run: minutes from the start of the service day.
    times: Vec<Vec<Option<u32>>>,
}

impl CachedSchedule {
    fn from_schedule(schedule: &Schedule) -> Self {
        let stations = schedule.list_stations().into_iter().map(str::to_string).collect();
        let times = (0..schedule.stations().len())
            .map(|i| {
                schedule
                    .times(i)
                    .unwrap_or_default()
                    .iter()
                    .map(|t| t.get().map(|c| c.minutes()))
                    .collect()
            })
            .collect();
        Self {
            name: schedule.name().to_string(),
            stations,
            times,
        }
    }

    fn into_schedule(self, registry: &mut StationRegistry) -> Option<Schedule> {
        if self.stations.len() != self.times.len() {
            return None;
        }
        let mut schedule = Schedule::new(self.name);
        for (station, row) in self.stations.iter().zip(self.times) {
            let times = row
                .into_iter()
                .map(|m| m.map_or_else(Time::invalid, |m| Time::from(ClockTime::from_minutes(m))))
                .collect();
            schedule.add_station_with_times(station, times, registry);
        }
        Some(schedule)
    }
}

/// Cached schedules with metadata.
#[derive(Debug, Serialize, Deserialize)]
struct CachedSchedules {
    /// Unix timestamp when the cache was written.
    cached_at_secs: u64,
    /// The four schedules, in [`ScheduleKind::ALL`] order.
    schedules: Vec<CachedSchedule>,
}

/// Configuration for the schedule disk cache.
#[derive(Debug, Clone)]
pub struct ScheduleCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// How long the cache remains valid.
    pub ttl: Duration,
}

impl ScheduleCacheConfig {
    /// Create a new cache config with the given path and default TTL (one week).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for ScheduleCacheConfig {
    fn default() -> Self {
        Self::new("caltrain_route_cache.json")
    }
}

/// Disk cache for the four schedules.
#[derive(Debug, Clone)]
pub struct ScheduleCache {
    config: ScheduleCacheConfig,
}

impl ScheduleCache {
    pub fn new(config: ScheduleCacheConfig) -> Self {
        Self { config }
    }

    /// Try to load the schedules, registering their stations.
    ///
    /// Returns `None` if the cache doesn't exist, is invalid, or has
    /// expired. The registry is only touched on success.
    pub fn load(&self, registry: &mut StationRegistry) -> Option<ScheduleSet> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let cached: CachedSchedules = match serde_json::from_str(&contents) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    path = %self.config.path.display(),
                    error = %e,
                    "Ignoring corrupt schedule cache"
                );
                return None;
            }
        };

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();
        let age_secs = now.saturating_sub(cached.cached_at_secs);
        if age_secs >= self.config.ttl.as_secs() {
            debug!(age_secs, "Schedule cache expired");
            return None;
        }

        let mut scratch = registry.clone();
        let mut schedules = Vec::with_capacity(ScheduleKind::ALL.len());
        for cached_schedule in cached.schedules {
            schedules.push(cached_schedule.into_schedule(&mut scratch)?);
        }
        let set = ScheduleSet::from_vec(schedules)?;

        *registry = scratch;
        debug!(
            path = %self.config.path.display(),
            stations = registry.len(),
            "Loaded schedule cache"
        );
        Some(set)
    }

    /// Save the schedules, creating parent directories if needed.
    pub fn save(&self, schedules: &ScheduleSet) -> Result<(), CacheError> {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());

        let cached = CachedSchedules {
            cached_at_secs: now,
            schedules: schedules.iter().map(CachedSchedule::from_schedule).collect(),
        };
        write_json_file(&self.config.path, &cached)
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}
