//! Timetable page client.

use std::future::Future;

use tracing::debug;

use crate::schedule::{DayType, ScheduleKind};

use super::error::TimetableError;
use super::parse::{Timetable, parse_timetable};

/// Default base URL for the published timetables.
const DEFAULT_BASE_URL: &str = "http://www.caltrain.com";

/// Supplies the raw timetable for each schedule kind.
///
/// This abstraction allows loading to be tested with canned timetables.
pub trait ScheduleSource {
    /// Fetch and extract the timetable for `kind`.
    fn fetch(
        &self,
        kind: ScheduleKind,
    ) -> impl Future<Output = Result<Timetable, TimetableError>> + Send;
}

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Base URL of the timetable site
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TimetableConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches timetable pages over HTTP.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    base_url: String,
}

impl TimetableClient {
    pub fn new(config: TimetableConfig) -> Result<Self, TimetableError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// URL of the page holding both directions for a day type.
    pub fn page_url(&self, day: DayType) -> String {
        let when = match day {
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
        };
        format!("{}/schedules/{when}timetable.html", self.base_url)
    }
}

impl ScheduleSource for TimetableClient {
    async fn fetch(&self, kind: ScheduleKind) -> Result<Timetable, TimetableError> {
        let url = self.page_url(kind.day);
        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(TimetableError::Api {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(TimetableError::Blank);
        }
        debug!(url = %url, bytes = body.len(), "Fetched timetable page");

        parse_timetable(&body, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TimetableConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn page_urls() {
        let config = TimetableConfig::new().with_base_url("http://localhost:8080");
        let client = TimetableClient::new(config).unwrap();
        assert_eq!(
            client.page_url(DayType::Weekday),
            "http://localhost:8080/schedules/weekdaytimetable.html"
        );
        assert_eq!(
            client.page_url(DayType::Weekend),
            "http://localhost:8080/schedules/weekendtimetable.html"
        );
    }
}
