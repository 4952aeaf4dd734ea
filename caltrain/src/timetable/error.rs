//! Timetable retrieval error types.

/// Errors that can occur while fetching or extracting a timetable.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("can't retrieve {url}: status {status}")]
    Api { url: String, status: u16 },

    /// Page was fetched but had no content
    #[error("got blank timetable page")]
    Blank,

    /// No table carries the expected summary
    #[error("can't find table summary match: {summary}")]
    SummaryNotFound { summary: String },

    /// Summary found but no enclosing table start
    #[error("can't find table start")]
    TableStartNotFound,

    /// Table start found but no end tag
    #[error("can't find table end")]
    TableEndNotFound,
}
