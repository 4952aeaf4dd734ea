//! Geocoding error types.

/// Errors that can occur while resolving an address to coordinates.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("geocoder network failure: {0}")]
    Http(#[from] reqwest::Error),

    /// Geocoder returned an error status
    #[error("geocoder error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("geocoder response parse error: {message}")]
    Json { message: String },

    /// The geocoder answered but found nothing
    #[error("couldn't resolve {address:?} to lat,lon. Try another.")]
    NoResult { address: String },

    /// The location has neither coordinates nor an address
    #[error("location has no address to geocode")]
    MissingAddress,
}
