//! Google Geocoding API client.

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinates;

use super::error::GeocodeError;

/// Default base URL for the Google Geocoding API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode";

/// Resolves an address to coordinates.
///
/// This abstraction allows the resolver to be tested without network access.
pub trait Geocoder {
    /// Look up `address`, failing if it cannot be resolved.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send;
}

/// Top-level geocoding response.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// API key passed as the `key` query parameter
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Create a new config with an optional API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
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

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Geocoder backed by the Google Geocoding JSON API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }
}

impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let url = format!("{}/json", self.base_url);

        let mut query = vec![("address", address)];
        if let Some(key) = &self.api_key {
            query.push(("key", key.as_str()));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let coordinates = parse_response(&body, address)?;
        debug!(address, %coordinates, "Geocoded address");
        Ok(coordinates)
    }
}

/// Extract the first result's coordinates from a geocoding response body.
fn parse_response(body: &str, address: &str) -> Result<Coordinates, GeocodeError> {
    let response: GeocodeResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Json {
            message: e.to_string(),
        })?;

    match response.status.as_str() {
        "OK" => response
            .results
            .first()
            .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng))
            .ok_or_else(|| GeocodeError::NoResult {
                address: address.to_string(),
            }),
        "ZERO_RESULTS" => Err(GeocodeError::NoResult {
            address: address.to_string(),
        }),
        other => Err(GeocodeError::Api {
            status: 200,
            message: match response.error_message {
                Some(msg) => format!("{other}: {msg}"),
                None => other.to_string(),
            },
        }),
    }
}
