//! Address geocoding.
//!
//! Station and rider addresses are resolved to coordinates through a
//! [`Geocoder`] and remembered in a [`GeocodeCache`] keyed by address. The
//! cache is persisted between runs so stations are only looked up once.

mod cache;
mod client;
mod error;
mod resolver;

pub use cache::GeocodeCache;
pub use client::{Geocoder, GeocoderConfig, GoogleGeocoder};
pub use error::GeocodeError;
pub use resolver::Resolver;
