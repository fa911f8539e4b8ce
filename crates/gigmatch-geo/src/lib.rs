//! Geospatial job matching: distance math, radius filtering, geocoding and
//! travel-time provider chains, and the last-known-position cache.

pub mod distance;
pub mod error;
pub mod geocode;
mod http;
pub mod location;
pub mod matcher;
pub mod provider;
pub mod services;
pub mod travel;

pub use distance::{calculate_distance, format_distance, is_location_within_radius};
pub use error::GeoError;
pub use geocode::{GeocodeProvider, GeocodeResult, GeocodingChain, MapsGeocoder, NominatimGeocoder};
pub use location::{
    directions_url, Destination, LocationCache, LocationSnapshot, PositionSource, SystemOpener, UrlOpener,
};
pub use matcher::{filter_jobs_by_location, sort_by_distance};
pub use provider::ProviderOutcome;
pub use services::GeoServices;
pub use travel::{
    DirectionsProvider, HeuristicDirections, MapsDirections, Measure, TravelEstimate,
    TravelEstimator, TravelMode,
};
