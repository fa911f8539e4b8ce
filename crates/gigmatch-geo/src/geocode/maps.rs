//! Geocoding via a Google-Geocoding-API-compatible mapping service.

use async_trait::async_trait;
use gigmatch_core::Coordinate;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{GeocodeProvider, GeocodeResult};
use crate::error::GeoError;
use crate::http::{endpoint_url, get_json, parse_base_url};
use crate::provider::ProviderOutcome;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeEntry>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    formatted_address: String,
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

/// Only applicable when an API key is configured.
pub struct MapsGeocoder {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl MapsGeocoder {
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(client: Client, api_key: Option<String>, base_url: &str) -> Result<Self, GeoError> {
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl GeocodeProvider for MapsGeocoder {
    fn name(&self) -> &'static str {
        "maps"
    }

    async fn attempt(
        &self,
        address: &str,
    ) -> Result<ProviderOutcome<Option<GeocodeResult>>, GeoError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(ProviderOutcome::NotApplicable);
        };

        let url = endpoint_url(
            &self.base_url,
            "geocode/json",
            &[("address", address), ("key", api_key)],
        )?;
        let body: GeocodeResponse = get_json(&self.client, url, "maps geocode").await?;

        if body.status != "OK" && body.status != "ZERO_RESULTS" {
            return Err(GeoError::Provider {
                provider: "maps",
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            });
        }

        let result = body.results.into_iter().next().map(|entry| GeocodeResult {
            address: address.to_string(),
            coordinates: Coordinate::new(entry.geometry.location.lat, entry.geometry.location.lng),
            formatted_address: entry.formatted_address,
        });
        Ok(ProviderOutcome::Resolved(result))
    }
}
