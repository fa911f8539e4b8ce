//! Open geocoder used when no mapping-service key is configured. Always
//! applicable; takes the first candidate it returns.

use async_trait::async_trait;
use gigmatch_core::Coordinate;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{GeocodeProvider, GeocodeResult};
use crate::error::GeoError;
use crate::http::{endpoint_url, get_json, parse_base_url};
use crate::provider::ProviderOutcome;

/// Nominatim encodes coordinates as strings; accept numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Degrees::Number(n) => Some(*n),
            Degrees::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    lat: Degrees,
    lon: Degrees,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: Url,
}

impl NominatimGeocoder {
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(client: Client, base_url: &str) -> Result<Self, GeoError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl GeocodeProvider for NominatimGeocoder {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn attempt(
        &self,
        address: &str,
    ) -> Result<ProviderOutcome<Option<GeocodeResult>>, GeoError> {
        let url = endpoint_url(
            &self.base_url,
            "search",
            &[("q", address), ("format", "json"), ("limit", "1")],
        )?;
        let candidates: Vec<Candidate> = get_json(&self.client, url, "nominatim search").await?;

        let Some(first) = candidates.into_iter().next() else {
            return Ok(ProviderOutcome::Resolved(None));
        };
        let (Some(latitude), Some(longitude)) = (first.lat.value(), first.lon.value()) else {
            return Err(GeoError::Provider {
                provider: "nominatim",
                status: "INVALID_COORDINATE".to_string(),
                message: format!("unparseable coordinate for '{address}'"),
            });
        };

        Ok(ProviderOutcome::Resolved(Some(GeocodeResult {
            address: address.to_string(),
            coordinates: Coordinate::new(latitude, longitude),
            formatted_address: first
                .display_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| address.to_string()),
        })))
    }
}
