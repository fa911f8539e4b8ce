//! Travel estimates via a Google-Distance-Matrix-compatible service.

use async_trait::async_trait;
use gigmatch_core::Coordinate;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{DirectionsProvider, Measure, TravelEstimate, TravelMode};
use crate::error::GeoError;
use crate::http::{endpoint_url, get_json, parse_base_url};
use crate::provider::ProviderOutcome;

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    distance: Option<Measure>,
    #[serde(default)]
    duration: Option<Measure>,
}

/// Only applicable when an API key is configured.
pub struct MapsDirections {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl MapsDirections {
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
impl DirectionsProvider for MapsDirections {
    fn name(&self) -> &'static str {
        "maps"
    }

    async fn attempt(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<ProviderOutcome<Option<TravelEstimate>>, GeoError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(ProviderOutcome::NotApplicable);
        };

        let origins = from.to_string();
        let destinations = to.to_string();
        let url = endpoint_url(
            &self.base_url,
            "distancematrix/json",
            &[
                ("origins", &origins),
                ("destinations", &destinations),
                ("mode", mode.as_str()),
                ("units", "imperial"),
                ("key", api_key),
            ],
        )?;
        let body: MatrixResponse = get_json(&self.client, url, "maps distance matrix").await?;

        if body.status != "OK" {
            return Err(GeoError::Provider {
                provider: "maps",
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            });
        }

        let element = body
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next());

        let estimate = match element {
            Some(MatrixElement {
                status,
                distance: Some(distance),
                duration: Some(duration),
            }) if status == "OK" => Some(TravelEstimate {
                distance,
                duration,
                status,
            }),
            // NOT_FOUND / ZERO_RESULTS: the service answered, there is no route.
            _ => None,
        };
        Ok(ProviderOutcome::Resolved(estimate))
    }
}
