//! Address → coordinate resolution through an ordered provider chain.
//!
//! The first provider that is applicable decides the outcome: a match, a
//! valid "no match" (`Ok(None)`), or a provider failure (`Err`). Failures
//! are not masked by falling through to the next provider; wrap the call in
//! `gigmatch_retry::with_retry` for resilience.

mod maps;
mod nominatim;

use async_trait::async_trait;
use gigmatch_core::Coordinate;
use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::provider::ProviderOutcome;

pub use maps::MapsGeocoder;
pub use nominatim::NominatimGeocoder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// The address exactly as the caller supplied it.
    pub address: String,
    pub coordinates: Coordinate,
    pub formatted_address: String,
}

/// One strategy in the geocoding chain.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolves `address`.
    ///
    /// `Ok(Resolved(None))` means the provider answered and found nothing.
    async fn attempt(
        &self,
        address: &str,
    ) -> Result<ProviderOutcome<Option<GeocodeResult>>, GeoError>;
}

pub struct GeocodingChain {
    providers: Vec<Box<dyn GeocodeProvider>>,
}

impl GeocodingChain {
    /// Providers are tried in the given order.
    #[must_use]
    pub fn new(providers: Vec<Box<dyn GeocodeProvider>>) -> Self {
        Self { providers }
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolves free-text `address` to coordinates.
    ///
    /// A blank address resolves to `Ok(None)` without contacting any provider.
    ///
    /// # Errors
    ///
    /// - Whatever the first applicable provider fails with.
    /// - [`GeoError::NoProvider`] if no provider is applicable.
    pub async fn geocode_address(&self, address: &str) -> Result<Option<GeocodeResult>, GeoError> {
        if address.trim().is_empty() {
            return Ok(None);
        }
        for provider in &self.providers {
            match provider.attempt(address).await? {
                ProviderOutcome::Resolved(result) => {
                    tracing::debug!(
                        provider = provider.name(),
                        address,
                        matched = result.is_some(),
                        "geocode resolved"
                    );
                    return Ok(result);
                }
                ProviderOutcome::NotApplicable => {
                    tracing::debug!(provider = provider.name(), "geocoder not applicable");
                }
            }
        }
        Err(GeoError::NoProvider {
            operation: "geocoding",
        })
    }
}
