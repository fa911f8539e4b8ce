//! Wires the provider chains and retry policy together from configuration.

use std::time::Duration;

use gigmatch_core::{AppConfig, Coordinate, Job, Locatable};
use gigmatch_retry::{with_retry, RetryError, RetryPolicy};

use crate::error::GeoError;
use crate::geocode::{GeocodeResult, GeocodingChain, MapsGeocoder, NominatimGeocoder};
use crate::http::build_client;
use crate::travel::{HeuristicDirections, MapsDirections, TravelEstimate, TravelEstimator, TravelMode};

/// Retry-wrapped entry points over the geocoding and travel chains.
pub struct GeoServices {
    geocoder: GeocodingChain,
    travel: TravelEstimator,
    retry: RetryPolicy<GeoError>,
    backfill_delay: Duration,
}

impl GeoServices {
    #[must_use]
    pub fn new(
        geocoder: GeocodingChain,
        travel: TravelEstimator,
        retry: RetryPolicy<GeoError>,
    ) -> Self {
        Self {
            geocoder,
            travel,
            retry,
            backfill_delay: Duration::ZERO,
        }
    }

    /// Sets the pause between consecutive geocoding requests in
    /// [`GeoServices::backfill_coordinates`]. Public geocoders such as
    /// Nominatim allow one request per second.
    #[must_use]
    pub fn with_backfill_delay(mut self, delay: Duration) -> Self {
        self.backfill_delay = delay;
        self
    }

    /// Builds the default chains: mapping service first (if keyed), then the
    /// open geocoder or the straight-line heuristic.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the HTTP client cannot be built, or
    /// [`GeoError::InvalidUrl`] for a malformed provider URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeoError> {
        let client = build_client(config.http_timeout_secs, &config.user_agent)?;

        let geocoder = GeocodingChain::new(vec![
            Box::new(MapsGeocoder::new(
                client.clone(),
                config.maps_api_key.clone(),
                &config.maps_base_url,
            )?),
            Box::new(NominatimGeocoder::new(
                client.clone(),
                &config.fallback_geocoder_url,
            )?),
        ]);
        let travel = TravelEstimator::new(vec![
            Box::new(MapsDirections::new(
                client,
                config.maps_api_key.clone(),
                &config.maps_base_url,
            )?),
            Box::new(HeuristicDirections),
        ]);
        let retry = RetryPolicy::new(config.retry_max_attempts)
            .with_base_delay(Duration::from_millis(config.retry_base_delay_ms))
            .with_max_delay(Duration::from_millis(config.retry_max_delay_ms));

        tracing::debug!(
            maps = config.has_maps_provider(),
            geocoders = ?geocoder.provider_names(),
            directions = ?travel.provider_names(),
            "geo services configured"
        );
        Ok(Self::new(geocoder, travel, retry)
            .with_backfill_delay(Duration::from_millis(config.geocode_delay_ms)))
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy<GeoError> {
        &self.retry
    }

    /// [`GeocodingChain::geocode_address`] with retries on transient failures.
    ///
    /// # Errors
    ///
    /// [`RetryError::Exhausted`] after the last attempt fails, or
    /// [`RetryError::Permanent`] carrying a non-retryable [`GeoError`].
    pub async fn geocode_address(
        &self,
        address: &str,
    ) -> Result<Option<GeocodeResult>, RetryError<GeoError>> {
        with_retry(|| self.geocoder.geocode_address(address), &self.retry)
            .await
            .inspect_err(|err| tracing::warn!(address, error = %err, "geocoding failed"))
    }

    /// [`TravelEstimator::get_travel_time`] with retries on transient failures.
    ///
    /// # Errors
    ///
    /// As [`GeoServices::geocode_address`].
    pub async fn get_travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<TravelEstimate>, RetryError<GeoError>> {
        with_retry(|| self.travel.get_travel_time(from, to, mode), &self.retry)
            .await
            .inspect_err(|err| tracing::warn!(%from, %to, %mode, error = %err, "travel estimate failed"))
    }

    /// Geocodes every job that has an address but no coordinates.
    ///
    /// Jobs that cannot be resolved (no match or provider failure) are
    /// returned unchanged; the matcher keeps them regardless of radius.
    /// Requests run one at a time, separated by the backfill delay.
    pub async fn backfill_coordinates(&self, jobs: &[Job]) -> Vec<Job> {
        let mut out = Vec::with_capacity(jobs.len());
        let mut is_first_request = true;
        for job in jobs {
            let address = job
                .address
                .as_deref()
                .filter(|_| job.coordinate().is_none());
            let Some(address) = address else {
                out.push(job.clone());
                continue;
            };
            if !is_first_request && !self.backfill_delay.is_zero() {
                tokio::time::sleep(self.backfill_delay).await;
            }
            is_first_request = false;
            match self.geocode_address(address).await {
                Ok(Some(result)) => out.push(job.with_coordinate(result.coordinates)),
                Ok(None) => {
                    tracing::debug!(job_id = %job.id, address, "no geocode match for job");
                    out.push(job.clone());
                }
                Err(_) => out.push(job.clone()),
            }
        }
        out
    }
}
