//! Travel distance/duration estimates: an external directions provider when
//! one is configured, otherwise a straight-line heuristic.

mod heuristic;
mod maps;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use gigmatch_core::Coordinate;
use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::provider::ProviderOutcome;

pub use heuristic::HeuristicDirections;
pub use maps::MapsDirections;

/// Status reported for successful estimates.
pub const STATUS_OK: &str = "OK";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }

    /// Assumed door-to-door average speed used by the heuristic estimator.
    /// Walking < bicycling < transit < driving.
    #[must_use]
    pub fn average_speed_mph(self) -> f64 {
        match self {
            TravelMode::Walking => 3.0,
            TravelMode::Bicycling => 12.0,
            TravelMode::Transit => 20.0,
            TravelMode::Driving => 30.0,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "drive" => Ok(TravelMode::Driving),
            "walking" | "walk" => Ok(TravelMode::Walking),
            "bicycling" | "cycling" | "bike" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            other => Err(format!("unknown travel mode '{other}'")),
        }
    }
}

/// A display string paired with its raw value (metres or seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub text: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEstimate {
    /// `value` in metres.
    pub distance: Measure,
    /// `value` in seconds.
    pub duration: Measure,
    pub status: String,
}

/// One strategy in the travel-estimate chain.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(Resolved(None))` means the provider answered but found no route.
    async fn attempt(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<ProviderOutcome<Option<TravelEstimate>>, GeoError>;
}

pub struct TravelEstimator {
    providers: Vec<Box<dyn DirectionsProvider>>,
}

impl TravelEstimator {
    /// Providers are tried in the given order.
    #[must_use]
    pub fn new(providers: Vec<Box<dyn DirectionsProvider>>) -> Self {
        Self { providers }
    }

    /// Heuristic-only estimator.
    #[must_use]
    pub fn heuristic() -> Self {
        Self::new(vec![Box::new(HeuristicDirections)])
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Estimates travel from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - Whatever the first applicable provider fails with.
    /// - [`GeoError::NoProvider`] if no provider is applicable.
    pub async fn get_travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<TravelEstimate>, GeoError> {
        for provider in &self.providers {
            match provider.attempt(from, to, mode).await? {
                ProviderOutcome::Resolved(estimate) => {
                    tracing::debug!(
                        provider = provider.name(),
                        %mode,
                        found = estimate.is_some(),
                        "travel estimate resolved"
                    );
                    return Ok(estimate);
                }
                ProviderOutcome::NotApplicable => {
                    tracing::debug!(provider = provider.name(), "directions provider not applicable");
                }
            }
        }
        Err(GeoError::NoProvider {
            operation: "directions",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unconfigured;

    #[async_trait]
    impl DirectionsProvider for Unconfigured {
        fn name(&self) -> &'static str {
            "unconfigured"
        }

        async fn attempt(
            &self,
            _from: Coordinate,
            _to: Coordinate,
            _mode: TravelMode,
        ) -> Result<ProviderOutcome<Option<TravelEstimate>>, GeoError> {
            Ok(ProviderOutcome::NotApplicable)
        }
    }

    const SF: Coordinate = Coordinate::new(37.774_9, -122.419_4);
    const OAKLAND: Coordinate = Coordinate::new(37.804_4, -122.271_2);

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("Walk".parse::<TravelMode>().unwrap(), TravelMode::Walking);
        assert_eq!("bike".parse::<TravelMode>().unwrap(), TravelMode::Bicycling);
        assert!("teleport".parse::<TravelMode>().is_err());
    }

    #[test]
    fn speeds_are_strictly_ordered() {
        assert!(TravelMode::Walking.average_speed_mph() < TravelMode::Bicycling.average_speed_mph());
        assert!(TravelMode::Bicycling.average_speed_mph() < TravelMode::Driving.average_speed_mph());
    }

    #[tokio::test]
    async fn falls_back_to_heuristic() {
        let estimator = TravelEstimator::new(vec![Box::new(Unconfigured), Box::new(HeuristicDirections)]);
        let estimate = estimator
            .get_travel_time(SF, OAKLAND, TravelMode::Driving)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(estimate.status, STATUS_OK);
    }

    #[tokio::test]
    async fn walking_takes_longer_than_cycling_and_driving() {
        let estimator = TravelEstimator::heuristic();
        let mut durations = Vec::new();
        for mode in [TravelMode::Walking, TravelMode::Bicycling, TravelMode::Driving] {
            let estimate = estimator.get_travel_time(SF, OAKLAND, mode).await.unwrap().unwrap();
            durations.push(estimate.duration.value);
        }
        assert!(durations[0] > durations[1], "walking vs bicycling: {durations:?}");
        assert!(durations[1] > durations[2], "bicycling vs driving: {durations:?}");
    }

    #[tokio::test]
    async fn empty_chain_reports_no_provider() {
        let estimator = TravelEstimator::new(vec![Box::new(Unconfigured)]);
        assert!(matches!(
            estimator.get_travel_time(SF, OAKLAND, TravelMode::Walking).await,
            Err(GeoError::NoProvider { .. })
        ));
    }
}
