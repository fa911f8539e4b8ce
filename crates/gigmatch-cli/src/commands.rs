//! Command handlers for the CLI.
//!
//! Results go to stdout as plain text or pretty JSON; diagnostics go through
//! `tracing` on stderr.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use gigmatch_core::{AppConfig, Coordinate, DistanceUnit, Job};
use gigmatch_geo::{
    calculate_distance, directions_url, filter_jobs_by_location, format_distance, Destination,
    GeoServices, LocationCache, SystemOpener, TravelMode,
};

use crate::position::FixedPosition;

pub(crate) fn coordinate(latitude: f64, longitude: f64) -> anyhow::Result<Coordinate> {
    Ok(Coordinate::checked(latitude, longitude)?)
}

/// Interprets `"lat,lng"` as a point and anything else as an address.
pub(crate) fn parse_destination(input: &str) -> Destination {
    let point = input.split_once(',').and_then(|(lat, lng)| {
        let lat = lat.trim().parse::<f64>().ok()?;
        let lng = lng.trim().parse::<f64>().ok()?;
        Coordinate::checked(lat, lng).ok()
    });
    match point {
        Some(point) => Destination::Point(point),
        None => Destination::from(input),
    }
}

pub(crate) fn parse_jobs(raw: &str) -> anyhow::Result<Vec<Job>> {
    serde_json::from_str(raw).context("expected a JSON array of job records")
}

pub(crate) fn run_distance(from: Coordinate, to: Coordinate, unit: DistanceUnit) {
    let distance = calculate_distance(from, to, unit);
    match unit {
        DistanceUnit::Miles => println!("{}", format_distance(distance)),
        DistanceUnit::Kilometers => println!("{distance:.1} km"),
    }
}

pub(crate) async fn run_geocode(config: &AppConfig, address: &str) -> anyhow::Result<()> {
    let services = GeoServices::from_config(config)?;
    match services.geocode_address(address).await? {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => {
            tracing::info!(address, "no match");
            println!("null");
        }
    }
    Ok(())
}

pub(crate) async fn run_travel(
    config: &AppConfig,
    from: Coordinate,
    to: Coordinate,
    mode: TravelMode,
) -> anyhow::Result<()> {
    let services = GeoServices::from_config(config)?;
    let estimate = services.get_travel_time(from, to, mode).await?;
    println!("{}", serde_json::to_string_pretty(&estimate)?);
    Ok(())
}

/// Loads jobs from `path`, optionally backfills coordinates, then prints the
/// radius-filtered, nearest-first list with distances attached.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a job array, or if
/// the geo services cannot be configured when `geocode` is set.
pub(crate) async fn run_match(
    config: &AppConfig,
    path: &Path,
    user: Coordinate,
    radius_miles: Option<f64>,
    geocode: bool,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut jobs = parse_jobs(&raw)?;

    if geocode {
        let services = GeoServices::from_config(config)?;
        jobs = services.backfill_coordinates(&jobs).await;
    }

    let matched = filter_jobs_by_location(&jobs, user, radius_miles);
    tracing::info!(
        total = jobs.len(),
        matched = matched.len(),
        radius_miles = ?radius_miles,
        "matched jobs"
    );
    println!("{}", serde_json::to_string_pretty(&matched)?);
    Ok(())
}

pub(crate) async fn run_directions(destination: &str, print: bool) {
    let destination = parse_destination(destination);
    if print {
        println!("{}", directions_url(&destination));
        return;
    }

    let cache = LocationCache::new(Arc::new(FixedPosition::default()), Arc::new(SystemOpener));
    cache.open_directions(destination).await;
    cache.cleanup().await;
}
