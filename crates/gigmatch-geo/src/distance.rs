//! Great-circle distance on a mean-radius spherical Earth.

use gigmatch_core::{Coordinate, DistanceUnit};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3_958.8;

/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

/// Metres per statute mile.
pub const METERS_PER_MILE: f64 = KM_PER_MILE * 1_000.0;

/// Haversine distance between two coordinates.
///
/// Identical coordinates yield exactly `0.0`; the result is never negative
/// and does not depend on argument order.
#[must_use]
pub fn calculate_distance(from: Coordinate, to: Coordinate, unit: DistanceUnit) -> f64 {
    if from == to {
        return 0.0;
    }

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for near-identical or
    // antipodal points.
    let a = a.clamp(0.0, 1.0);
    let miles = (2.0 * a.sqrt().atan2((1.0 - a).sqrt()) * EARTH_RADIUS_MILES).max(0.0);

    match unit {
        DistanceUnit::Miles => miles,
        DistanceUnit::Kilometers => miles * KM_PER_MILE,
    }
}

/// `true` when `point` lies within `radius_miles` of `center`, inclusive.
#[must_use]
pub fn is_location_within_radius(center: Coordinate, point: Coordinate, radius_miles: f64) -> bool {
    calculate_distance(center, point, DistanceUnit::Miles) <= radius_miles
}

/// Short human-readable distance, e.g. `"< 0.1 mi"` or `"12.4 mi"`.
#[must_use]
pub fn format_distance(miles: f64) -> String {
    if miles < 0.1 {
        "< 0.1 mi".to_string()
    } else {
        format!("{miles:.1} mi")
    }
}
