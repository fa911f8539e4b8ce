//! Straight-line travel estimate used when no directions service is
//! configured.
//!
//! Durations are whole seconds rounded up, so distinct points never report
//! zero. Walking, bicycling and driving are strictly ordered once the
//! driving leg takes at least a second (about 13 m); below that the modes
//! can tie at one second.

use async_trait::async_trait;
use gigmatch_core::{Coordinate, DistanceUnit};

use super::{DirectionsProvider, Measure, TravelEstimate, TravelMode, STATUS_OK};
use crate::distance::{calculate_distance, METERS_PER_MILE};
use crate::error::GeoError;
use crate::provider::ProviderOutcome;

/// Straight-line distance divided by a per-mode average speed. Always
/// applicable, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDirections;

impl HeuristicDirections {
    #[must_use]
    pub fn estimate(from: Coordinate, to: Coordinate, mode: TravelMode) -> TravelEstimate {
        let miles = calculate_distance(from, to, DistanceUnit::Miles);
        let seconds = miles / mode.average_speed_mph() * 3_600.0;

        TravelEstimate {
            distance: Measure {
                text: format!("{miles:.1} mi"),
                value: to_whole(miles * METERS_PER_MILE),
            },
            duration: Measure {
                text: format_duration(seconds),
                value: to_whole(seconds.ceil()),
            },
            status: STATUS_OK.to_string(),
        }
    }
}

#[async_trait]
impl DirectionsProvider for HeuristicDirections {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn attempt(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<ProviderOutcome<Option<TravelEstimate>>, GeoError> {
        Ok(ProviderOutcome::Resolved(Some(Self::estimate(from, to, mode))))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_whole(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

/// `"N min"` under an hour, `"H hr M min"` (or `"H hr"`) above.
fn format_duration(seconds: f64) -> String {
    let minutes = to_whole(seconds / 60.0);
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let (hours, rem) = (minutes / 60, minutes % 60);
    if rem == 0 {
        format!("{hours} hr")
    } else {
        format!("{hours} hr {rem} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SF: Coordinate = Coordinate::new(37.774_9, -122.419_4);
    const LA: Coordinate = Coordinate::new(34.052_2, -118.243_7);

    #[test]
    fn short_durations_render_in_minutes() {
        assert_eq!(format_duration(0.0), "0 min");
        assert_eq!(format_duration(25.0 * 60.0), "25 min");
    }

    #[test]
    fn long_durations_render_in_hours() {
        assert_eq!(format_duration(3_600.0), "1 hr");
        assert_eq!(format_duration(2.5 * 3_600.0), "2 hr 30 min");
    }

    #[test]
    fn distance_text_uses_miles() {
        let estimate = HeuristicDirections::estimate(SF, LA, TravelMode::Driving);
        assert!(estimate.distance.text.ends_with(" mi"), "{}", estimate.distance.text);
        assert!(estimate.distance.text.starts_with("347."), "{}", estimate.distance.text);
        // ~347 miles in metres
        assert!((557_000..=561_000).contains(&estimate.distance.value));
    }

    #[test]
    fn driving_sf_to_la_takes_hours() {
        let estimate = HeuristicDirections::estimate(SF, LA, TravelMode::Driving);
        assert!(estimate.duration.text.contains("hr"), "{}", estimate.duration.text);
        assert_eq!(estimate.status, "OK");
    }

    #[test]
    fn nearby_points_never_take_zero_seconds() {
        // ~1 m apart
        let next_door = Coordinate::new(SF.latitude + 0.000_009, SF.longitude);
        for mode in [TravelMode::Driving, TravelMode::Bicycling, TravelMode::Walking] {
            let estimate = HeuristicDirections::estimate(SF, next_door, mode);
            assert!(estimate.duration.value >= 1, "{mode}: {estimate:?}");
        }
    }

    #[test]
    fn modes_strictly_ordered_from_one_driving_second() {
        // ~20 m apart, driving takes ~1.5 s
        let down_the_block = Coordinate::new(SF.latitude + 0.000_18, SF.longitude);
        let secs = |mode| HeuristicDirections::estimate(SF, down_the_block, mode).duration.value;
        let (walking, bicycling, driving) = (
            secs(TravelMode::Walking),
            secs(TravelMode::Bicycling),
            secs(TravelMode::Driving),
        );
        assert!(driving >= 1);
        assert!(walking > bicycling && bicycling > driving, "{walking} {bicycling} {driving}");
    }

    #[test]
    fn same_point_is_zero() {
        let estimate = HeuristicDirections::estimate(SF, SF, TravelMode::Walking);
        assert_eq!(estimate.distance.value, 0);
        assert_eq!(estimate.duration.value, 0);
    }
}
