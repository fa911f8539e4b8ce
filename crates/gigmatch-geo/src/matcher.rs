//! Annotates job records with their distance from the user, then filters
//! by radius and sorts nearest-first.

use std::cmp::Ordering;

use gigmatch_core::{AnnotatedJob, Coordinate, DistanceUnit, Locatable};

use crate::distance::calculate_distance;

/// Annotates, filters and sorts `jobs` relative to `user`.
///
/// - Every job with a coordinate gets its distance in miles; others keep
///   `distance: None`.
/// - With `radius_miles`, a job is dropped only when it has a distance and
///   that distance exceeds the radius. Jobs without coordinates are always
///   kept so ungeocoded postings stay visible.
/// - Output is sorted ascending by distance; jobs without a distance come
///   last, in their original relative order.
///
/// The input slice is not modified; each kept record is cloned.
pub fn filter_jobs_by_location<J>(
    jobs: &[J],
    user: Coordinate,
    radius_miles: Option<f64>,
) -> Vec<AnnotatedJob<J>>
where
    J: Locatable + Clone,
{
    let mut annotated: Vec<AnnotatedJob<J>> = jobs
        .iter()
        .map(|job| AnnotatedJob {
            distance: job
                .coordinate()
                .map(|c| calculate_distance(user, c, DistanceUnit::Miles)),
            job: job.clone(),
        })
        .filter(|a| match (radius_miles, a.distance) {
            (Some(radius), Some(distance)) => distance <= radius,
            _ => true,
        })
        .collect();

    sort_by_distance(&mut annotated);
    annotated
}

/// Stable nearest-first sort; `None` distances sort after every known one.
pub fn sort_by_distance<J>(jobs: &mut [AnnotatedJob<J>]) {
    jobs.sort_by(|a, b| match (a.distance, b.distance) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
