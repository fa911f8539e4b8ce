//! Job records as delivered by the marketplace backend, plus the
//! distance-annotated view produced by the matcher.

use std::fmt;

use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::geo::Coordinate;

/// Anything that may carry a position the matcher can measure against.
pub trait Locatable {
    /// Returns the record's coordinate, or `None` if it has not been geocoded.
    fn coordinate(&self) -> Option<Coordinate>;
}

impl Locatable for Coordinate {
    fn coordinate(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

/// Backend record identifier; string or numeric, kept in its original form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Text(String),
    Number(Number),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Text(id) => f.write_str(id),
            JobId::Number(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        JobId::Text(id.to_string())
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        JobId::Text(id)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        JobId::Number(id.into())
    }
}

/// A job posting.
///
/// Only the fields this crate reads are typed. Everything else the backend
/// sends (budget, category, poster, timestamps, ...) is kept verbatim in
/// `fields` so a record survives a decode/encode pass untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-text location, used to backfill coordinates via geocoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Job {
    #[must_use]
    pub fn new(id: impl Into<JobId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            address: None,
            latitude: None,
            longitude: None,
            fields: Map::new(),
        }
    }

    /// Returns a copy of this job positioned at `coordinate`.
    #[must_use]
    pub fn with_coordinate(&self, coordinate: Coordinate) -> Self {
        Self {
            latitude: Some(coordinate.latitude),
            longitude: Some(coordinate.longitude),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl Locatable for Job {
    fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(Coordinate::new(latitude, longitude))
            }
            _ => None,
        }
    }
}

/// A source record plus its distance from the user, in miles.
///
/// `distance` is `None` when the record has no coordinate. Serializes as the
/// source record's own fields with a `distance` key added alongside them; a
/// computed distance replaces any `distance` the record already carried.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnotatedJob<J> {
    #[serde(flatten)]
    pub job: J,
    #[serde(default)]
    pub distance: Option<f64>,
}

impl<J: Serialize> Serialize for AnnotatedJob<J> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = match serde_json::to_value(&self.job).map_err(S::Error::custom)? {
            Value::Object(record) => record,
            other => {
                return Err(S::Error::custom(format!(
                    "annotated record must serialize as an object, got {other}"
                )))
            }
        };
        if let Some(distance) = self.distance {
            record.insert("distance".to_string(), Value::from(distance));
        }
        record.serialize(serializer)
    }
}

impl<J> AnnotatedJob<J> {
    #[must_use]
    pub fn into_inner(self) -> J {
        self.job
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn job_without_both_coordinates_is_not_locatable() {
        let mut job = Job::new("1", "Fix fence");
        job.latitude = Some(37.0);
        assert!(job.coordinate().is_none());
    }

    #[test]
    fn with_coordinate_keeps_other_fields() {
        let mut job = Job::new("1", "Fix fence").with_address("1 Main St");
        job.fields.insert("budget".to_string(), json!(120));
        let moved = job.with_coordinate(Coordinate::new(1.0, 2.0));
        assert_eq!(moved.coordinate(), Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(moved.address.as_deref(), Some("1 Main St"));
        assert_eq!(moved.fields.get("budget"), Some(&json!(120)));
        assert!(job.coordinate().is_none(), "source must not be mutated");
    }

    #[test]
    fn unknown_backend_fields_survive_round_trip() {
        let raw = json!({
            "id": "j-9",
            "title": "Paint garage",
            "latitude": 34.05,
            "longitude": -118.24,
            "budget": 300,
            "category": "painting"
        });
        let job: Job = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(job.fields.get("category"), Some(&json!("painting")));
        assert_eq!(serde_json::to_value(&job).unwrap(), raw);
    }

    #[test]
    fn numeric_id_and_missing_title_are_accepted() {
        let raw = json!({"id": 42, "latitude": 1.0, "longitude": 2.0, "budget": 80});
        let job: Job = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(job.id, JobId::from(42_u64));
        assert_eq!(job.id.to_string(), "42");
        assert!(job.title.is_none());
        assert_eq!(serde_json::to_value(&job).unwrap(), raw);
    }

    #[test]
    fn string_id_stays_a_string() {
        let job: Job = serde_json::from_value(json!({"id": "42"})).unwrap();
        assert_eq!(job.id, JobId::Text("42".to_string()));
    }

    #[test]
    fn computed_distance_replaces_backend_distance() {
        let mut job = Job::new("1", "Walk dog");
        job.fields.insert("distance".to_string(), json!(99.0));
        let annotated = AnnotatedJob {
            job,
            distance: Some(2.5),
        };
        let text = serde_json::to_string(&annotated).unwrap();
        assert_eq!(text.matches("\"distance\"").count(), 1, "{text}");
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["distance"], json!(2.5));
    }

    #[test]
    fn backend_distance_kept_when_nothing_computed() {
        let mut job = Job::new("1", "Remote");
        job.fields.insert("distance".to_string(), json!(7));
        let value = serde_json::to_value(AnnotatedJob {
            job,
            distance: None,
        })
        .unwrap();
        assert_eq!(value["distance"], json!(7));
    }

    #[test]
    fn annotated_job_flattens_with_distance() {
        let annotated = AnnotatedJob {
            job: Job::new("1", "Walk dog"),
            distance: Some(2.5),
        };
        let value = serde_json::to_value(&annotated).unwrap();
        assert_eq!(value["id"], json!("1"));
        assert_eq!(value["distance"], json!(2.5));
    }

    #[test]
    fn annotated_job_omits_unknown_distance() {
        let annotated = AnnotatedJob {
            job: Job::new("1", "Walk dog"),
            distance: None,
        };
        let value = serde_json::to_value(&annotated).unwrap();
        assert!(value.get("distance").is_none());
    }
}
