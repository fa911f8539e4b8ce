pub mod app_config;
pub mod config;
pub mod geo;
pub mod jobs;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{Coordinate, DistanceUnit};
pub use jobs::{AnnotatedJob, Job, JobId, Locatable};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown distance unit: {0}")]
    InvalidUnit(String),

    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}
