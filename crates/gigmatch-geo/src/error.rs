use gigmatch_retry::{Classify, ErrorClass};
use thiserror::Error;

/// Errors raised by geocoders, directions providers and the position source.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered 2xx but reported a failure in its envelope
    /// (e.g. `REQUEST_DENIED`, `OVER_QUERY_LIMIT`).
    #[error("{provider} returned {status}: {message}")]
    Provider {
        provider: &'static str,
        status: String,
        message: String,
    },

    /// Device location access was refused. Never retried.
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("no {operation} provider is applicable")]
    NoProvider { operation: &'static str },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("could not open {url}: {reason}")]
    Open { url: String, reason: String },
}

impl Classify for GeoError {
    fn classify(&self) -> ErrorClass {
        match self {
            GeoError::Http(e) => e.classify(),
            GeoError::UnexpectedStatus { status, .. } => ErrorClass::from_status(*status),
            GeoError::Provider { status, .. } => match status.as_str() {
                "OVER_QUERY_LIMIT" => ErrorClass::RateLimited,
                "UNKNOWN_ERROR" => ErrorClass::ServerFault,
                _ => ErrorClass::ClientFault,
            },
            GeoError::Timeout(_) => ErrorClass::Timeout,
            GeoError::PermissionDenied
            | GeoError::NoProvider { .. }
            | GeoError::InvalidUrl { .. } => ErrorClass::ClientFault,
            GeoError::Deserialize { .. }
            | GeoError::PositionUnavailable(_)
            | GeoError::Open { .. } => ErrorClass::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use gigmatch_retry::default_should_retry;

    use super::*;

    fn provider(status: &str) -> GeoError {
        GeoError::Provider {
            provider: "maps",
            status: status.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn permission_denied_is_never_retried() {
        assert!(!default_should_retry(&GeoError::PermissionDenied));
    }

    #[test]
    fn server_status_is_retried() {
        let err = GeoError::UnexpectedStatus {
            status: 502,
            url: "https://example.test/".to_string(),
        };
        assert!(default_should_retry(&err));
    }

    #[test]
    fn client_status_is_not_retried() {
        let err = GeoError::UnexpectedStatus {
            status: 403,
            url: "https://example.test/".to_string(),
        };
        assert!(!default_should_retry(&err));
    }

    #[test]
    fn provider_quota_is_rate_limited() {
        assert_eq!(provider("OVER_QUERY_LIMIT").classify(), ErrorClass::RateLimited);
        assert_eq!(provider("REQUEST_DENIED").classify(), ErrorClass::ClientFault);
        assert!(default_should_retry(&provider("UNKNOWN_ERROR")));
    }

    #[test]
    fn timeout_is_retried() {
        assert!(default_should_retry(&GeoError::Timeout("geocode".to_string())));
    }
}
