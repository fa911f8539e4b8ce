//! Normalises heterogeneous failure shapes into a closed [`ErrorClass`] and
//! decides, from the class alone, whether a retry is worthwhile.

use std::fmt;

use serde::Deserialize;

/// Closed classification every failure is reduced to before the retry
/// decision is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The call was aborted or timed out (abort signal, HTTP 408).
    Timeout,
    /// Transport-level failure: connection refused/reset, DNS, offline.
    Network,
    /// HTTP 429.
    RateLimited,
    /// HTTP 5xx.
    ServerFault,
    /// Any other HTTP status, or a refusal that retrying cannot change.
    ClientFault,
    /// A failure shape we do not recognise.
    Unknown,
}

/// Classes that are worth another attempt.
const RETRYABLE: &[ErrorClass] = &[
    ErrorClass::Timeout,
    ErrorClass::Network,
    ErrorClass::RateLimited,
    ErrorClass::ServerFault,
];

impl ErrorClass {
    #[must_use]
    pub fn is_retryable(self) -> bool {
        RETRYABLE.contains(&self)
    }

    /// Applies the decision table in order:
    ///
    /// 1. `name == "AbortError"` → [`ErrorClass::Timeout`]
    /// 2. message contains "network" (any case) → [`ErrorClass::Network`]
    /// 3. status 408 → [`ErrorClass::Timeout`], 429 → [`ErrorClass::RateLimited`]
    /// 4. status in `500..600` → [`ErrorClass::ServerFault`]
    /// 5. any other status → [`ErrorClass::ClientFault`]
    /// 6. otherwise → [`ErrorClass::Unknown`]
    #[must_use]
    pub fn from_parts(name: Option<&str>, message: Option<&str>, status: Option<u16>) -> Self {
        if name == Some("AbortError") {
            return ErrorClass::Timeout;
        }
        if message.is_some_and(|m| m.to_ascii_lowercase().contains("network")) {
            return ErrorClass::Network;
        }
        match status {
            Some(status) => Self::from_status(status),
            None => ErrorClass::Unknown,
        }
    }

    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            408 => ErrorClass::Timeout,
            429 => ErrorClass::RateLimited,
            500..=599 => ErrorClass::ServerFault,
            _ => ErrorClass::ClientFault,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorClass::Timeout => "timeout",
            ErrorClass::Network => "network",
            ErrorClass::RateLimited => "rate_limited",
            ErrorClass::ServerFault => "server_fault",
            ErrorClass::ClientFault => "client_fault",
            ErrorClass::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Reduces an error value to an [`ErrorClass`].
pub trait Classify {
    fn classify(&self) -> ErrorClass;
}

/// The default retry predicate: retry exactly the retryable classes.
pub fn default_should_retry<E: Classify + ?Sized>(error: &E) -> bool {
    error.classify().is_retryable()
}

/// A loosely-shaped failure as reported by a JSON/JS-style client:
/// an optional `name`, `message`, and `response.status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FailureShape {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Option<ResponseShape>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseShape {
    #[serde(default)]
    pub status: Option<u16>,
}

impl FailureShape {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(status: u16) -> Self {
        Self {
            response: Some(ResponseShape {
                status: Some(status),
            }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().and_then(|r| r.status)
    }
}

impl Classify for FailureShape {
    fn classify(&self) -> ErrorClass {
        ErrorClass::from_parts(self.name.as_deref(), self.message.as_deref(), self.status())
    }
}

impl fmt::Display for FailureShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.message, self.status()) {
            (_, Some(message), _) => f.write_str(message),
            (_, None, Some(status)) => write!(f, "request failed with status {status}"),
            (Some(name), None, None) => f.write_str(name),
            (None, None, None) => f.write_str("unknown failure"),
        }
    }
}

impl std::error::Error for FailureShape {}

impl Classify for reqwest::Error {
    fn classify(&self) -> ErrorClass {
        if self.is_timeout() {
            return ErrorClass::Timeout;
        }
        if let Some(status) = self.status() {
            return ErrorClass::from_status(status.as_u16());
        }
        if self.is_connect() || self.is_request() {
            return ErrorClass::Network;
        }
        ErrorClass::Unknown
    }
}

impl Classify for std::io::Error {
    fn classify(&self) -> ErrorClass {
        use std::io::ErrorKind;
        match self.kind() {
            ErrorKind::TimedOut | ErrorKind::Interrupted => ErrorClass::Timeout,
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof => ErrorClass::Network,
            ErrorKind::PermissionDenied => ErrorClass::ClientFault,
            _ => ErrorClass::Unknown,
        }
    }
}

impl Classify for tokio::time::error::Elapsed {
    fn classify(&self) -> ErrorClass {
        ErrorClass::Timeout
    }
}

impl<E: Classify + ?Sized> Classify for Box<E> {
    fn classify(&self) -> ErrorClass {
        (**self).classify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(json: &str) -> FailureShape {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn abort_error_is_retried() {
        assert!(default_should_retry(&shape(r#"{"name":"AbortError"}"#)));
    }

    #[test]
    fn network_message_is_retried_case_insensitively() {
        assert!(default_should_retry(&shape(
            r#"{"message":"Network error occurred"}"#
        )));
        assert!(default_should_retry(&FailureShape::with_message(
            "fetch failed: NETWORK unreachable"
        )));
    }

    #[test]
    fn request_timeout_and_rate_limit_are_retried() {
        assert!(default_should_retry(&shape(r#"{"response":{"status":408}}"#)));
        assert!(default_should_retry(&shape(r#"{"response":{"status":429}}"#)));
    }

    #[test]
    fn server_faults_are_retried() {
        for status in [500, 502, 503, 504, 599] {
            assert!(
                default_should_retry(&FailureShape::with_status(status)),
                "status {status} should be retried"
            );
        }
    }

    #[test]
    fn client_faults_are_not_retried() {
        for status in [400, 401, 403, 404, 422] {
            assert!(
                !default_should_retry(&FailureShape::with_status(status)),
                "status {status} must not be retried"
            );
        }
    }

    #[test]
    fn status_600_is_a_client_fault() {
        assert_eq!(FailureShape::with_status(600).classify(), ErrorClass::ClientFault);
    }

    #[test]
    fn unrecognised_shape_is_not_retried() {
        let empty = shape("{}");
        assert_eq!(empty.classify(), ErrorClass::Unknown);
        assert!(!default_should_retry(&empty));
        assert!(!default_should_retry(&FailureShape::named("TypeError")));
    }

    #[test]
    fn abort_name_wins_over_client_status() {
        let failure = FailureShape {
            name: Some("AbortError".to_string()),
            message: None,
            response: Some(ResponseShape { status: Some(400) }),
        };
        assert_eq!(failure.classify(), ErrorClass::Timeout);
    }

    #[test]
    fn network_message_wins_over_client_status() {
        let failure = FailureShape {
            name: None,
            message: Some("network down".to_string()),
            response: Some(ResponseShape { status: Some(401) }),
        };
        assert_eq!(failure.classify(), ErrorClass::Network);
    }

    #[test]
    fn io_errors_classify_by_kind() {
        let reset = std::io::Error::from(std::io::ErrorKind::ConnectionReset);
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert_eq!(reset.classify(), ErrorClass::Network);
        assert_eq!(denied.classify(), ErrorClass::ClientFault);
    }

    #[tokio::test]
    async fn reqwest_connect_failure_is_network() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1")
            .send()
            .await
            .unwrap_err();
        assert!(default_should_retry(&err));
    }
}
