//! Low-level HTTP helpers shared by the mapping and geocoding providers.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::GeoError;

/// Builds the HTTP client used by every provider.
///
/// # Errors
///
/// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot be
/// constructed.
pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, GeoError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses a provider root URL, normalised to end with exactly one slash so
/// that `Url::join` appends rather than replacing the last path segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, GeoError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| GeoError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Joins `endpoint` onto `base` and appends the query pairs.
pub(crate) fn endpoint_url(
    base: &Url,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<Url, GeoError> {
    let mut url = base.join(endpoint).map_err(|e| GeoError::InvalidUrl {
        url: format!("{base}{endpoint}"),
        reason: e.to_string(),
    })?;
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

/// The URL without its query string, safe to log or embed in errors since
/// API keys travel as query parameters.
pub(crate) fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

/// Sends a GET request, asserts a 2xx HTTP status, and parses the body.
///
/// # Errors
///
/// - [`GeoError::Http`] on network failure or timeout. The URL is stripped
///   from the wrapped error because it carries the API key.
/// - [`GeoError::UnexpectedStatus`] on a non-2xx status.
/// - [`GeoError::Deserialize`] if the body does not match `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    context: &str,
) -> Result<T, GeoError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| GeoError::Http(e.without_url()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(GeoError::UnexpectedStatus {
            status: status.as_u16(),
            url: redacted(&url),
        });
    }
    let body = response
        .text()
        .await
        .map_err(|e| GeoError::Http(e.without_url()))?;
    serde_json::from_str(&body).map_err(|e| GeoError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_single_trailing_slash() {
        let url = parse_base_url("https://maps.example.test/api//").unwrap();
        assert_eq!(url.as_str(), "https://maps.example.test/api/");
    }

    #[test]
    fn endpoint_url_appends_encoded_params() {
        let base = parse_base_url("https://maps.example.test/api").unwrap();
        let url = endpoint_url(&base, "geocode/json", &[("address", "1 Main St & 2nd")]).unwrap();
        assert!(url.as_str().starts_with("https://maps.example.test/api/geocode/json?address="));
        assert!(url.as_str().contains("%26"), "ampersand must be encoded: {url}");
    }

    #[test]
    fn redacted_drops_query() {
        let base = parse_base_url("https://maps.example.test/").unwrap();
        let url = endpoint_url(&base, "geocode/json", &[("key", "secret")]).unwrap();
        assert_eq!(redacted(&url), "https://maps.example.test/geocode/json");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(GeoError::InvalidUrl { .. })
        ));
    }
}
