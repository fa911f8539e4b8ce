use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GIGMATCH_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.maps_api_key.is_none());
    assert!(!cfg.has_maps_provider());
    assert_eq!(cfg.maps_base_url, "https://maps.googleapis.com/maps/api/");
    assert_eq!(cfg.fallback_geocoder_url, "https://nominatim.openstreetmap.org/");
    assert_eq!(cfg.http_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "gigmatch/0.1 (job-matching)");
    assert_eq!(cfg.retry_max_attempts, 3);
    assert_eq!(cfg.retry_base_delay_ms, 500);
    assert_eq!(cfg.retry_max_delay_ms, 10_000);
    assert_eq!(cfg.geocode_delay_ms, 1_000);
    assert!(cfg.default_radius_miles.is_none());
}

#[test]
fn maps_api_key_enables_provider() {
    let mut map = HashMap::new();
    map.insert("GIGMATCH_MAPS_API_KEY", "abc123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.has_maps_provider());
}

#[test]
fn blank_maps_api_key_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("GIGMATCH_MAPS_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.maps_api_key.is_none());
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("GIGMATCH_MAPS_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn retry_max_attempts_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("GIGMATCH_RETRY_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIGMATCH_RETRY_MAX_ATTEMPTS"),
        "expected InvalidEnvVar(GIGMATCH_RETRY_MAX_ATTEMPTS), got: {result:?}"
    );
}

#[test]
fn retry_base_delay_override() {
    let mut map = HashMap::new();
    map.insert("GIGMATCH_RETRY_BASE_DELAY_MS", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.retry_base_delay_ms, 50);
}

#[test]
fn http_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("GIGMATCH_HTTP_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIGMATCH_HTTP_TIMEOUT_SECS"),
        "expected InvalidEnvVar(GIGMATCH_HTTP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn default_radius_parses() {
    let mut map = HashMap::new();
    map.insert("GIGMATCH_DEFAULT_RADIUS_MILES", "25.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_radius_miles, Some(25.5));
}

#[test]
fn negative_default_radius_is_rejected() {
    let mut map = HashMap::new();
    map.insert("GIGMATCH_DEFAULT_RADIUS_MILES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIGMATCH_DEFAULT_RADIUS_MILES"));
}

#[test]
fn build_app_config_geocode_delay_override() {
    let map: HashMap<&str, &str> = HashMap::from([("GIGMATCH_GEOCODE_DELAY_MS", "0")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocode_delay_ms, 0);

    let map: HashMap<&str, &str> = HashMap::from([("GIGMATCH_GEOCODE_DELAY_MS", "soon")]);
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GIGMATCH_GEOCODE_DELAY_MS"));
}
