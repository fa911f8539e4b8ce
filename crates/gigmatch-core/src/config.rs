use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can drive it
/// from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("GIGMATCH_ENV", "development"))?;
    let log_level = or_default("GIGMATCH_LOG_LEVEL", "info");
    let maps_api_key = lookup("GIGMATCH_MAPS_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let maps_base_url = or_default(
        "GIGMATCH_MAPS_BASE_URL",
        "https://maps.googleapis.com/maps/api/",
    );
    let fallback_geocoder_url = or_default(
        "GIGMATCH_FALLBACK_GEOCODER_URL",
        "https://nominatim.openstreetmap.org/",
    );
    let http_timeout_secs = parse_u64("GIGMATCH_HTTP_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("GIGMATCH_USER_AGENT", "gigmatch/0.1 (job-matching)");

    let retry_max_attempts = parse_u32("GIGMATCH_RETRY_MAX_ATTEMPTS", "3")?;
    if retry_max_attempts == 0 {
        return Err(invalid(
            "GIGMATCH_RETRY_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let retry_base_delay_ms = parse_u64("GIGMATCH_RETRY_BASE_DELAY_MS", "500")?;
    let retry_max_delay_ms = parse_u64("GIGMATCH_RETRY_MAX_DELAY_MS", "10000")?;
    let geocode_delay_ms = parse_u64("GIGMATCH_GEOCODE_DELAY_MS", "1000")?;

    let default_radius_miles = match lookup("GIGMATCH_DEFAULT_RADIUS_MILES") {
        Ok(raw) => {
            let radius = raw
                .parse::<f64>()
                .map_err(|e| invalid("GIGMATCH_DEFAULT_RADIUS_MILES", e.to_string()))?;
            if !radius.is_finite() || radius < 0.0 {
                return Err(invalid(
                    "GIGMATCH_DEFAULT_RADIUS_MILES",
                    "must be a non-negative number".to_string(),
                ));
            }
            Some(radius)
        }
        Err(_) => None,
    };

    Ok(AppConfig {
        env,
        log_level,
        maps_api_key,
        maps_base_url,
        fallback_geocoder_url,
        http_timeout_secs,
        user_agent,
        retry_max_attempts,
        retry_base_delay_ms,
        retry_max_delay_ms,
        geocode_delay_ms,
        default_radius_miles,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GIGMATCH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
