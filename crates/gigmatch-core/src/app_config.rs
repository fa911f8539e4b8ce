#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Enables the external mapping and directions providers when set.
    pub maps_api_key: Option<String>,
    pub maps_base_url: String,
    pub fallback_geocoder_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Pause between consecutive geocoding requests when backfilling jobs.
    pub geocode_delay_ms: u64,
    pub default_radius_miles: Option<f64>,
}

impl AppConfig {
    #[must_use]
    pub fn has_maps_provider(&self) -> bool {
        self.maps_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "maps_api_key",
                &self.maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("maps_base_url", &self.maps_base_url)
            .field("fallback_geocoder_url", &self.fallback_geocoder_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("retry_max_attempts", &self.retry_max_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .field("geocode_delay_ms", &self.geocode_delay_ms)
            .field("default_radius_miles", &self.default_radius_miles)
            .finish()
    }
}
