use std::time::Duration;

const DEFAULT_WINDY_API_URL: &str = "https://api.windy.com/api/point-forecast/v2";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Point-forecast provider credential. `None` disables upstream calls.
    pub windy_api_key: Option<String>,
    pub windy_api_url: String,
    /// Provider model identifier (e.g. "gfsWave").
    pub windy_model: String,
    /// Maximum upstream calls per reset period.
    pub daily_quota: u32,
    pub cache_ttl: Duration,
    pub upstream_timeout: Duration,
    pub cache_sweep_interval: Duration,
    pub quota_reset_interval: Duration,
    /// Whether synthetic data may be served when upstream is unusable.
    pub fallback_enabled: bool,
    /// JSON file with the surf spot catalogue.
    pub spots_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            windy_api_key: None,
            windy_api_url: DEFAULT_WINDY_API_URL.to_string(),
            windy_model: "gfsWave".to_string(),
            daily_quota: 30,
            cache_ttl: Duration::from_secs(6 * 60 * 60),
            upstream_timeout: Duration::from_secs(10),
            cache_sweep_interval: Duration::from_secs(10 * 60),
            quota_reset_interval: Duration::from_secs(24 * 60 * 60),
            fallback_enabled: true,
            spots_file: "./data/spots.json".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("PORT", defaults.port),
            windy_api_key: std::env::var("WINDY_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            windy_api_url: std::env::var("WINDY_API_URL").unwrap_or(defaults.windy_api_url),
            windy_model: std::env::var("WINDY_MODEL").unwrap_or(defaults.windy_model),
            daily_quota: env_parse("DAILY_QUOTA", defaults.daily_quota),
            cache_ttl: env_secs("CACHE_TTL_SECS", defaults.cache_ttl),
            upstream_timeout: env_secs("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout),
            cache_sweep_interval: env_secs(
                "CACHE_SWEEP_INTERVAL_SECS",
                defaults.cache_sweep_interval,
            ),
            quota_reset_interval: env_secs(
                "QUOTA_RESET_INTERVAL_SECS",
                defaults.quota_reset_interval,
            ),
            fallback_enabled: env_parse("FALLBACK_ENABLED", defaults.fallback_enabled),
            spots_file: std::env::var("SPOTS_FILE").unwrap_or(defaults.spots_file),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} must be a valid value, got '{}'", name, raw)),
        Err(_) => default,
    }
}

fn env_secs(name: &str, default: Duration) -> Duration {
    let secs = env_parse(name, default.as_secs());
    if secs == 0 {
        panic!("{} must be greater than zero", name);
    }
    Duration::from_secs(secs)
}
