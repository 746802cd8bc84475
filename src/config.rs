//! Configuration management for `RouteRisk`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::RouteRiskError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `RouteRisk` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RouteRiskConfig {
    /// Address geocoding service
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Routing provider chain
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Current-weather service
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim-compatible search service
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// User agent sent with every request; the public service rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures
    #[serde(default = "default_geocoding_max_retries")]
    pub max_retries: u32,
    /// Lifetime of successful lookups in minutes
    #[serde(default = "default_geocoding_cache_ttl")]
    pub cache_ttl_minutes: u32,
}

/// Routing provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL of the primary (OSRM-compatible) road router
    #[serde(default = "default_primary_base_url")]
    pub primary_base_url: String,
    /// Base URL of the secondary (GraphHopper-compatible) road router
    #[serde(default = "default_secondary_base_url")]
    pub secondary_base_url: String,
    /// API key for the secondary router; the tier is skipped without one
    pub secondary_api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_routing_timeout")]
    pub timeout_seconds: u32,
    /// Lifetime of cached road routes in minutes
    #[serde(default = "default_routing_cache_ttl")]
    pub cache_ttl_minutes: u32,
    /// Average speed used to estimate duration of straight-line routes
    #[serde(default = "default_fallback_speed")]
    pub fallback_speed_kmh: f64,
}

/// Weather service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// WeatherAPI key; weather is simulated without one
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Lifetime of cached snapshots in minutes
    #[serde(default = "default_weather_cache_ttl")]
    pub cache_ttl_minutes: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Largest accepted accident archive upload in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u32,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("RouteRisk/{}", crate::VERSION)
}

fn default_geocoding_timeout() -> u32 {
    10
}

fn default_geocoding_max_retries() -> u32 {
    1
}

fn default_geocoding_cache_ttl() -> u32 {
    60
}

fn default_primary_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_secondary_base_url() -> String {
    "https://graphhopper.com/api/1".to_string()
}

fn default_routing_timeout() -> u32 {
    15
}

fn default_routing_cache_ttl() -> u32 {
    60
}

fn default_fallback_speed() -> f64 {
    60.0
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_weather_cache_ttl() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_upload_mb() -> u32 {
    200
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_geocoding_timeout(),
            max_retries: default_geocoding_max_retries(),
            cache_ttl_minutes: default_geocoding_cache_ttl(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            primary_base_url: default_primary_base_url(),
            secondary_base_url: default_secondary_base_url(),
            secondary_api_key: None,
            timeout_seconds: default_routing_timeout(),
            cache_ttl_minutes: default_routing_cache_ttl(),
            fallback_speed_kmh: default_fallback_speed(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            cache_ttl_minutes: default_weather_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

fn seconds(value: u32) -> Duration {
    Duration::from_secs(u64::from(value))
}

fn minutes(value: u32) -> Duration {
    Duration::from_secs(u64::from(value) * 60)
}

impl GeocodingConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        seconds(self.timeout_seconds)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        minutes(self.cache_ttl_minutes)
    }
}

impl RoutingConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        seconds(self.timeout_seconds)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        minutes(self.cache_ttl_minutes)
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        seconds(self.timeout_seconds)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        minutes(self.cache_ttl_minutes)
    }
}

impl ServerConfig {
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }
}

impl RouteRiskConfig {
    /// Load configuration from the given file, or the default location, plus environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. ROUTERISK_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("ROUTERISK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: RouteRiskConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("routerisk").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.geocoding.cache_ttl_minutes == 0 {
            self.geocoding.cache_ttl_minutes = default_geocoding_cache_ttl();
        }
        if self.routing.primary_base_url.is_empty() {
            self.routing.primary_base_url = default_primary_base_url();
        }
        if self.routing.secondary_base_url.is_empty() {
            self.routing.secondary_base_url = default_secondary_base_url();
        }
        if self.routing.timeout_seconds == 0 {
            self.routing.timeout_seconds = default_routing_timeout();
        }
        if self.routing.cache_ttl_minutes == 0 {
            self.routing.cache_ttl_minutes = default_routing_cache_ttl();
        }
        if self.routing.fallback_speed_kmh == 0.0 {
            self.routing.fallback_speed_kmh = default_fallback_speed();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.cache_ttl_minutes == 0 {
            self.weather.cache_ttl_minutes = default_weather_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.bind_address.is_empty() {
            self.server.bind_address = default_bind_address();
        }
        if self.server.max_upload_mb == 0 {
            self.server.max_upload_mb = default_max_upload_mb();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("Weather", &self.weather.api_key),
            ("Secondary routing", &self.routing.secondary_api_key),
        ];
        for (service, key) in keys {
            if let Some(key) = key
                && key.trim().is_empty()
            {
                return Err(RouteRiskError::config(format!(
                    "{service} API key cannot be empty if provided. Either remove it or provide a valid key."
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let timeouts = [
            ("Geocoding", self.geocoding.timeout_seconds),
            ("Routing", self.routing.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
        ];
        for (service, timeout) in timeouts {
            if timeout > 300 {
                return Err(RouteRiskError::config(format!(
                    "{service} timeout cannot exceed 300 seconds"
                ))
                .into());
            }
        }

        let ttls = [
            ("Geocoding", self.geocoding.cache_ttl_minutes),
            ("Routing", self.routing.cache_ttl_minutes),
            ("Weather", self.weather.cache_ttl_minutes),
        ];
        for (service, ttl) in ttls {
            if ttl > 24 * 60 {
                return Err(RouteRiskError::config(format!(
                    "{service} cache TTL cannot exceed 1440 minutes (1 day)"
                ))
                .into());
            }
        }

        if self.geocoding.max_retries > 10 {
            return Err(RouteRiskError::config("Geocoding max retries cannot exceed 10").into());
        }

        if !(self.routing.fallback_speed_kmh > 0.0 && self.routing.fallback_speed_kmh <= 200.0) {
            return Err(RouteRiskError::config(
                "Fallback speed must be between 0 and 200 km/h",
            )
            .into());
        }

        if self.server.max_upload_mb > 2048 {
            return Err(RouteRiskError::config("Upload limit cannot exceed 2048 MB").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RouteRiskError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RouteRiskError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Geocoding", &self.geocoding.base_url),
            ("Primary routing", &self.routing.primary_base_url),
            ("Secondary routing", &self.routing.secondary_base_url),
            ("Weather", &self.weather.base_url),
        ];
        for (service, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RouteRiskError::config(format!(
                    "{service} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouteRiskConfig::default();
        assert_eq!(config.geocoding.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.geocoding.timeout(), Duration::from_secs(10));
        assert_eq!(config.routing.timeout(), Duration::from_secs(15));
        assert_eq!(config.routing.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.weather.cache_ttl(), Duration::from_secs(1800));
        assert_eq!(config.routing.fallback_speed_kmh, 60.0);
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_none());
        assert!(config.routing.secondary_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_blank_api_key() {
        let mut config = RouteRiskConfig::default();
        config.weather.api_key = Some("   ".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Weather API key"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = RouteRiskConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = RouteRiskConfig::default();
        config.routing.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = RouteRiskConfig::default();
        config.routing.fallback_speed_kmh = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = RouteRiskConfig::default();
        config.routing.primary_base_url = "router.local".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Primary routing"));
    }

    #[test]
    fn test_apply_defaults_repairs_zero_values() {
        let mut config = RouteRiskConfig::default();
        config.weather.timeout_seconds = 0;
        config.routing.fallback_speed_kmh = 0.0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.routing.fallback_speed_kmh, 60.0);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file_keeps_unspecified_defaults() {
        let path = std::env::temp_dir().join(format!(
            "routerisk-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[routing]\nfallback_speed_kmh = 80.0\nsecondary_api_key = \"gh-key\"\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = RouteRiskConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert_eq!(config.routing.fallback_speed_kmh, 80.0);
        assert_eq!(config.routing.secondary_api_key.as_deref(), Some("gh-key"));
        assert_eq!(config.routing.primary_base_url, "https://router.project-osrm.org");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.weather.cache_ttl_minutes, 30);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = RouteRiskConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("routerisk"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
