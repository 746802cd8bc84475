//! Current weather and climatic driving risk
//!
//! [`WeatherRiskProvider::current`] never fails: without an API key, or when
//! the service misbehaves, it returns a simulated snapshot whose source says
//! why. Every snapshot, simulated or not, is cached per place.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::cache::TtlCache;
use crate::config::WeatherConfig;
use crate::error::{ProviderError, RouteRiskError};
use crate::models::{SimulationReason, WeatherSnapshot};

pub mod simulated;
pub mod weather_api;

/// Combined climatic risk above this raises a route alert
pub const ROUTE_ALERT_THRESHOLD: f64 = 0.5;

/// Weather at both ends of a route
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouteWeather {
    pub origin: WeatherSnapshot,
    pub destination: WeatherSnapshot,
    /// Mean of both endpoint risks
    pub combined_risk: f64,
    pub alert: bool,
}

impl RouteWeather {
    #[must_use]
    pub fn new(origin: WeatherSnapshot, destination: WeatherSnapshot) -> Self {
        let mean = (origin.climate_risk + destination.climate_risk) / 2.0;
        let combined_risk = (mean * 1000.0).round() / 1000.0;
        Self {
            alert: combined_risk > ROUTE_ALERT_THRESHOLD,
            combined_risk,
            origin,
            destination,
        }
    }
}

pub struct WeatherRiskProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    cache: TtlCache<WeatherSnapshot>,
}

impl WeatherRiskProvider {
    pub fn from_config(config: &WeatherConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("RouteRisk/{}", crate::VERSION))
            .build()
            .map_err(|e| RouteRiskError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            cache: TtlCache::new("weather", config.cache_ttl()),
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Current weather for a place name
    #[instrument(name = "current_weather", skip(self))]
    pub async fn current(&self, place: &str) -> WeatherSnapshot {
        let place = place.trim();
        let key = place.to_lowercase();
        if let Some(snapshot) = self.cache.get(&key) {
            debug!("Using cached weather for {}", place);
            return snapshot;
        }

        let snapshot = match self.fetch(place).await {
            Ok(snapshot) => snapshot,
            Err(ProviderError::NotConfigured) => {
                debug!("No weather API key, simulating weather for {}", place);
                self.simulate(place, SimulationReason::Unconfigured)
            }
            Err(e) => {
                warn!("Weather provider failed for {}: {}", place, e);
                self.simulate(place, SimulationReason::ProviderUnavailable)
            }
        };

        self.cache.put(&key, snapshot.clone());
        snapshot
    }

    /// Weather at both endpoints, fetched concurrently
    pub async fn route_weather(&self, origin: &str, destination: &str) -> RouteWeather {
        let (origin, destination) = tokio::join!(self.current(origin), self.current(destination));
        RouteWeather::new(origin, destination)
    }

    async fn fetch(&self, place: &str) -> Result<WeatherSnapshot, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        weather_api::fetch_current(&self.client, &self.base_url, api_key, place).await
    }

    fn simulate(&self, place: &str, reason: SimulationReason) -> WeatherSnapshot {
        simulated::simulated_snapshot(place, reason, &mut crate::entropy_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherSource;

    fn unconfigured() -> WeatherRiskProvider {
        WeatherRiskProvider::from_config(&WeatherConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_provider_simulates() {
        let provider = unconfigured();
        assert!(!provider.is_configured());

        let snapshot = provider.current("Campinas").await;
        assert_eq!(
            snapshot.source,
            WeatherSource::Simulated(SimulationReason::Unconfigured)
        );
        assert_eq!(snapshot.place, "Campinas");
        assert!((0.0..=1.0).contains(&snapshot.climate_risk));
    }

    #[tokio::test]
    async fn test_simulated_snapshots_are_cached() {
        let provider = unconfigured();
        let first = provider.current("Santos").await;
        let second = provider.current(" santos ").await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_key_counts_as_unconfigured() {
        let config = WeatherConfig {
            api_key: Some("  ".to_string()),
            ..WeatherConfig::default()
        };
        assert!(!WeatherRiskProvider::from_config(&config).unwrap().is_configured());
    }

    #[test]
    fn test_route_weather_alert() {
        let provider = unconfigured();
        let mut origin = provider.simulate("São Paulo", SimulationReason::Unconfigured);
        let mut destination = provider.simulate("Rio de Janeiro", SimulationReason::Unconfigured);

        origin.climate_risk = 0.8;
        destination.climate_risk = 0.3;
        let weather = RouteWeather::new(origin.clone(), destination.clone());
        assert!((weather.combined_risk - 0.55).abs() < 1e-9);
        assert!(weather.alert);

        origin.climate_risk = 0.8;
        destination.climate_risk = 0.2;
        let weather = RouteWeather::new(origin, destination);
        assert!(!weather.alert);
    }
}
