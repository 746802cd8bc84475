//! Weather snapshot model and provenance

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a snapshot was simulated instead of fetched
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationReason {
    /// No weather API key configured
    Unconfigured,
    /// The weather service failed or returned an unusable payload
    ProviderUnavailable,
}

/// Provenance of a weather snapshot
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", content = "reason", rename_all = "kebab-case")]
pub enum WeatherSource {
    Real,
    Simulated(SimulationReason),
}

impl WeatherSource {
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        matches!(self, WeatherSource::Simulated(_))
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            WeatherSource::Real => "real",
            WeatherSource::Simulated(SimulationReason::Unconfigured) => "simulated — unconfigured",
            WeatherSource::Simulated(SimulationReason::ProviderUnavailable) => {
                "simulated — provider unavailable"
            }
        }
    }
}

/// Current weather at a place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Place name as requested
    pub place: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Human-readable condition (Portuguese)
    pub condition: String,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// Climatic risk in [0, 1]
    pub climate_risk: f64,
    pub source: WeatherSource,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels() {
        assert_eq!(WeatherSource::Real.label(), "real");
        assert!(
            WeatherSource::Simulated(SimulationReason::Unconfigured)
                .label()
                .contains("unconfigured")
        );
        assert!(WeatherSource::Simulated(SimulationReason::ProviderUnavailable).is_simulated());
        assert!(!WeatherSource::Real.is_simulated());
    }
}
