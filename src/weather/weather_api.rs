//! Current conditions from WeatherAPI.com

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::{WeatherSnapshot, WeatherSource};

#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub current: Current,
}

#[derive(Debug, Deserialize)]
pub struct Current {
    pub temp_c: f64,
    pub humidity: f64,
    pub wind_kph: f64,
    pub condition: Condition,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub text: String,
}

const STORM_KEYWORDS: &[&str] = &[
    "tempestade",
    "trovoada",
    "chuva forte",
    "chuva torrencial",
    "storm",
    "thunder",
    "heavy rain",
];
const LIGHT_RAIN_KEYWORDS: &[&str] = &["chuva", "garoa", "chuvisco", "drizzle", "rain"];
const FOG_KEYWORDS: &[&str] = &["neblina", "nevoeiro", "névoa", "fog", "mist"];
const CLOUD_KEYWORDS: &[&str] = &["nublado", "cloudy"];

const BASE_RISK: f64 = 0.1;

/// Additive climatic risk for driving, capped at 1.0
#[must_use]
pub fn climate_risk(condition: &str, wind_kph: f64, humidity: f64) -> f64 {
    let condition = condition.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| condition.contains(k));

    let mut risk = BASE_RISK;
    if mentions(STORM_KEYWORDS) {
        risk += 0.7;
    } else if mentions(LIGHT_RAIN_KEYWORDS) {
        risk += 0.4;
    }
    if mentions(FOG_KEYWORDS) {
        risk += 0.5;
    }
    if mentions(CLOUD_KEYWORDS) {
        risk += 0.1;
    }
    if wind_kph > 50.0 {
        risk += 0.3;
    } else if wind_kph > 30.0 {
        risk += 0.1;
    }
    if humidity > 85.0 {
        risk += 0.1;
    }
    risk.min(1.0)
}

/// Fetch current weather for a Brazilian city
pub async fn fetch_current(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    place: &str,
) -> Result<WeatherSnapshot, ProviderError> {
    let query = format!("{place}, Brasil");
    let url = format!(
        "{}/current.json?key={}&q={}&lang=pt&aqi=no",
        base_url,
        urlencoding::encode(api_key),
        urlencoding::encode(&query)
    );
    debug!("Calling the weather API for {}", place);

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }

    let body: CurrentResponse = response.json().await?;
    snapshot_from_response(place, body)
}

fn snapshot_from_response(
    place: &str,
    body: CurrentResponse,
) -> Result<WeatherSnapshot, ProviderError> {
    let current = body.current;
    if !(current.temp_c.is_finite() && current.humidity.is_finite() && current.wind_kph.is_finite())
    {
        return Err(ProviderError::Malformed("non-finite reading".to_string()));
    }

    Ok(WeatherSnapshot {
        place: place.to_string(),
        temperature_c: current.temp_c,
        climate_risk: climate_risk(&current.condition.text, current.wind_kph, current.humidity),
        condition: current.condition.text,
        humidity: current.humidity,
        wind_kph: current.wind_kph,
        source: WeatherSource::Real,
        fetched_at: Utc::now(),
    })
}
