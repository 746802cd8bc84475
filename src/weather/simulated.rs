use chrono::Utc;
use rand::RngExt;
use rand::rngs::StdRng;

use crate::models::{SimulationReason, WeatherSnapshot, WeatherSource};

pub const CONDITIONS: [&str; 5] = [
    "Ensolarado",
    "Parcialmente nublado",
    "Nublado",
    "Chuva leve",
    "Chuva forte",
];

/// Fixed risk for a simulated condition label
#[must_use]
pub fn simulated_risk(condition: &str) -> f64 {
    let condition = condition.to_lowercase();
    if condition.contains("chuva forte") {
        0.8
    } else if condition.contains("chuva") {
        0.3
    } else {
        0.1
    }
}

/// Plausible random conditions, clearly tagged as simulated
pub fn simulated_snapshot(place: &str, reason: SimulationReason, rng: &mut StdRng) -> WeatherSnapshot {
    let condition = CONDITIONS[rng.random_range(0..CONDITIONS.len())];
    WeatherSnapshot {
        place: place.to_string(),
        temperature_c: f64::from(rng.random_range(15..=35_i32)),
        condition: condition.to_string(),
        humidity: f64::from(rng.random_range(40..=95_i32)),
        wind_kph: f64::from(rng.random_range(0..=40_i32)),
        climate_risk: simulated_risk(condition),
        source: WeatherSource::Simulated(reason),
        fetched_at: Utc::now(),
    }
}
