//! Risk point model and map styling helpers

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Where a risk point came from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RiskPointOrigin {
    /// Authored with the catalog route
    Catalog,
    /// Derived from an accident record
    Derived,
}

/// Accident attributes attached to a derived risk point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RiskDetails {
    pub municipality: Option<String>,
    pub accident_type: Option<String>,
    pub cause: Option<String>,
    pub weather_condition: Option<String>,
    pub road_type: Option<String>,
    pub fatalities: u32,
    pub severe_injuries: u32,
    pub minor_injuries: u32,
    pub injuries: u32,
}

impl RiskDetails {
    /// Free-text fields in a fixed order
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.accident_type,
            &self.cause,
            &self.weather_condition,
            &self.road_type,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
    }
}

/// A scored location along a route
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RiskPoint {
    pub name: String,
    pub coordinates: Coordinates,
    /// Risk score in [0, 1]
    pub risk: f64,
    pub details: Option<RiskDetails>,
    pub origin: RiskPointOrigin,
}

/// Marker colour band for a risk point
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Orange,
    Yellow,
}

impl RiskPoint {
    /// Create a point, clamping the score into [0, 1]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        coordinates: Coordinates,
        risk: f64,
        origin: RiskPointOrigin,
    ) -> Self {
        Self {
            name: name.into(),
            coordinates,
            risk: clamp_risk(risk),
            details: None,
            origin,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: RiskDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Marker radius in pixels, from 5 (no risk) to 20 (maximum risk)
    #[must_use]
    pub fn marker_radius(&self) -> f64 {
        5.0 + self.risk * 15.0
    }

    #[must_use]
    pub fn marker_color(&self) -> MarkerColor {
        if self.risk >= 0.7 {
            MarkerColor::Red
        } else if self.risk >= 0.5 {
            MarkerColor::Orange
        } else {
            MarkerColor::Yellow
        }
    }
}

/// Clamp a risk score into [0, 1]; NaN maps to 0.
#[must_use]
pub fn clamp_risk(risk: f64) -> f64 {
    if risk.is_nan() {
        0.0
    } else {
        risk.clamp(0.0, 1.0)
    }
}
