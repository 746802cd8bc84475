//! Place model for geographic coordinates and names

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees, within [-90, 90]
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180]
    pub longitude: f64,
}

impl Coordinates {
    /// Build coordinates only when both components are finite and inside
    /// geographic bounds.
    #[must_use]
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let coordinates = Self {
            latitude,
            longitude,
        };
        coordinates.is_valid().then_some(coordinates)
    }

    /// Parse textual coordinates, accepting a decimal comma ("-23,5505").
    #[must_use]
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let latitude = parse_decimal(latitude)?;
        let longitude = parse_decimal(longitude)?;
        Self::checked(latitude, longitude)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Format as "lat, lon" with four decimals
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Generate cache key for this coordinate pair
    #[must_use]
    pub fn to_key(&self) -> String {
        format!("{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// Parse a number that may use a decimal comma.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// A named location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    /// Place name (city, locality or the address as typed)
    pub name: String,
    /// Validated coordinates
    pub coordinates: Coordinates,
}

impl Place {
    /// Create a new place
    #[must_use]
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            coordinates,
        }
    }
}
