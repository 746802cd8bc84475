//! Route model and duration formatting

use serde::{Deserialize, Serialize};

use super::{Coordinates, Place, RiskPoint};
use crate::catalog::CatalogRouteId;

/// Which tier of the provider chain produced a route's geometry
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RouteSource {
    /// Road-graph routing from the primary provider
    PrimaryProvider,
    /// Road-graph routing from the secondary provider
    SecondaryProvider,
    /// Straight-line estimate; not road-following
    GreatCircleEstimate,
}

impl RouteSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteSource::PrimaryProvider => "primary-provider",
            RouteSource::SecondaryProvider => "secondary-provider",
            RouteSource::GreatCircleEstimate => "great-circle-estimate",
        }
    }

    /// True when the geometry follows actual roads
    #[must_use]
    pub fn is_road_geometry(&self) -> bool {
        !matches!(self, RouteSource::GreatCircleEstimate)
    }
}

/// Whether a route comes from the catalog or from two resolved addresses
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum RouteKind {
    Catalog(CatalogRouteId),
    AdHoc,
}

/// A resolved route between two places
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Route {
    pub origin: Place,
    pub destination: Place,
    /// Path geometry as (latitude, longitude) points
    pub geometry: Vec<Coordinates>,
    /// Total distance in kilometers
    pub distance_km: f64,
    /// Estimated travel time in minutes
    pub duration_minutes: u32,
    pub source: RouteSource,
    pub kind: RouteKind,
}

impl Route {
    /// Highways associated with the route; only catalog routes have any
    #[must_use]
    pub fn highways(&self) -> Option<&'static [u16]> {
        match self.kind {
            RouteKind::Catalog(id) => Some(id.route().highways),
            RouteKind::AdHoc => None,
        }
    }

    /// Authored risk points shown when accident data is insufficient
    #[must_use]
    pub fn fallback_points(&self) -> Vec<RiskPoint> {
        match self.kind {
            RouteKind::Catalog(id) => id.route().static_risk_points(),
            RouteKind::AdHoc => Vec::new(),
        }
    }

    /// Attach catalog identity to a route resolved by the provider chain
    #[must_use]
    pub fn with_kind(mut self, kind: RouteKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn duration_label(&self) -> String {
        format_duration(self.duration_minutes)
    }
}

/// Format minutes as "5h 30min", or "45min" below one hour.
#[must_use]
pub fn format_duration(minutes: u32) -> String {
    if minutes >= 60 {
        format!("{}h {}min", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}min")
    }
}
