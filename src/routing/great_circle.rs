use async_trait::async_trait;
use haversine::{Location as HaversineLocation, Units, distance};

use super::{ResolvedPath, RouteProvider, round_km, whole_minutes};
use crate::error::ProviderError;
use crate::models::{Coordinates, RouteSource};

/// Straight-line distance in kilometers on a 6371 km sphere
#[must_use]
pub fn great_circle_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let from = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from, to, Units::Kilometers)
}

/// Local estimate used when no road router answers.
///
/// The geometry is just the two endpoints and the duration assumes a constant
/// average speed, so results are approximations and never cached.
#[derive(Debug, Clone, Copy)]
pub struct GreatCircleProvider {
    speed_kmh: f64,
}

impl GreatCircleProvider {
    #[must_use]
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    #[must_use]
    pub fn estimate(&self, origin: &Coordinates, destination: &Coordinates) -> ResolvedPath {
        let distance_km = round_km(great_circle_km(origin, destination));
        let duration_minutes = if self.speed_kmh > 0.0 {
            whole_minutes(distance_km / self.speed_kmh * 60.0)
        } else {
            0
        };
        ResolvedPath {
            geometry: vec![*origin, *destination],
            distance_km,
            duration_minutes,
        }
    }
}

#[async_trait]
impl RouteProvider for GreatCircleProvider {
    fn source(&self) -> RouteSource {
        RouteSource::GreatCircleEstimate
    }

    fn is_cacheable(&self) -> bool {
        false
    }

    async fn resolve(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<ResolvedPath, ProviderError> {
        Ok(self.estimate(origin, destination))
    }
}
