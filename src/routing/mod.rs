//! Road route resolution
//!
//! Providers are tried in a fixed order. Each one either produces a path or
//! fails with a [`ProviderError`], in which case the next tier is attempted.
//! The great-circle estimate always succeeds, so [`RouteChain::route`] never
//! fails; the route's [`RouteSource`] records which tier produced it.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::cache::TtlCache;
use crate::config::RoutingConfig;
use crate::error::{ProviderError, RouteRiskError};
use crate::models::{Coordinates, Place, Route, RouteKind, RouteSource};

pub mod graphhopper;
pub mod great_circle;
pub mod osrm;

pub use graphhopper::GraphHopperProvider;
pub use great_circle::GreatCircleProvider;
pub use osrm::OsrmProvider;

/// Normalized provider output, before it is attached to places
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedPath {
    /// (latitude, longitude) points in travel order
    pub geometry: Vec<Coordinates>,
    pub distance_km: f64,
    pub duration_minutes: u32,
}

/// One tier of the routing chain
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Tag recorded on routes this provider produces
    fn source(&self) -> RouteSource;

    /// Whether results are worth memoizing; local computations are not
    fn is_cacheable(&self) -> bool {
        true
    }

    async fn resolve(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<ResolvedPath, ProviderError>;
}

/// Round to one decimal place
pub(crate) fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// Convert a non-negative float of minutes into whole minutes
pub(crate) fn whole_minutes(minutes: f64) -> u32 {
    if minutes.is_finite() && minutes > 0.0 {
        minutes.round() as u32
    } else {
        0
    }
}

/// Build an HTTP client with the routing timeout
pub(crate) fn http_client(timeout: Duration) -> crate::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(format!("RouteRisk/{}", crate::VERSION))
        .build()
        .map_err(|e| RouteRiskError::config(format!("Failed to create HTTP client: {e}")))
}

/// Ordered fallback chain of route providers
pub struct RouteChain {
    providers: Vec<Box<dyn RouteProvider>>,
    terminal: GreatCircleProvider,
    cache: TtlCache<(RouteSource, ResolvedPath)>,
}

impl RouteChain {
    /// Create a chain from explicit providers.
    ///
    /// A great-circle estimate at `fallback_speed_kmh` is used when every
    /// provider fails.
    #[must_use]
    pub fn new(
        providers: Vec<Box<dyn RouteProvider>>,
        fallback_speed_kmh: f64,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            providers,
            terminal: GreatCircleProvider::new(fallback_speed_kmh),
            cache: TtlCache::new("routing", cache_ttl),
        }
    }

    /// Primary road router, secondary road router, then great-circle estimate
    pub fn from_config(config: &RoutingConfig) -> crate::Result<Self> {
        let providers: Vec<Box<dyn RouteProvider>> = vec![
            Box::new(OsrmProvider::new(&config.primary_base_url, config.timeout())?),
            Box::new(GraphHopperProvider::new(
                &config.secondary_base_url,
                config.secondary_api_key.clone(),
                config.timeout(),
            )?),
        ];
        Ok(Self::new(
            providers,
            config.fallback_speed_kmh,
            config.cache_ttl(),
        ))
    }

    /// Resolve a path, returning the tier that produced it
    #[instrument(name = "resolve_route", skip(self))]
    pub async fn resolve(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> (RouteSource, ResolvedPath) {
        let key = format!("{};{}", origin.to_key(), destination.to_key());
        if let Some(cached) = self.cache.get(&key) {
            debug!("Using cached {} route", cached.0.as_str());
            return cached;
        }

        for provider in &self.providers {
            let source = provider.source();
            match provider.resolve(origin, destination).await {
                Ok(path) => {
                    info!(
                        "Route resolved by {}: {} km, {} min, {} points",
                        source.as_str(),
                        path.distance_km,
                        path.duration_minutes,
                        path.geometry.len()
                    );
                    if provider.is_cacheable() {
                        self.cache.put(&key, (source, path.clone()));
                    }
                    return (source, path);
                }
                Err(ProviderError::NotConfigured) => {
                    debug!("Skipping {}: not configured", source.as_str());
                }
                Err(e) => {
                    warn!("Routing provider {} failed: {}", source.as_str(), e);
                }
            }
        }

        warn!("All routing providers failed, using great-circle estimate");
        (self.terminal.source(), self.terminal.estimate(origin, destination))
    }

    /// Route between two places. Never fails; degraded results are tagged.
    pub async fn route(&self, origin: &Place, destination: &Place) -> Route {
        let (source, path) = self
            .resolve(&origin.coordinates, &destination.coordinates)
            .await;
        Route {
            origin: origin.clone(),
            destination: destination.clone(),
            geometry: path.geometry,
            distance_km: path.distance_km,
            duration_minutes: path.duration_minutes,
            source,
            kind: RouteKind::AdHoc,
        }
    }
}
