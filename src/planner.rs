//! End-to-end route analysis
//!
//! [`RoutePlanner`] wires the resolvers together: geocoding for ad-hoc
//! routes, the routing chain, risk scoring and explanation, and weather at
//! both endpoints. Mutable per-user state lives in [`Session`], which callers
//! pass in explicitly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accidents::AccidentStore;
use crate::catalog::{CatalogRoute, CatalogRouteId};
use crate::config::RouteRiskConfig;
use crate::error::ResolutionError;
use crate::geocoding::GeocodeResolver;
use crate::models::{Place, RiskPoint, Route, RouteKind, WeatherSnapshot};
use crate::risk::{Explanation, RiskExplainer, RiskScorer, RiskSummary};
use crate::routing::RouteChain;
use crate::weather::{RouteWeather, WeatherRiskProvider};

/// Per-user state: the uploaded dataset and the last ad-hoc route
#[derive(Debug, Default, Clone)]
pub struct Session {
    store: Option<Arc<AccidentStore>>,
    last_personalized_route: Option<RouteReport>,
}

impl Session {
    /// Replace the dataset wholesale
    pub fn replace_store(&mut self, store: AccidentStore) {
        self.store = Some(Arc::new(store));
    }

    #[must_use]
    pub fn store(&self) -> Option<Arc<AccidentStore>> {
        self.store.clone()
    }

    pub fn clear_store(&mut self) {
        self.store = None;
    }

    pub fn remember_route(&mut self, report: RouteReport) {
        self.last_personalized_route = Some(report);
    }

    #[must_use]
    pub fn last_personalized_route(&self) -> Option<&RouteReport> {
        self.last_personalized_route.as_ref()
    }
}

/// A risk point with its explanation and map styling
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScoredPoint {
    pub point: RiskPoint,
    pub explanation: Explanation,
    pub marker_radius: f64,
    pub marker_color: crate::models::MarkerColor,
}

impl ScoredPoint {
    fn new(point: RiskPoint, explainer: &RiskExplainer) -> Self {
        Self {
            explanation: explainer.explain(&point),
            marker_radius: point.marker_radius(),
            marker_color: point.marker_color(),
            point,
        }
    }
}

/// Everything known about one analysed route
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RouteReport {
    pub route: Route,
    pub duration_label: String,
    /// Catalog facts, for catalog routes only
    pub catalog: Option<CatalogRoute>,
    pub points: Vec<ScoredPoint>,
    pub summary: RiskSummary,
    pub weather: RouteWeather,
    /// Whether the points were derived from a loaded dataset
    pub uses_accident_data: bool,
}

pub struct RoutePlanner {
    geocoder: GeocodeResolver,
    routes: RouteChain,
    weather: WeatherRiskProvider,
    scorer: RiskScorer,
    explainer: RiskExplainer,
}

impl RoutePlanner {
    #[must_use]
    pub fn new(geocoder: GeocodeResolver, routes: RouteChain, weather: WeatherRiskProvider) -> Self {
        Self {
            geocoder,
            routes,
            weather,
            scorer: RiskScorer,
            explainer: RiskExplainer,
        }
    }

    pub fn from_config(config: &RouteRiskConfig) -> crate::Result<Self> {
        Ok(Self::new(
            GeocodeResolver::from_config(&config.geocoding)?,
            RouteChain::from_config(&config.routing)?,
            WeatherRiskProvider::from_config(&config.weather)?,
        ))
    }

    /// Analyse a catalog route
    pub async fn plan_catalog(&self, id: CatalogRouteId, session: &Session) -> RouteReport {
        let catalog = id.route();
        let origin = catalog.origin.place();
        let destination = catalog.destination.place();

        let route = self
            .routes
            .route(&origin, &destination)
            .await
            .with_kind(RouteKind::Catalog(id));
        self.report(route, Some(catalog.clone()), session).await
    }

    /// Resolve two addresses and analyse the route between them.
    ///
    /// The report is remembered as the session's personalized route.
    pub async fn plan_addresses(
        &self,
        origin: &str,
        destination: &str,
        session: &mut Session,
    ) -> Result<RouteReport, ResolutionError> {
        // One lookup at a time; public Nominatim allows a single request per second.
        let origin = self.geocoder.resolve(origin).await?;
        let destination = self.geocoder.resolve(destination).await?;

        let route = self.routes.route(&origin, &destination).await;
        let report = self.report(route, None, session).await;
        session.remember_route(report.clone());
        Ok(report)
    }

    pub async fn geocode(&self, address: &str) -> Result<Place, ResolutionError> {
        self.geocoder.resolve(address).await
    }

    pub async fn weather(&self, place: &str) -> WeatherSnapshot {
        self.weather.current(place).await
    }

    #[must_use]
    pub fn explain(&self, point: &RiskPoint) -> Explanation {
        self.explainer.explain(point)
    }

    async fn report(
        &self,
        route: Route,
        catalog: Option<CatalogRoute>,
        session: &Session,
    ) -> RouteReport {
        let store = session.store();
        let points = self.scorer.score(&route, store.as_deref());
        let uses_accident_data = points
            .iter()
            .any(|p| p.origin == crate::models::RiskPointOrigin::Derived);
        let summary = RiskSummary::from_points(&points);
        let weather = self
            .weather
            .route_weather(&route.origin.name, &route.destination.name)
            .await;

        info!(
            "Analysed {} -> {} via {}: {} points, mean risk {:.2}",
            route.origin.name,
            route.destination.name,
            route.source.as_str(),
            summary.points,
            summary.mean_risk
        );

        RouteReport {
            duration_label: route.duration_label(),
            points: points
                .into_iter()
                .map(|point| ScoredPoint::new(point, &self.explainer))
                .collect(),
            catalog,
            summary,
            weather,
            uses_accident_data,
            route,
        }
    }
}
