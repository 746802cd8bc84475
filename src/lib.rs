//! `RouteRisk` - road route resolution and accident risk scoring for Brazil
//!
//! This library resolves coordinates for free-text addresses, finds a
//! road-following path between two places through a chain of routing
//! providers, and scores the route's highways against historical accident
//! records from the federal highway police dataset.

pub mod accidents;
pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod planner;
pub mod risk;
pub mod routing;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use accidents::{AccidentRecord, AccidentStore, DatasetSummary};
pub use cache::TtlCache;
pub use catalog::{CatalogRoute, CatalogRouteId, City, RouteLookupError};
pub use config::RouteRiskConfig;
pub use error::{LoadError, ProviderError, ResolutionError, RouteRiskError};
pub use geocoding::GeocodeResolver;
pub use models::{
    Coordinates, Place, RiskDetails, RiskPoint, RiskPointOrigin, Route, RouteKind, RouteSource,
    WeatherSnapshot, WeatherSource,
};
pub use planner::{RoutePlanner, RouteReport, Session};
pub use risk::{Explanation, RiskExplainer, RiskScorer, RiskSummary, RouteRiskLevel, Severity};
pub use routing::{RouteChain, RouteProvider};
pub use weather::{RouteWeather, WeatherRiskProvider};

use rand::{RngExt, SeedableRng, rngs::StdRng};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RouteRiskError>;

/// Fresh generator for the sampling and simulation paths.
pub(crate) fn entropy_rng() -> StdRng {
    StdRng::seed_from_u64(rand::rng().random())
}
