//! Data models for the RouteRisk pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Place: validated coordinates and named places
//! - Route: resolved path geometry and its provenance
//! - Risk: scored points along a route
//! - Weather: current conditions and climatic risk

pub mod place;
pub mod risk;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use place::{Coordinates, Place};
pub use risk::{MarkerColor, RiskDetails, RiskPoint, RiskPointOrigin};
pub use route::{Route, RouteKind, RouteSource, format_duration};
pub use weather::{SimulationReason, WeatherSnapshot, WeatherSource};
