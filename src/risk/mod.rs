//! Accident-based risk scoring and explanation

use serde::{Deserialize, Serialize};

pub mod explainer;
pub mod scorer;

pub use explainer::{Explanation, RiskExplainer, Severity};
pub use scorer::RiskScorer;

/// Points at or above this score count as critical
pub const CRITICAL_POINT_THRESHOLD: f64 = 0.7;

/// Overall classification of a route
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RouteRiskLevel {
    Safe,
    Moderate,
    HighRisk,
}

impl RouteRiskLevel {
    #[must_use]
    pub fn from_mean(mean_risk: f64) -> Self {
        if mean_risk >= 0.7 {
            RouteRiskLevel::HighRisk
        } else if mean_risk >= 0.4 {
            RouteRiskLevel::Moderate
        } else {
            RouteRiskLevel::Safe
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            RouteRiskLevel::Safe => "Seguro",
            RouteRiskLevel::Moderate => "Moderado",
            RouteRiskLevel::HighRisk => "Alto risco",
        }
    }
}

/// Aggregate view of a route's risk points
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RiskSummary {
    pub points: usize,
    pub mean_risk: f64,
    pub critical_points: usize,
    pub level: RouteRiskLevel,
}

impl RiskSummary {
    /// Summarize points; no points means a safe route with zero mean risk.
    ///
    /// The mean is rounded to three decimals so that band edges are not
    /// missed by floating-point noise.
    #[must_use]
    pub fn from_points(points: &[crate::models::RiskPoint]) -> Self {
        let mean_risk = if points.is_empty() {
            0.0
        } else {
            let mean = points.iter().map(|p| p.risk).sum::<f64>() / points.len() as f64;
            (mean * 1000.0).round() / 1000.0
        };
        Self {
            points: points.len(),
            mean_risk,
            critical_points: points
                .iter()
                .filter(|p| p.risk >= CRITICAL_POINT_THRESHOLD)
                .count(),
            level: RouteRiskLevel::from_mean(mean_risk),
        }
    }
}
