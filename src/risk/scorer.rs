use rand::rngs::StdRng;
use rand::seq::index;
use tracing::debug;

use crate::accidents::{AccidentRecord, AccidentStore};
use crate::catalog::highway_label;
use crate::models::{RiskDetails, RiskPoint, RiskPointOrigin, Route};

// Additive severity weights. These are product policy, not a fitted model.
const BASE_RISK: f64 = 0.3;
const FATALITY_WEIGHT: f64 = 0.4;
const SEVERE_INJURY_WEIGHT: f64 = 0.2;
const RAIN_WEIGHT: f64 = 0.1;

/// Records sampled per highway
pub const SAMPLE_PER_HIGHWAY: usize = 10;
/// Below this many usable records or derived points the authored points are used
pub const MIN_DERIVED_POINTS: usize = 2;
/// Free-text detail fields are cut to this many characters
pub const DETAIL_TEXT_LIMIT: usize = 50;

/// Turns a route and the loaded accident data into risk points
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskScorer;

impl RiskScorer {
    /// Score a route with fresh sampling randomness
    #[must_use]
    pub fn score(&self, route: &Route, store: Option<&AccidentStore>) -> Vec<RiskPoint> {
        self.score_with_rng(route, store, &mut crate::entropy_rng())
    }

    /// Score a route with a caller-provided generator, for reproducible samples
    pub fn score_with_rng(
        &self,
        route: &Route,
        store: Option<&AccidentStore>,
        rng: &mut StdRng,
    ) -> Vec<RiskPoint> {
        let (Some(store), Some(highways)) = (store, route.highways()) else {
            debug!("No accident data or highways for route, using authored risk points");
            return route.fallback_points();
        };

        let usable: usize = highways
            .iter()
            .map(|highway| store.by_highway(*highway).len())
            .sum();
        if usable < MIN_DERIVED_POINTS {
            debug!("Only {} accident records on route highways", usable);
            return route.fallback_points();
        }

        let mut points = Vec::new();
        for &highway in highways {
            let records = store.by_highway(highway);
            let amount = records.len().min(SAMPLE_PER_HIGHWAY);
            for i in index::sample(rng, records.len(), amount) {
                points.push(risk_point(highway, &records[i]));
            }
        }

        if points.len() < MIN_DERIVED_POINTS {
            points.extend(route.fallback_points());
        }
        points
    }
}

/// Additive severity score of one accident, capped at 1.0
#[must_use]
pub fn record_risk(record: &AccidentRecord) -> f64 {
    let mut risk = BASE_RISK;
    if record.fatalities > 0 {
        risk += FATALITY_WEIGHT;
    }
    if record.severe_injuries > 0 {
        risk += SEVERE_INJURY_WEIGHT;
    }
    if record
        .weather_condition
        .as_deref()
        .is_some_and(is_rainy)
    {
        risk += RAIN_WEIGHT;
    }
    risk.min(1.0)
}

fn is_rainy(condition: &str) -> bool {
    let condition = condition.to_lowercase();
    condition.contains("chuva") || condition.contains("rain")
}

fn risk_point(highway: u16, record: &AccidentRecord) -> RiskPoint {
    let name = format!(
        "{} KM {}",
        highway_label(highway),
        record.km.as_deref().unwrap_or("?")
    );
    RiskPoint::new(
        name,
        record.coordinates,
        record_risk(record),
        RiskPointOrigin::Derived,
    )
    .with_details(details(record))
}

fn details(record: &AccidentRecord) -> RiskDetails {
    let truncate = |field: &Option<String>| {
        field
            .as_deref()
            .map(|text| text.chars().take(DETAIL_TEXT_LIMIT).collect::<String>())
    };
    RiskDetails {
        municipality: truncate(&record.municipality),
        accident_type: truncate(&record.accident_type),
        cause: truncate(&record.cause),
        weather_condition: truncate(&record.weather_condition),
        road_type: truncate(&record.road_type),
        fatalities: record.fatalities,
        severe_injuries: record.severe_injuries,
        minor_injuries: record.minor_injuries,
        injuries: record.injuries,
    }
}
