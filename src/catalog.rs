//! Catalog of pre-authored cities and routes
//!
//! Catalog routes carry their highways, toll counts and static risk points so
//! the pipeline always has something to show when no accident data is loaded.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Coordinates, Place, RiskPoint, RiskPointOrigin, format_duration};

/// Catalog lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteLookupError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("No catalog route from {origin} to {destination}")]
    NotInCatalog { origin: City, destination: City },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum City {
    SaoPaulo,
    RioDeJaneiro,
    BeloHorizonte,
    Campinas,
    SaoJoseDosCampos,
    Sorocaba,
    Santos,
    Guarulhos,
}

/// Static facts about a catalog city
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CityInfo {
    pub name: &'static str,
    pub coordinates: Coordinates,
    pub population: u32,
    /// Baseline risk of the metropolitan area in [0, 1]
    pub base_risk: f64,
    /// Main federal highways serving the city
    pub highways: &'static [u16],
}

const fn city(
    name: &'static str,
    latitude: f64,
    longitude: f64,
    population: u32,
    base_risk: f64,
    highways: &'static [u16],
) -> CityInfo {
    CityInfo {
        name,
        coordinates: Coordinates {
            latitude,
            longitude,
        },
        population,
        base_risk,
        highways,
    }
}

impl City {
    pub const ALL: [City; 8] = [
        City::SaoPaulo,
        City::RioDeJaneiro,
        City::BeloHorizonte,
        City::Campinas,
        City::SaoJoseDosCampos,
        City::Sorocaba,
        City::Santos,
        City::Guarulhos,
    ];

    #[must_use]
    pub const fn info(self) -> CityInfo {
        match self {
            City::SaoPaulo => city("São Paulo", -23.5505, -46.6333, 12_400_000, 0.6, &[116, 381, 374]),
            City::RioDeJaneiro => {
                city("Rio de Janeiro", -22.9068, -43.1729, 6_700_000, 0.7, &[116, 40, 101])
            }
            City::BeloHorizonte => {
                city("Belo Horizonte", -19.9167, -43.9345, 2_500_000, 0.4, &[381, 40, 262])
            }
            City::Campinas => city("Campinas", -22.9056, -47.0608, 1_200_000, 0.3, &[348, 374]),
            City::SaoJoseDosCampos => {
                city("São José dos Campos", -23.1896, -45.8841, 700_000, 0.25, &[116])
            }
            City::Sorocaba => city("Sorocaba", -23.5015, -47.4526, 650_000, 0.35, &[374]),
            City::Santos => city("Santos", -23.9618, -46.3322, 430_000, 0.5, &[101, 116]),
            City::Guarulhos => city("Guarulhos", -23.4536, -46.5228, 1_400_000, 0.45, &[116]),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.info().name
    }

    #[must_use]
    pub fn place(self) -> Place {
        let info = self.info();
        Place::new(info.name, info.coordinates)
    }

    /// Look up a city by its display name, ignoring case and surrounding whitespace
    pub fn from_name(name: &str) -> Result<City, RouteLookupError> {
        let wanted = name.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|city| city.name().to_lowercase() == wanted)
            .ok_or_else(|| RouteLookupError::UnknownCity(name.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An authored risk point of a catalog route
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct StaticRiskPoint {
    pub name: &'static str,
    pub coordinates: Coordinates,
    pub risk: f64,
}

const fn hotspot(name: &'static str, latitude: f64, longitude: f64, risk: f64) -> StaticRiskPoint {
    StaticRiskPoint {
        name,
        coordinates: Coordinates {
            latitude,
            longitude,
        },
        risk,
    }
}

/// Identifier of a catalog route
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogRouteId {
    SaoPauloRioDeJaneiro,
    SaoPauloBeloHorizonte,
    SaoPauloCampinas,
    RioDeJaneiroBeloHorizonte,
}

/// A pre-authored origin/destination pair
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CatalogRoute {
    pub id: CatalogRouteId,
    pub origin: City,
    pub destination: City,
    /// Road distance in kilometers as published for the route
    pub distance_km: u32,
    pub typical_duration_minutes: u32,
    pub highways: &'static [u16],
    pub tolls: u8,
    pub risk_points: &'static [StaticRiskPoint],
}

static ROUTES: [CatalogRoute; 4] = [
    CatalogRoute {
        id: CatalogRouteId::SaoPauloRioDeJaneiro,
        origin: City::SaoPaulo,
        destination: City::RioDeJaneiro,
        distance_km: 435,
        typical_duration_minutes: 330,
        highways: &[116],
        tolls: 12,
        risk_points: &[
            hotspot("Região de Queluz", -22.5320, -44.7736, 0.8),
            hotspot("Serra das Araras", -22.7039, -43.6828, 0.6),
            hotspot("Dutra - Jacareí", -23.3055, -45.9663, 0.7),
        ],
    },
    CatalogRoute {
        id: CatalogRouteId::SaoPauloBeloHorizonte,
        origin: City::SaoPaulo,
        destination: City::BeloHorizonte,
        distance_km: 586,
        typical_duration_minutes: 435,
        highways: &[381],
        tolls: 8,
        risk_points: &[
            hotspot("Região de Poços de Caldas", -21.7887, -46.5651, 0.5),
            hotspot("Fernão Dias - Atibaia", -23.1169, -46.5500, 0.6),
        ],
    },
    CatalogRoute {
        id: CatalogRouteId::SaoPauloCampinas,
        origin: City::SaoPaulo,
        destination: City::Campinas,
        distance_km: 96,
        typical_duration_minutes: 80,
        highways: &[348],
        tolls: 3,
        risk_points: &[hotspot("Região de Jundiaí", -23.1864, -46.8842, 0.4)],
    },
    CatalogRoute {
        id: CatalogRouteId::RioDeJaneiroBeloHorizonte,
        origin: City::RioDeJaneiro,
        destination: City::BeloHorizonte,
        distance_km: 441,
        typical_duration_minutes: 360,
        highways: &[40],
        tolls: 6,
        risk_points: &[
            hotspot("BR-040 Juiz de Fora", -21.7642, -43.3503, 0.5),
            hotspot("Região de Petrópolis", -22.5097, -43.1756, 0.6),
        ],
    },
];

impl CatalogRouteId {
    pub const ALL: [CatalogRouteId; 4] = [
        CatalogRouteId::SaoPauloRioDeJaneiro,
        CatalogRouteId::SaoPauloBeloHorizonte,
        CatalogRouteId::SaoPauloCampinas,
        CatalogRouteId::RioDeJaneiroBeloHorizonte,
    ];

    #[must_use]
    pub fn route(self) -> &'static CatalogRoute {
        let index = match self {
            CatalogRouteId::SaoPauloRioDeJaneiro => 0,
            CatalogRouteId::SaoPauloBeloHorizonte => 1,
            CatalogRouteId::SaoPauloCampinas => 2,
            CatalogRouteId::RioDeJaneiroBeloHorizonte => 3,
        };
        &ROUTES[index]
    }

    /// Find the catalog route for an ordered origin/destination pair
    pub fn between(origin: City, destination: City) -> Result<CatalogRouteId, RouteLookupError> {
        CatalogRouteId::ALL
            .into_iter()
            .find(|id| {
                let route = id.route();
                route.origin == origin && route.destination == destination
            })
            .ok_or(RouteLookupError::NotInCatalog {
                origin,
                destination,
            })
    }
}

impl CatalogRoute {
    #[must_use]
    pub fn typical_duration_label(&self) -> String {
        format_duration(self.typical_duration_minutes)
    }

    /// Authored points as risk points tagged with catalog origin
    #[must_use]
    pub fn static_risk_points(&self) -> Vec<RiskPoint> {
        self.risk_points
            .iter()
            .map(|point| {
                RiskPoint::new(point.name, point.coordinates, point.risk, RiskPointOrigin::Catalog)
            })
            .collect()
    }
}

/// Format a federal highway number the way it is signposted ("BR-040")
#[must_use]
pub fn highway_label(highway: u16) -> String {
    format!("BR-{highway:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_ids_point_at_their_own_entry() {
        for id in CatalogRouteId::ALL {
            assert_eq!(id.route().id, id);
        }
    }

    #[test]
    fn test_between_is_ordered() {
        assert_eq!(
            CatalogRouteId::between(City::SaoPaulo, City::RioDeJaneiro),
            Ok(CatalogRouteId::SaoPauloRioDeJaneiro)
        );
        assert_eq!(
            CatalogRouteId::between(City::RioDeJaneiro, City::SaoPaulo),
            Err(RouteLookupError::NotInCatalog {
                origin: City::RioDeJaneiro,
                destination: City::SaoPaulo,
            })
        );
    }

    #[test]
    fn test_city_lookup_by_name() {
        assert_eq!(City::from_name("  são paulo "), Ok(City::SaoPaulo));
        assert_eq!(City::from_name("Santos"), Ok(City::Santos));
        assert!(matches!(
            City::from_name("Curitiba"),
            Err(RouteLookupError::UnknownCity(_))
        ));
    }

    #[test]
    fn test_static_points_are_catalog_tagged() {
        let points = CatalogRouteId::SaoPauloRioDeJaneiro.route().static_risk_points();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.origin == RiskPointOrigin::Catalog));
        assert_eq!(points[0].name, "Região de Queluz");
        assert_eq!(points[0].risk, 0.8);
    }

    #[test]
    fn test_labels() {
        assert_eq!(highway_label(40), "BR-040");
        assert_eq!(highway_label(116), "BR-116");
        assert_eq!(
            CatalogRouteId::SaoPauloRioDeJaneiro.route().typical_duration_label(),
            "5h 30min"
        );
        assert_eq!(City::SaoJoseDosCampos.to_string(), "São José dos Campos");
    }
}
