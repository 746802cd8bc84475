//! Primary road router (OSRM route service)

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ResolvedPath, RouteProvider, http_client, round_km, whole_minutes};
use crate::error::ProviderError;
use crate::models::{Coordinates, RouteSource};

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// (longitude, latitude) pairs
    coordinates: Vec<[f64; 2]>,
}

pub struct OsrmProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmProvider {
    pub fn new(base_url: &str, timeout: Duration) -> crate::Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RouteProvider for OsrmProvider {
    fn source(&self) -> RouteSource {
        RouteSource::PrimaryProvider
    }

    #[instrument(name = "osrm_route", skip(self))]
    async fn resolve(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<ResolvedPath, ProviderError> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson&steps=true",
            self.base_url,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        );
        debug!("Calling the primary router");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: OsrmResponse = response.json().await?;
        parse_response(body)
    }
}

fn parse_response(body: OsrmResponse) -> Result<ResolvedPath, ProviderError> {
    if body.code != "Ok" {
        return Err(ProviderError::NoRoute(
            body.message.unwrap_or_else(|| body.code.clone()),
        ));
    }

    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NoRoute("empty route list".to_string()))?;

    let geometry = route
        .geometry
        .coordinates
        .iter()
        .map(|[lon, lat]| Coordinates::checked(*lat, *lon))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ProviderError::Malformed("geometry point out of range".to_string()))?;

    if route.distance < 0.0 || route.duration < 0.0 {
        return Err(ProviderError::Malformed(
            "negative distance or duration".to_string(),
        ));
    }

    Ok(ResolvedPath {
        geometry,
        distance_km: round_km(route.distance / 1000.0),
        duration_minutes: whole_minutes(route.duration / 60.0),
    })
}
