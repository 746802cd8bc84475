//! Secondary road router (GraphHopper routing API)

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ResolvedPath, RouteProvider, http_client, round_km, whole_minutes};
use crate::error::ProviderError;
use crate::models::{Coordinates, RouteSource};

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    paths: Vec<PathResponse>,
}

#[derive(Debug, Deserialize)]
struct PathResponse {
    /// Meters
    distance: f64,
    /// Milliseconds
    time: f64,
    #[serde(default)]
    points: Option<PointList>,
}

#[derive(Debug, Deserialize)]
struct PointList {
    /// (longitude, latitude) pairs; elevation may follow
    coordinates: Vec<Vec<f64>>,
}

pub struct GraphHopperProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GraphHopperProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> crate::Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl RouteProvider for GraphHopperProvider {
    fn source(&self) -> RouteSource {
        RouteSource::SecondaryProvider
    }

    #[instrument(name = "graphhopper_route", skip(self))]
    async fn resolve(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<ResolvedPath, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::NotConfigured)?;
        let url = format!(
            "{}/route?point={},{}&point={},{}&vehicle=car&locale=pt-BR&points_encoded=false&type=json&key={}",
            self.base_url,
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude,
            urlencoding::encode(api_key)
        );
        debug!("Calling the secondary router");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: ApiResponse = response.json().await?;
        parse_response(body, origin, destination)
    }
}

fn parse_response(
    body: ApiResponse,
    origin: &Coordinates,
    destination: &Coordinates,
) -> Result<ResolvedPath, ProviderError> {
    let path = body
        .paths
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NoRoute("empty path list".to_string()))?;

    let geometry = match path.points {
        Some(points) if !points.coordinates.is_empty() => points
            .coordinates
            .iter()
            .map(|point| match point.as_slice() {
                [lon, lat, ..] => Coordinates::checked(*lat, *lon),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ProviderError::Malformed("invalid geometry point".to_string()))?,
        _ => vec![*origin, *destination],
    };

    if path.distance < 0.0 || path.time < 0.0 {
        return Err(ProviderError::Malformed(
            "negative distance or time".to_string(),
        ));
    }

    Ok(ResolvedPath {
        geometry,
        distance_km: round_km(path.distance / 1000.0),
        duration_minutes: whole_minutes(path.time / 60_000.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> (Coordinates, Coordinates) {
        (
            Coordinates::checked(-23.5505, -46.6333).unwrap(),
            Coordinates::checked(-22.9056, -47.0608).unwrap(),
        )
    }

    fn parse(json: &str) -> Result<ResolvedPath, ProviderError> {
        let (origin, destination) = endpoints();
        parse_response(serde_json::from_str(json).unwrap(), &origin, &destination)
    }

    #[test]
    fn test_converts_meters_and_milliseconds() {
        let path = parse(
            r#"{"paths":[{"distance":95840.0,"time":4830000,"points":{"coordinates":[[-46.6333,-23.5505],[-47.0608,-22.9056]]}}]}"#,
        )
        .unwrap();
        assert_eq!(path.distance_km, 95.8);
        assert_eq!(path.duration_minutes, 81);
        assert_eq!(path.geometry[1].latitude, -22.9056);
        assert_eq!(path.geometry[1].longitude, -47.0608);
    }

    #[test]
    fn test_missing_points_synthesize_two_point_path() {
        let (origin, destination) = endpoints();
        let path = parse(r#"{"paths":[{"distance":1000.0,"time":60000}]}"#).unwrap();
        assert_eq!(path.geometry, vec![origin, destination]);
        assert_eq!(path.duration_minutes, 1);
    }

    #[test]
    fn test_empty_paths_is_no_route() {
        assert!(matches!(parse(r#"{"paths":[]}"#), Err(ProviderError::NoRoute(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let provider =
            GraphHopperProvider::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        let (origin, destination) = endpoints();
        assert_eq!(
            provider.resolve(&origin, &destination).await,
            Err(ProviderError::NotConfigured)
        );
    }
}
