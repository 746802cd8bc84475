//! Address geocoding
//!
//! Resolves free-text Brazilian addresses into places through a
//! Nominatim-compatible search service. Successful lookups are cached; failures
//! are not, so a retry after a transient error goes back to the network.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    RetryTransientMiddleware, Retryable, RetryableStrategy, policies::ExponentialBackoff,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::cache::TtlCache;
use crate::config::GeocodingConfig;
use crate::error::{ResolutionError, RouteRiskError};
use crate::models::{Coordinates, Place, place::parse_decimal};

/// Nominatim search hit
#[derive(Debug, Deserialize)]
struct SearchHit {
    /// Nominatim serves coordinates as strings; some mirrors use numbers
    lat: Value,
    lon: Value,
    #[serde(default)]
    address: Option<AddressDetails>,
}

#[derive(Debug, Deserialize, Default)]
struct AddressDetails {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl AddressDetails {
    fn locality(&self) -> Option<&str> {
        [&self.city, &self.town, &self.village]
            .into_iter()
            .find_map(|name| name.as_deref().filter(|n| !n.trim().is_empty()))
    }
}

/// Retries refused connections and 5xx answers only.
///
/// A timed-out request is not retried, so one lookup stays within the
/// configured timeout.
struct RetryConnectAndServerErrors;

impl RetryableStrategy for RetryConnectAndServerErrors {
    fn handle(
        &self,
        res: &Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(response) if response.status().is_server_error() => Some(Retryable::Transient),
            Ok(_) => None,
            Err(reqwest_middleware::Error::Reqwest(err)) if err.is_connect() && !err.is_timeout() => {
                Some(Retryable::Transient)
            }
            Err(_) => Some(Retryable::Fatal),
        }
    }
}

/// Resolves addresses to places, restricted to Brazil
pub struct GeocodeResolver {
    client: ClientWithMiddleware,
    base_url: String,
    cache: TtlCache<Place>,
}

impl GeocodeResolver {
    /// Create a resolver from configuration
    pub fn from_config(config: &GeocodingConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RouteRiskError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                RetryConnectAndServerErrors,
            ))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: TtlCache::new("geocoding", config.cache_ttl()),
        })
    }

    /// Resolve an address to a place.
    ///
    /// The address is scoped to Brazil before querying. The returned name is
    /// the city, town or village reported by the service, falling back to the
    /// address as typed.
    #[instrument(name = "geocode", skip(self))]
    pub async fn resolve(&self, address: &str) -> Result<Place, ResolutionError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ResolutionError::EmptyAddress);
        }

        let key = address.to_lowercase();
        if let Some(place) = self.cache.get(&key) {
            debug!("Using cached geocoding result for '{}'", address);
            return Ok(place);
        }

        let place = self.lookup(address).await?;
        info!(
            "Resolved '{}' to {} ({})",
            address,
            place.name,
            place.coordinates.format()
        );
        self.cache.put(&key, place.clone());
        Ok(place)
    }

    async fn lookup(&self, address: &str) -> Result<Place, ResolutionError> {
        let query = format!("{address}, Brazil");
        let url = format!(
            "{}/search?q={}&format=json&limit=1&addressdetails=1",
            self.base_url,
            urlencoding::encode(&query)
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Geocoding request failed: {}", e);
            ResolutionError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoding service answered {} for '{}'", status, address);
            return Err(ResolutionError::NotFound {
                address: address.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolutionError::Network(e.to_string()))?;

        parse_search_response(address, &body)
    }
}

/// Turn a raw search response into a place
fn parse_search_response(address: &str, body: &str) -> Result<Place, ResolutionError> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)
        .map_err(|e| ResolutionError::ParseFailure(format!("unexpected response: {e}")))?;

    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| ResolutionError::NotFound {
            address: address.to_string(),
        })?;

    let latitude = coordinate_value(&hit.lat)
        .ok_or_else(|| ResolutionError::ParseFailure(format!("bad latitude {}", hit.lat)))?;
    let longitude = coordinate_value(&hit.lon)
        .ok_or_else(|| ResolutionError::ParseFailure(format!("bad longitude {}", hit.lon)))?;
    let coordinates = Coordinates::checked(latitude, longitude).ok_or_else(|| {
        ResolutionError::ParseFailure(format!(
            "coordinates out of range: {latitude}, {longitude}"
        ))
    })?;

    let name = hit
        .address
        .as_ref()
        .and_then(AddressDetails::locality)
        .unwrap_or(address);

    Ok(Place::new(name, coordinates))
}

fn coordinate_value(value: &Value) -> Option<f64> {
    match value {
        Value::String(text) => parse_decimal(text),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}
