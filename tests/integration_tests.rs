//! Integration tests against local stand-ins for the external services

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use routerisk::{
    AccidentStore, CatalogRouteId, GeocodeResolver, ResolutionError, RouteChain, RoutePlanner,
    RouteSource, Session, WeatherRiskProvider, WeatherSource,
    config::{GeocodingConfig, RoutingConfig, WeatherConfig},
    models::{RouteKind, SimulationReason},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nobody listens on
async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn nominatim_search(
    State(hits): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    let query = params.get("q").cloned().unwrap_or_default();
    let name = query.split(',').next().unwrap_or_default().trim();

    match name {
        "Campinas" => Json(json!([{
            "lat": "-22.9056",
            "lon": "-47.0608",
            "display_name": "Campinas, São Paulo, Brasil",
            "address": {"city": "Campinas", "state": "São Paulo"}
        }]))
        .into_response(),
        "Praia Grande" => Json(json!([{
            "lat": -24.0058,
            "lon": -46.4028,
            "address": {"town": "Praia Grande"}
        }]))
        .into_response(),
        "Avenida Paulista 1000" => Json(json!([{
            "lat": "-23.5651",
            "lon": "-46.6527",
            "address": {"road": "Avenida Paulista"}
        }]))
        .into_response(),
        "Broken" => Json(json!([{"lat": "north", "lon": "-46.6"}])).into_response(),
        "Offshore" => Json(json!([{"lat": "95.0", "lon": "-46.6"}])).into_response(),
        "Blocked" => StatusCode::FORBIDDEN.into_response(),
        "Overloaded" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "Slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!([])).into_response()
        }
        _ => Json(json!([])).into_response(),
    }
}

async fn fake_nominatim() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/search", get(nominatim_search))
        .with_state(hits.clone());
    (serve(router).await, hits)
}

fn geocoder(base_url: &str) -> GeocodeResolver {
    GeocodeResolver::from_config(&GeocodingConfig {
        base_url: base_url.to_string(),
        max_retries: 0,
        ..GeocodingConfig::default()
    })
    .unwrap()
}

/// One retry and a one second timeout
fn retrying_geocoder(base_url: &str) -> GeocodeResolver {
    GeocodeResolver::from_config(&GeocodingConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 1,
        max_retries: 1,
        ..GeocodingConfig::default()
    })
    .unwrap()
}

fn osrm_ok() -> Value {
    json!({
        "code": "Ok",
        "routes": [{
            "distance": 95800.0,
            "duration": 4830.0,
            "geometry": {
                "type": "LineString",
                "coordinates": [[-46.6333, -23.5505], [-46.88, -23.19], [-47.0608, -22.9056]]
            }
        }],
        "waypoints": []
    })
}

fn graphhopper_ok() -> Value {
    json!({
        "paths": [{
            "distance": 98440.0,
            "time": 5_100_000,
            "points": {
                "type": "LineString",
                "coordinates": [[-46.6333, -23.5505], [-47.0608, -22.9056]]
            }
        }]
    })
}

/// Routing stand-in: `osrm` answers the primary tier, GraphHopper always succeeds
async fn fake_routers(osrm: Router) -> (String, String) {
    let primary = serve(osrm).await;
    let secondary = serve(Router::new().route("/route", get(|| async { Json(graphhopper_ok()) }))).await;
    (primary, secondary)
}

fn chain(primary: &str, secondary: &str, secondary_key: Option<&str>, timeout_seconds: u32) -> RouteChain {
    RouteChain::from_config(&RoutingConfig {
        primary_base_url: primary.to_string(),
        secondary_base_url: secondary.to_string(),
        secondary_api_key: secondary_key.map(str::to_string),
        timeout_seconds,
        ..RoutingConfig::default()
    })
    .unwrap()
}

fn sao_paulo() -> routerisk::Place {
    routerisk::City::SaoPaulo.place()
}

fn campinas() -> routerisk::Place {
    routerisk::City::Campinas.place()
}

#[tokio::test]
async fn test_geocoder_resolves_and_caches() {
    let (base_url, hits) = fake_nominatim().await;
    let resolver = geocoder(&base_url);

    let place = resolver.resolve("Campinas").await.unwrap();
    assert_eq!(place.name, "Campinas");
    assert_eq!(place.coordinates.latitude, -22.9056);
    assert_eq!(place.coordinates.longitude, -47.0608);

    let again = resolver.resolve("  campinas ").await.unwrap();
    assert_eq!(again, place);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_geocoder_name_fallbacks() {
    let (base_url, _) = fake_nominatim().await;
    let resolver = geocoder(&base_url);

    let town = resolver.resolve("Praia Grande").await.unwrap();
    assert_eq!(town.name, "Praia Grande");
    assert_eq!(town.coordinates.latitude, -24.0058);

    let street = resolver.resolve("Avenida Paulista 1000").await.unwrap();
    assert_eq!(street.name, "Avenida Paulista 1000");
}

#[tokio::test]
async fn test_geocoder_failures() {
    let (base_url, hits) = fake_nominatim().await;
    let resolver = geocoder(&base_url);

    assert_eq!(resolver.resolve("   ").await, Err(ResolutionError::EmptyAddress));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    assert!(matches!(
        resolver.resolve("Atlantis").await,
        Err(ResolutionError::NotFound { .. })
    ));
    assert!(matches!(
        resolver.resolve("Blocked").await,
        Err(ResolutionError::NotFound { .. })
    ));
    assert!(matches!(
        resolver.resolve("Broken").await,
        Err(ResolutionError::ParseFailure(_))
    ));
    assert!(matches!(
        resolver.resolve("Offshore").await,
        Err(ResolutionError::ParseFailure(_))
    ));

    // Failures are not cached
    let before = hits.load(Ordering::SeqCst);
    let _ = resolver.resolve("Atlantis").await;
    assert_eq!(hits.load(Ordering::SeqCst), before + 1);
}

#[tokio::test]
async fn test_geocoder_network_error() {
    let resolver = geocoder(&closed_port().await);
    assert!(matches!(
        resolver.resolve("Campinas").await,
        Err(ResolutionError::Network(_))
    ));
}

#[tokio::test]
async fn test_geocoder_retries_server_errors() {
    let (base_url, hits) = fake_nominatim().await;
    let resolver = retrying_geocoder(&base_url);

    assert!(matches!(
        resolver.resolve("Overloaded").await,
        Err(ResolutionError::NotFound { .. })
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_geocoder_timeout_is_not_retried() {
    let (base_url, hits) = fake_nominatim().await;
    let resolver = retrying_geocoder(&base_url);

    let started = std::time::Instant::now();
    assert!(matches!(
        resolver.resolve("Slow").await,
        Err(ResolutionError::Network(_))
    ));
    assert!(started.elapsed() < Duration::from_millis(1900));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_primary_router_swaps_coordinates() {
    let (primary, secondary) = fake_routers(Router::new().fallback(|| async { Json(osrm_ok()) })).await;
    let routes = chain(&primary, &secondary, Some("key"), 5);

    let route = routes.route(&sao_paulo(), &campinas()).await;
    assert_eq!(route.source, RouteSource::PrimaryProvider);
    assert_eq!(route.distance_km, 95.8);
    assert_eq!(route.duration_minutes, 81);
    assert_eq!(route.geometry.len(), 3);
    assert_eq!(route.geometry[0].latitude, -23.5505);
    assert_eq!(route.geometry[0].longitude, -46.6333);
    assert_eq!(route.kind, RouteKind::AdHoc);
}

#[tokio::test]
async fn test_primary_failure_falls_back_to_secondary() {
    let (primary, secondary) = fake_routers(
        Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    )
    .await;
    let routes = chain(&primary, &secondary, Some("key"), 5);

    let route = routes.route(&sao_paulo(), &campinas()).await;
    assert_eq!(route.source, RouteSource::SecondaryProvider);
    assert_eq!(route.distance_km, 98.4);
    assert_eq!(route.duration_minutes, 85);
    assert_eq!(route.geometry[1].latitude, -22.9056);
}

#[tokio::test]
async fn test_primary_no_route_code_falls_back() {
    let (primary, secondary) = fake_routers(Router::new().fallback(|| async {
        Json(json!({"code": "NoRoute", "message": "Impossible route", "routes": []}))
    }))
    .await;
    let routes = chain(&primary, &secondary, Some("key"), 5);

    let route = routes.route(&sao_paulo(), &campinas()).await;
    assert_eq!(route.source, RouteSource::SecondaryProvider);
}

#[tokio::test]
async fn test_slow_primary_times_out() {
    let (primary, secondary) = fake_routers(Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Json(osrm_ok())
    }))
    .await;
    let routes = chain(&primary, &secondary, Some("key"), 1);

    let route = routes.route(&sao_paulo(), &campinas()).await;
    assert_eq!(route.source, RouteSource::SecondaryProvider);
}

#[tokio::test]
async fn test_all_providers_failing_gives_great_circle() {
    let routes = chain(&closed_port().await, &closed_port().await, None, 2);

    let route = routes.route(&sao_paulo(), &campinas()).await;
    assert_eq!(route.source, RouteSource::GreatCircleEstimate);
    assert!(!route.source.is_road_geometry());
    assert_eq!(route.geometry.len(), 2);
    assert_eq!(route.geometry[0], sao_paulo().coordinates);
    assert_eq!(route.geometry[1], campinas().coordinates);
    assert!(route.distance_km > 70.0 && route.distance_km < 90.0);
}

#[tokio::test]
async fn test_road_routes_are_cached() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let (primary, secondary) = fake_routers(Router::new().fallback(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Json(osrm_ok())
        }
    }))
    .await;
    let routes = chain(&primary, &secondary, None, 5);

    routes.route(&sao_paulo(), &campinas()).await;
    routes.route(&sao_paulo(), &campinas()).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

async fn weather_current(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("key").map(String::as_str) != Some("good-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": 2006, "message": "API key is invalid."}})),
        )
            .into_response();
    }
    assert_eq!(params.get("lang").map(String::as_str), Some("pt"));
    assert!(params.get("q").is_some_and(|q| q.ends_with(", Brasil")));

    Json(json!({
        "location": {"name": "Santos", "country": "Brazil"},
        "current": {
            "temp_c": 22.0,
            "humidity": 90,
            "wind_kph": 35.0,
            "condition": {"text": "Chuva forte", "code": 1195}
        }
    }))
    .into_response()
}

async fn fake_weather() -> String {
    serve(Router::new().route("/current.json", get(weather_current))).await
}

fn weather(base_url: &str, api_key: Option<&str>) -> WeatherRiskProvider {
    WeatherRiskProvider::from_config(&WeatherConfig {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        ..WeatherConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_real_weather() {
    let provider = weather(&fake_weather().await, Some("good-key"));
    let snapshot = provider.current("Santos").await;

    assert_eq!(snapshot.source, WeatherSource::Real);
    assert_eq!(snapshot.condition, "Chuva forte");
    assert_eq!(snapshot.temperature_c, 22.0);
    // 0.1 base + storm 0.7 + wind 0.1 + humidity 0.1
    assert!((snapshot.climate_risk - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_rejected_key_simulates_weather() {
    let provider = weather(&fake_weather().await, Some("revoked"));
    let snapshot = provider.current("Santos").await;
    assert_eq!(
        snapshot.source,
        WeatherSource::Simulated(SimulationReason::ProviderUnavailable)
    );
    assert!((0.0..=1.0).contains(&snapshot.climate_risk));
}

#[tokio::test]
async fn test_missing_key_simulates_weather() {
    let provider = weather(&fake_weather().await, None);
    let route_weather = provider.route_weather("Santos", "Campinas").await;
    assert_eq!(
        route_weather.origin.source,
        WeatherSource::Simulated(SimulationReason::Unconfigured)
    );
    assert_eq!(
        route_weather.destination.source,
        WeatherSource::Simulated(SimulationReason::Unconfigured)
    );
    assert_eq!(
        route_weather.alert,
        route_weather.combined_risk > 0.5
    );
}

const DATATRAN_CSV: &str = "id;data_inversa;br;km;municipio;causa_acidente;tipo_acidente;condicao_metereologica;tipo_pista;mortos;feridos_leves;feridos_graves;feridos;latitude;longitude\n\
    1;2025-01-04;116;225,7;SÃO JOSÉ DOS CAMPOS;Velocidade incompatível;Colisão traseira;Chuva;Dupla;1;0;2;2;-23,1896;-45,8841\n\
    2;2025-01-09;116;89;JACAREÍ;Condutor dormindo;Saída de leito carroçável;Céu Claro;Simples;0;1;0;1;-23,3055;-45,9663\n\
    3;2025-02-11;116;31;QUELUZ;Ingestão de álcool;Tombamento;Nublado;Simples;0;0;1;1;-22,5320;-44,7736\n\
    4;2025-02-20;381;50;ATIBAIA;Falta de atenção;Atropelamento de pedestre;Céu Claro;Dupla;1;0;0;0;-23,1169;-46,5500\n";

fn datatran_archive() -> Vec<u8> {
    let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode(DATATRAN_CSV);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("datatran2025.csv", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(&encoded).unwrap();
    writer.finish().unwrap().into_inner()
}

async fn planner() -> RoutePlanner {
    let (nominatim, _) = fake_nominatim().await;
    let (primary, secondary) = fake_routers(Router::new().fallback(|| async { Json(osrm_ok()) })).await;
    RoutePlanner::new(
        geocoder(&nominatim),
        chain(&primary, &secondary, None, 5),
        weather(&closed_port().await, None),
    )
}

#[tokio::test]
async fn test_plan_catalog_without_dataset_uses_authored_points() {
    let planner = planner().await;
    let report = planner
        .plan_catalog(CatalogRouteId::SaoPauloRioDeJaneiro, &Session::default())
        .await;

    assert_eq!(report.route.kind, RouteKind::Catalog(CatalogRouteId::SaoPauloRioDeJaneiro));
    assert_eq!(report.route.source, RouteSource::PrimaryProvider);
    assert!(!report.uses_accident_data);
    assert_eq!(report.points.len(), 3);
    assert_eq!(report.summary.critical_points, 2);
    assert_eq!(report.catalog.as_ref().map(|c| c.tolls), Some(12));
    assert!(report.points.iter().all(|p| !p.explanation.factors.is_empty()));
}

#[tokio::test]
async fn test_plan_catalog_with_dataset_derives_points() {
    let planner = planner().await;
    let mut session = Session::default();
    session.replace_store(AccidentStore::load(&datatran_archive()).unwrap());

    let report = planner
        .plan_catalog(CatalogRouteId::SaoPauloRioDeJaneiro, &session)
        .await;

    assert!(report.uses_accident_data);
    assert_eq!(report.points.len(), 3);
    assert!(report.points.iter().all(|p| p.point.name.starts_with("BR-116 KM ")));
    assert!(report.points.iter().any(|p| p.point.name == "BR-116 KM 225,7"));

    let fatal = report
        .points
        .iter()
        .find(|p| p.point.name == "BR-116 KM 225,7")
        .unwrap();
    // base 0.3 + fatality 0.4 + severe 0.2 + rain 0.1
    assert!((fatal.point.risk - 1.0).abs() < 1e-9);
    assert!(fatal.explanation.recommendations.iter().any(|r| r.contains("fatais")));
}

#[tokio::test]
async fn test_plan_addresses_remembers_route() {
    let planner = planner().await;
    let mut session = Session::default();

    let report = planner
        .plan_addresses("Avenida Paulista 1000", "Campinas", &mut session)
        .await
        .unwrap();

    assert_eq!(report.route.origin.name, "Avenida Paulista 1000");
    assert_eq!(report.route.destination.name, "Campinas");
    assert_eq!(report.route.kind, RouteKind::AdHoc);
    assert!(report.points.is_empty());
    assert_eq!(report.duration_label, "1h 21min");
    assert_eq!(session.last_personalized_route(), Some(&report));
}

#[tokio::test]
async fn test_plan_addresses_propagates_geocoding_errors() {
    let planner = planner().await;
    let mut session = Session::default();

    let result = planner.plan_addresses("Atlantis", "Campinas", &mut session).await;
    assert!(matches!(result, Err(ResolutionError::NotFound { .. })));
    assert!(session.last_personalized_route().is_none());
}

#[derive(Default)]
struct Concurrency {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    hits: AtomicUsize,
}

async fn counting_nominatim(
    State(counts): State<Arc<Concurrency>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    counts.hits.fetch_add(1, Ordering::SeqCst);
    let now = counts.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    counts.peak.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    counts.in_flight.fetch_sub(1, Ordering::SeqCst);

    if params.get("q").is_some_and(|q| q.starts_with("Atlantis")) {
        return Json(json!([])).into_response();
    }
    Json(json!([{
        "lat": "-22.9056",
        "lon": "-47.0608",
        "address": {"city": "Campinas"}
    }]))
    .into_response()
}

#[tokio::test]
async fn test_plan_addresses_geocodes_one_endpoint_at_a_time() {
    let counts = Arc::new(Concurrency::default());
    let nominatim = serve(
        Router::new()
            .route("/search", get(counting_nominatim))
            .with_state(counts.clone()),
    )
    .await;
    let (primary, secondary) = fake_routers(Router::new().fallback(|| async { Json(osrm_ok()) })).await;
    let planner = RoutePlanner::new(
        geocoder(&nominatim),
        chain(&primary, &secondary, None, 5),
        weather(&closed_port().await, None),
    );
    let mut session = Session::default();

    planner
        .plan_addresses("Rua Augusta 500", "Rua da Consolação 100", &mut session)
        .await
        .unwrap();
    assert_eq!(counts.hits.load(Ordering::SeqCst), 2);
    assert_eq!(counts.peak.load(Ordering::SeqCst), 1);

    let result = planner.plan_addresses("Atlantis", "Campinas", &mut session).await;
    assert!(matches!(result, Err(ResolutionError::NotFound { .. })));
    assert_eq!(counts.hits.load(Ordering::SeqCst), 3);
}

async fn api_server() -> String {
    serve(routerisk::web::app(planner().await, 10 * 1024 * 1024)).await
}

fn multipart_body(boundary: &str, file_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/zip\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_api_catalog_and_routes() {
    let base = api_server().await;
    let client = reqwest::Client::new();

    let cities: Vec<Value> = client
        .get(format!("{base}/api/catalog/cities"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cities.len(), 8);
    assert_eq!(cities[0]["id"], "sao-paulo");

    let report: Value = client
        .get(format!("{base}/api/catalog/routes/sao-paulo-campinas"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["summary"]["points"], 1);

    let missing = client.get(format!("{base}/api/routes/last")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let planned = client
        .post(format!("{base}/api/routes"))
        .json(&json!({"origin": "Avenida Paulista 1000", "destination": "Campinas"}))
        .send()
        .await
        .unwrap();
    assert_eq!(planned.status(), StatusCode::OK);

    let last: Value = client
        .get(format!("{base}/api/routes/last"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(last["route"]["destination"]["name"], "Campinas");

    let unknown = client
        .get(format!("{base}/api/geocode?q=Atlantis"))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let body: Value = unknown.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn test_api_dataset_lifecycle() {
    let base = api_server().await;
    let client = reqwest::Client::new();

    let none = client.get(format!("{base}/api/dataset")).send().await.unwrap();
    assert_eq!(none.status(), StatusCode::NOT_FOUND);

    let boundary = "routerisk-test-boundary";
    let uploaded = client
        .post(format!("{base}/api/dataset"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(multipart_body(boundary, "datatran2025.zip", &datatran_archive()))
        .send()
        .await
        .unwrap();
    assert_eq!(uploaded.status(), StatusCode::OK);
    let summary: Value = uploaded.json().await.unwrap();
    assert_eq!(summary["records"], 4);
    assert_eq!(summary["source_file"], "datatran2025.csv");

    let rejected = client
        .post(format!("{base}/api/dataset"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(multipart_body(boundary, "notes.zip", b"not a zip"))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let report: Value = client
        .get(format!("{base}/api/catalog/routes/sao-paulo-rio-de-janeiro"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["uses_accident_data"], true);

    let cleared = client.delete(format!("{base}/api/dataset")).send().await.unwrap();
    assert_eq!(cleared.status(), StatusCode::NO_CONTENT);
    let none = client.get(format!("{base}/api/dataset")).send().await.unwrap();
    assert_eq!(none.status(), StatusCode::NOT_FOUND);
}
