use std::sync::Arc;

use axum::{
    Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    accidents::{AccidentStore, DatasetSummary},
    catalog::{CatalogRoute, CatalogRouteId, City, highway_label},
    error::{LoadError, ResolutionError, RouteRiskError},
    models::{Coordinates, Place, RiskPoint, WeatherSnapshot},
    planner::{RoutePlanner, RouteReport, Session},
    risk::Explanation,
};

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    planner: Arc<RoutePlanner>,
    session: Arc<RwLock<Session>>,
}

impl AppState {
    #[must_use]
    pub fn new(planner: RoutePlanner) -> Self {
        Self {
            planner: Arc::new(planner),
            session: Arc::new(RwLock::new(Session::default())),
        }
    }
}

/// Failures surfaced to HTTP clients
#[derive(Debug)]
pub enum ApiError {
    Resolution(ResolutionError),
    Load(LoadError),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

#[derive(Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl From<ResolutionError> for ApiError {
    fn from(err: ResolutionError) -> Self {
        ApiError::Resolution(err)
    }
}

impl From<LoadError> for ApiError {
    fn from(err: LoadError) -> Self {
        ApiError::Load(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Resolution(ResolutionError::NotFound { .. }) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Resolution(ResolutionError::Network(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Resolution(_) | ApiError::Load(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            ApiError::Resolution(err) => RouteRiskError::from(err).user_message(),
            ApiError::Load(err) => RouteRiskError::from(err).user_message(),
            ApiError::NotFound(message)
            | ApiError::BadRequest(message)
            | ApiError::Internal(message) => message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed with {}: {:?}", status, self);
        }
        (status, Json(ApiErrorBody { error: self.message() })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Serialize, Deserialize)]
pub struct ApiCity {
    pub id: City,
    pub name: String,
    pub coordinates: Coordinates,
    pub population: u32,
    pub base_risk: f64,
    pub highways: Vec<String>,
}

impl From<City> for ApiCity {
    fn from(city: City) -> Self {
        let info = city.info();
        Self {
            id: city,
            name: info.name.to_string(),
            coordinates: info.coordinates,
            population: info.population,
            base_risk: info.base_risk,
            highways: info.highways.iter().copied().map(highway_label).collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct PlanRequest {
    pub origin: String,
    pub destination: String,
}

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/catalog/cities", get(list_cities))
        .route("/catalog/routes", get(list_catalog_routes))
        .route("/catalog/routes/{id}", get(analyse_catalog_route))
        .route("/routes", post(plan_route))
        .route("/routes/last", get(last_route))
        .route("/geocode", get(geocode))
        .route("/weather/{place}", get(current_weather))
        .route(
            "/dataset",
            post(upload_dataset).get(dataset_summary).delete(clear_dataset),
        )
        .route("/explain", post(explain_point))
        .with_state(state)
}

async fn list_cities() -> Json<Vec<ApiCity>> {
    Json(City::ALL.into_iter().map(ApiCity::from).collect())
}

async fn list_catalog_routes() -> Json<Vec<CatalogRoute>> {
    Json(
        CatalogRouteId::ALL
            .into_iter()
            .map(|id| id.route().clone())
            .collect(),
    )
}

async fn analyse_catalog_route(
    State(state): State<AppState>,
    Path(id): Path<CatalogRouteId>,
) -> Json<RouteReport> {
    let session = state.session.read().await.clone();
    Json(state.planner.plan_catalog(id, &session).await)
}

async fn plan_route(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> ApiResult<RouteReport> {
    // Planning awaits remote services; only hold the lock to store the result.
    let mut session = state.session.read().await.clone();
    let report = state
        .planner
        .plan_addresses(&request.origin, &request.destination, &mut session)
        .await?;

    state.session.write().await.remember_route(report.clone());
    Ok(Json(report))
}

async fn last_route(State(state): State<AppState>) -> ApiResult<RouteReport> {
    state
        .session
        .read()
        .await
        .last_personalized_route()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No personalized route yet".to_string()))
}

async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> ApiResult<Place> {
    Ok(Json(state.planner.geocode(&query.q).await?))
}

async fn current_weather(
    State(state): State<AppState>,
    Path(place): Path<String>,
) -> Json<WeatherSnapshot> {
    Json(state.planner.weather(&place).await)
}

async fn upload_dataset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<DatasetSummary> {
    let mut archive = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.file_name().is_some() || field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            archive = Some(bytes);
            break;
        }
    }
    let archive =
        archive.ok_or_else(|| ApiError::BadRequest("Missing archive file field".to_string()))?;

    let store = tokio::task::spawn_blocking(move || AccidentStore::load(&archive))
        .await
        .map_err(|e| ApiError::Internal(format!("Dataset loading task failed: {e}")))??;

    let summary = store.summary();
    info!(
        "Loaded {} accident records from {:?}",
        summary.records, summary.source_file
    );
    state.session.write().await.replace_store(store);
    Ok(Json(summary))
}

async fn dataset_summary(State(state): State<AppState>) -> ApiResult<DatasetSummary> {
    state
        .session
        .read()
        .await
        .store()
        .map(|store| Json(store.summary()))
        .ok_or_else(|| ApiError::NotFound("No accident dataset loaded".to_string()))
}

async fn clear_dataset(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.clear_store();
    StatusCode::NO_CONTENT
}

async fn explain_point(
    State(state): State<AppState>,
    Json(point): Json<RiskPoint>,
) -> Json<Explanation> {
    Json(state.planner.explain(&point))
}
