use anyhow::Context;
use axum::{Router, extract::DefaultBodyLimit};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use crate::planner::RoutePlanner;

/// The full application: the JSON API under `/api` with CORS and an upload limit
pub fn app(planner: RoutePlanner, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(AppState::new(planner)))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors)
}

pub async fn run(config: &ServerConfig, planner: RoutePlanner) -> anyhow::Result<()> {
    let app = app(planner, config.max_upload_bytes());

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    tracing::info!("Web server running at http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
