use std::path::PathBuf;

use anyhow::Context;
use routerisk::{RoutePlanner, RouteRiskConfig, config::LoggingConfig, web};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("routerisk={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        RouteRiskConfig::load_from_path(config_path).context("Failed to load configuration")?;

    init_tracing(&config.logging);
    tracing::info!("Starting RouteRisk {}", routerisk::VERSION);
    if !config.weather.api_key.as_deref().is_some_and(|key| !key.trim().is_empty()) {
        tracing::warn!("No weather API key configured, weather will be simulated");
    }

    let planner = RoutePlanner::from_config(&config).context("Failed to build the route planner")?;
    web::run(&config.server, planner).await
}
