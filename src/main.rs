// Surf Forecast API v0.1
use axum::http::{header, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod clock;
mod config;
mod errors;
mod helpers;
mod models;
mod routes;
mod services;

use clock::SystemClock;
use config::AppConfig;
use services::forecast::ForecastService;
use services::maintenance::{MaintenanceState, SharedMaintenanceState};
use services::spots::SpotCatalog;

/// OpenAPI document for the Surf Forecast API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Surf Forecast API",
        version = "0.1.0",
        description = "Seven-day wave and wind forecasts for surf spots. \
            Proxies a point-forecast provider behind a location cache and a \
            daily call quota, degrades to synthetic data when the provider is \
            unavailable, and scores each day for longboard and shortboard.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Forecast", description = "Coordinate forecast proxy"),
        (name = "Spots", description = "Surf spots and scored forecasts"),
        (name = "Maintenance", description = "Background quota reset and cache sweep"),
    ),
    paths(
        routes::health::health_check,
        routes::forecasts::post_forecast,
        routes::spots::list_spots,
        routes::spots::get_spot_forecast,
        routes::maintenance::get_maintenance_status,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::forecasts::ForecastRequest,
            routes::forecasts::ForecastResponse,
            routes::spots::SpotForecastResponse,
            models::ForecastPoint,
            models::Source,
            models::Spot,
            models::BayShape,
            models::SeabedType,
            models::BoardType,
            services::scoring::DayScore,
            services::scoring::ScoreResult,
            services::scoring::ScoreFactors,
            services::scoring::Rating,
            services::maintenance::MaintenanceState,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surf_forecast_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Load the spot catalogue; the forecast proxy still works without it.
    let spots_path = std::path::Path::new(&config.spots_file);
    let catalog = match SpotCatalog::load(spots_path) {
        Ok(catalog) => {
            if catalog.is_empty() {
                tracing::warn!("No spots found in {}", spots_path.display());
            }
            catalog
        }
        Err(e) => {
            tracing::error!("Failed to load spots from {}: {}", spots_path.display(), e);
            SpotCatalog::default()
        }
    };

    let forecast_service = ForecastService::new(&config, Arc::new(SystemClock))
        .expect("Failed to create upstream forecast client");

    // Spawn background maintenance
    let maintenance_state: SharedMaintenanceState = Arc::new(RwLock::new(MaintenanceState::new(
        config.quota_reset_interval,
        config.cache_sweep_interval,
    )));
    tokio::spawn(services::maintenance::run_maintenance(
        forecast_service.clone(),
        maintenance_state.clone(),
        config.quota_reset_interval,
        config.cache_sweep_interval,
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = routes::router(forecast_service, Arc::new(catalog), maintenance_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
