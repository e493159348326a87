pub mod forecasts;
pub mod health;
pub mod maintenance;
pub mod spots;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::services::forecast::ForecastService;
use crate::services::maintenance::SharedMaintenanceState;
use crate::services::spots::SpotCatalog;
use spots::SpotsState;

/// All API routes, each group with its own state. Docs and middleware are
/// layered on by the caller.
pub fn router(
    forecast_service: ForecastService,
    catalog: Arc<SpotCatalog>,
    maintenance_state: SharedMaintenanceState,
) -> Router {
    let forecast_routes = Router::new()
        .route(
            "/forecast",
            post(forecasts::post_forecast)
                .options(forecasts::options_forecast)
                .fallback(forecasts::method_not_allowed),
        )
        .with_state(forecast_service.clone());

    let spot_routes = Router::new()
        .route("/api/v1/spots", get(spots::list_spots))
        .route("/api/v1/spots/:id/forecast", get(spots::get_spot_forecast))
        .with_state(SpotsState {
            catalog,
            forecasts: forecast_service.clone(),
        });

    let health_routes = Router::new()
        .route("/api/v1/health", get(health::health_check))
        .with_state(forecast_service);

    let maintenance_routes = Router::new()
        .route(
            "/api/v1/maintenance/status",
            get(maintenance::get_maintenance_status),
        )
        .with_state(maintenance_state);

    Router::new()
        .merge(health_routes)
        .merge(forecast_routes)
        .merge(spot_routes)
        .merge(maintenance_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::config::AppConfig;
    use crate::services::maintenance::MaintenanceState;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use std::time::Duration;
    use tokio::sync::RwLock;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(config: &AppConfig) -> Router {
        let service = ForecastService::new(config, Arc::new(SystemClock)).unwrap();
        let maintenance = Arc::new(RwLock::new(MaintenanceState::new(
            Duration::from_secs(86_400),
            Duration::from_secs(600),
        )));
        router(service, Arc::new(SpotCatalog::default()), maintenance)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/forecast")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (status, body) = send(app(&AppConfig::default()), post_json("{\"lat\": 18.5,")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_400() {
        let (status, body) = send(
            app(&AppConfig::default()),
            post_json(r#"{"lat": "north", "lng": 110.1}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_400() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/forecast")
            .body(Body::from(r#"{"lat": 18.5, "lng": 110.1}"#))
            .unwrap();
        let (status, body) = send(app(&AppConfig::default()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_options_preflight_is_200() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/forecast")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(&AppConfig::default()), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_other_methods_are_405() {
        for verb in [Method::GET, Method::PUT, Method::DELETE] {
            let request = Request::builder()
                .method(verb)
                .uri("/forecast")
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(app(&AppConfig::default()), request).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body["error"], "Method not allowed");
        }
    }

    #[tokio::test]
    async fn test_upstream_500_still_returns_forecast() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        let config = AppConfig {
            windy_api_key: Some("test-key".to_string()),
            windy_api_url: server.uri(),
            upstream_timeout: Duration::from_secs(2),
            ..AppConfig::default()
        };

        let (status, body) = send(app(&config), post_json(r#"{"lat": 18.5, "lng": 110.1}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let points = body["forecast"].as_array().unwrap();
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p["source"] == "fallback"));
    }

    #[tokio::test]
    async fn test_health_is_mounted() {
        let request = Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(&AppConfig::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["upstreamConfigured"], false);
    }
}
