use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::forecast::ForecastService;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status ("ok", or "degraded" when no upstream credential is set)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether an upstream credential is configured
    pub upstream_configured: bool,
    /// Upstream calls used in the current quota period
    pub quota_used: u32,
    pub quota_ceiling: u32,
    /// Cached grid cells, including expired ones not yet swept
    pub cached_locations: usize,
}

/// Health check endpoint.
///
/// Always 200. Reports "degraded" when the service can only serve
/// synthetic forecasts.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_check(State(service): State<ForecastService>) -> Json<HealthResponse> {
    let upstream_configured = service.upstream_configured();
    Json(HealthResponse {
        status: if upstream_configured {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        upstream_configured,
        quota_used: service.quota_used(),
        quota_ceiling: service.quota_ceiling(),
        cached_locations: service.cached_locations(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::config::AppConfig;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_without_credential() {
        let service = ForecastService::new(&AppConfig::default(), Arc::new(SystemClock)).unwrap();
        let Json(health) = health_check(State(service)).await;

        assert_eq!(health.status, "degraded");
        assert!(!health.upstream_configured);
        assert_eq!(health.quota_used, 0);
        assert_eq!(health.quota_ceiling, 30);
        assert_eq!(health.cached_locations, 0);
    }

    #[tokio::test]
    async fn test_health_with_credential() {
        let config = AppConfig {
            windy_api_key: Some("key".to_string()),
            ..AppConfig::default()
        };
        let service = ForecastService::new(&config, Arc::new(SystemClock)).unwrap();
        let Json(health) = health_check(State(service)).await;
        assert_eq!(health.status, "ok");

        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["upstreamConfigured"], true);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
