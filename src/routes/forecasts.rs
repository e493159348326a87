//! Forecast proxy endpoint.
//!
//! - POST /forecast with `{lat, lng}`
//! - OPTIONS /forecast answers 200 with an empty body
//! - any other method is 405

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::models::{Coordinate, ForecastPoint};
use crate::services::forecast::ForecastService;

/// Request body. Both fields are optional here so that a missing value is
/// reported as invalid coordinates rather than a body parse error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ForecastRequest {
    /// Latitude in degrees, -90 to 90
    pub lat: Option<f64>,
    /// Longitude in degrees, -180 to 180
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastResponse {
    /// Seven daily points, ascending by time
    pub forecast: Vec<ForecastPoint>,
}

/// Get a seven-day wave and wind forecast for a coordinate.
///
/// Nearby coordinates share a cached answer. When the provider is
/// unavailable or the daily quota is spent, synthetic points tagged
/// `source: "fallback"` are returned instead; this is still a 200.
#[utoipa::path(
    post,
    path = "/forecast",
    tag = "Forecast",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Seven-day forecast", body = ForecastResponse),
        (status = 400, description = "Missing or out-of-range coordinates", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Service is not configured", body = ErrorResponse),
    )
)]
pub async fn post_forecast(
    State(service): State<ForecastService>,
    body: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, AppError> {
    let Json(request) = body?;
    let coord = Coordinate::new(request.lat, request.lng)?;

    let series = service.resolve(coord).await?;
    Ok(Json(ForecastResponse {
        forecast: series.into_points(),
    }))
}

/// Preflight requests succeed with an empty body.
pub async fn options_forecast() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
