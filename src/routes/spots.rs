//! Spot HTTP endpoints.
//!
//! - GET /api/v1/spots
//! - GET /api/v1/spots/:id/forecast?board=longboard|shortboard

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::models::{BoardType, Coordinate, Spot};
use crate::services::forecast::ForecastService;
use crate::services::scoring::{score_day, DayScore};
use crate::services::spots::SpotCatalog;

/// Shared state for spot endpoints.
#[derive(Clone)]
pub(crate) struct SpotsState {
    pub(crate) catalog: Arc<SpotCatalog>,
    pub(crate) forecasts: ForecastService,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SpotForecastQuery {
    /// "longboard" (default) or "shortboard"
    pub board: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpotForecastResponse {
    pub spot: Spot,
    pub board: BoardType,
    pub days: Vec<DayScore>,
}

/// List all known surf spots.
#[utoipa::path(
    get,
    path = "/api/v1/spots",
    tag = "Spots",
    responses(
        (status = 200, description = "All spots", body = Vec<Spot>),
    )
)]
pub async fn list_spots(State(state): State<SpotsState>) -> Json<Vec<Spot>> {
    Json(state.catalog.all().to_vec())
}

/// Seven-day scored forecast for one spot.
///
/// Each day's wave height is calibrated for the spot's bay shape and
/// seabed before scoring.
#[utoipa::path(
    get,
    path = "/api/v1/spots/{id}/forecast",
    tag = "Spots",
    params(
        ("id" = u32, Path, description = "Spot id"),
        SpotForecastQuery,
    ),
    responses(
        (status = 200, description = "Scored forecast", body = SpotForecastResponse),
        (status = 400, description = "Unknown board type", body = ErrorResponse),
        (status = 404, description = "Spot not found", body = ErrorResponse),
    )
)]
pub async fn get_spot_forecast(
    State(state): State<SpotsState>,
    id: Result<Path<u32>, PathRejection>,
    query: Result<Query<SpotForecastQuery>, QueryRejection>,
) -> Result<Json<SpotForecastResponse>, AppError> {
    let Path(id) = id.map_err(|_| AppError::NotFound("Spot not found".to_string()))?;
    let Query(query) = query?;

    let board = match query.board.as_deref() {
        Some(raw) => raw.parse::<BoardType>()?,
        None => BoardType::Longboard,
    };

    let spot = state
        .catalog
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Spot {} not found", id)))?;

    let coord = Coordinate::new(Some(spot.lat), Some(spot.lng))?;
    let series = state.forecasts.resolve(coord).await?;
    let days = series
        .points()
        .iter()
        .map(|point| score_day(&spot, point, board))
        .collect();

    Ok(Json(SpotForecastResponse { spot, board, days }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::config::AppConfig;

    const CATALOG: &str = r#"[
        {"id": 8, "name": "Lingshui Xiangshui Bay", "lat": 18.550802, "lng": 110.131152,
         "breakType": "beach_break", "exposure": "southeast", "bayShape": "enclosed",
         "seabedType": "sand", "region": "hainan"}
    ]"#;

    fn state() -> SpotsState {
        SpotsState {
            catalog: Arc::new(SpotCatalog::from_json(CATALOG).unwrap()),
            forecasts: ForecastService::new(&AppConfig::default(), Arc::new(SystemClock))
                .unwrap(),
        }
    }

    fn query(board: Option<&str>) -> Result<Query<SpotForecastQuery>, QueryRejection> {
        Ok(Query(SpotForecastQuery {
            board: board.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn test_list_spots() {
        let Json(spots) = list_spots(State(state())).await;
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].id, 8);
    }

    #[tokio::test]
    async fn test_spot_forecast_scores_each_day() {
        let Json(response) =
            get_spot_forecast(State(state()), Ok(Path(8)), query(Some("shortboard")))
                .await
                .unwrap();
        assert_eq!(response.board, BoardType::Shortboard);
        assert_eq!(response.days.len(), 7);
        for day in &response.days {
            // enclosed sand: at most 3.0 * 0.4 * 0.7 * 0.9, floored at 0.3
            assert!(day.calibrated_wave_height >= 0.3);
            assert!(day.calibrated_wave_height <= 0.76);
            assert!((0.0..=1.0).contains(&day.score.score));
        }
    }

    #[tokio::test]
    async fn test_spot_forecast_defaults_to_longboard() {
        let Json(response) = get_spot_forecast(State(state()), Ok(Path(8)), query(None))
            .await
            .unwrap();
        assert_eq!(response.board, BoardType::Longboard);
    }

    #[tokio::test]
    async fn test_spot_forecast_unknown_spot() {
        let err = get_spot_forecast(State(state()), Ok(Path(99)), query(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_spot_forecast_unknown_board() {
        let err = get_spot_forecast(State(state()), Ok(Path(8)), query(Some("bodyboard")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
