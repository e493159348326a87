//! Maintenance status HTTP endpoint.
//!
//! GET /api/v1/maintenance/status returns the state of the background
//! quota reset and cache sweep as JSON.

use axum::extract::State;
use axum::Json;

use crate::services::maintenance::{MaintenanceState, SharedMaintenanceState};

/// Get the current maintenance status.
#[utoipa::path(
    get,
    path = "/api/v1/maintenance/status",
    tag = "Maintenance",
    responses(
        (status = 200, description = "Current maintenance status", body = MaintenanceState),
    )
)]
pub async fn get_maintenance_status(
    State(state): State<SharedMaintenanceState>,
) -> Json<MaintenanceState> {
    let s = state.read().await;
    Json(s.clone())
}
