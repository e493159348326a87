//! Background maintenance.
//!
//! Two fixed-interval schedules run in one task: the daily quota reset and
//! the cache-expiry sweep. Neither blocks request handling; both only touch
//! the pipeline's concurrent structures. Results are kept in memory
//! (`Arc<RwLock<MaintenanceState>>`) for the status endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use utoipa::ToSchema;

use crate::services::forecast::ForecastService;

/// Maintenance state, exposed via the status endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceState {
    pub active: bool,
    pub quota_reset_interval_secs: u64,
    pub cache_sweep_interval_secs: u64,
    pub last_quota_reset_at: Option<DateTime<Utc>>,
    pub last_cache_sweep_at: Option<DateTime<Utc>>,
    /// Entries evicted by the most recent sweep
    pub last_sweep_evicted: usize,
    pub total_quota_resets: u64,
    pub total_cache_sweeps: u64,
    pub total_evicted: u64,
}

impl MaintenanceState {
    pub fn new(quota_reset_interval: Duration, cache_sweep_interval: Duration) -> Self {
        Self {
            active: false,
            quota_reset_interval_secs: quota_reset_interval.as_secs(),
            cache_sweep_interval_secs: cache_sweep_interval.as_secs(),
            last_quota_reset_at: None,
            last_cache_sweep_at: None,
            last_sweep_evicted: 0,
            total_quota_resets: 0,
            total_cache_sweeps: 0,
            total_evicted: 0,
        }
    }
}

/// Shared maintenance state handle.
pub type SharedMaintenanceState = Arc<RwLock<MaintenanceState>>;

/// Run maintenance until the process exits.
///
/// Should be spawned via `tokio::spawn(run_maintenance(...))`. The first
/// tick of each schedule is one full period after start.
pub async fn run_maintenance(
    service: ForecastService,
    state: SharedMaintenanceState,
    quota_reset_interval: Duration,
    cache_sweep_interval: Duration,
) {
    tracing::info!(
        "Maintenance started: quota reset every {}s, cache sweep every {}s",
        quota_reset_interval.as_secs(),
        cache_sweep_interval.as_secs()
    );
    state.write().await.active = true;

    let start = Instant::now();
    let mut quota_timer = interval_at(start + quota_reset_interval, quota_reset_interval);
    let mut sweep_timer = interval_at(start + cache_sweep_interval, cache_sweep_interval);
    quota_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    sweep_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = quota_timer.tick() => {
                service.reset_quota();
                let mut s = state.write().await;
                s.last_quota_reset_at = Some(Utc::now());
                s.total_quota_resets += 1;
            }
            _ = sweep_timer.tick() => {
                let evicted = service.sweep_cache();
                if evicted > 0 {
                    tracing::info!("Cache sweep evicted {} expired entries", evicted);
                } else {
                    tracing::debug!("Cache sweep found nothing to evict");
                }
                let mut s = state.write().await;
                s.last_cache_sweep_at = Some(Utc::now());
                s.last_sweep_evicted = evicted;
                s.total_cache_sweeps += 1;
                s.total_evicted += evicted as u64;
            }
        }
    }
}
