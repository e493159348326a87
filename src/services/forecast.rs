//! Forecast resolution pipeline.
//!
//! quantize -> cache -> in-flight join -> quota -> provider -> cache.
//!
//! From the caller's side a valid coordinate never hard-fails: provider
//! errors, timeouts and quota exhaustion are logged and absorbed by
//! substituting synthetic data, visible only through each point's `source`.

use std::sync::Arc;

use crate::clock::SharedClock;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{Coordinate, ForecastSeries};
use crate::services::cache::ForecastCache;
use crate::services::fallback::FallbackGenerator;
use crate::services::inflight::InFlight;
use crate::services::quantize::{quantize, CacheKey};
use crate::services::quota::QuotaLimiter;
use crate::services::windy::{UpstreamError, WindyClient};

type Resolution = Result<ForecastSeries, AppError>;

/// Why a miss could not be served from the provider.
#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("upstream is not configured")]
    NotConfigured,
    #[error("daily quota exhausted")]
    QuotaExhausted,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

struct Pipeline {
    cache: ForecastCache,
    quota: QuotaLimiter,
    inflight: InFlight<CacheKey, Resolution>,
    upstream: Option<WindyClient>,
    fallback: FallbackGenerator,
    fallback_enabled: bool,
}

/// Cheap-to-clone handle to the process-wide pipeline state.
#[derive(Clone)]
pub struct ForecastService {
    inner: Arc<Pipeline>,
}

impl ForecastService {
    pub fn new(config: &AppConfig, clock: SharedClock) -> Result<Self, UpstreamError> {
        let upstream = match &config.windy_api_key {
            Some(key) => Some(WindyClient::new(
                &config.windy_api_url,
                &config.windy_model,
                key,
                config.upstream_timeout,
            )?),
            None => {
                tracing::warn!("WINDY_API_KEY is not set; upstream forecasts are disabled");
                None
            }
        };

        Ok(Self {
            inner: Arc::new(Pipeline {
                cache: ForecastCache::new(config.cache_ttl, clock.clone()),
                quota: QuotaLimiter::new(config.daily_quota),
                inflight: InFlight::new(),
                upstream,
                fallback: FallbackGenerator::new(clock),
                fallback_enabled: config.fallback_enabled,
            }),
        })
    }

    /// Resolve a seven-day forecast for `coord`.
    pub async fn resolve(&self, coord: Coordinate) -> Result<ForecastSeries, AppError> {
        if self.inner.upstream.is_none() {
            if !self.inner.fallback_enabled {
                return Err(AppError::Configuration(
                    "WINDY_API_KEY is not set and fallback is disabled".to_string(),
                ));
            }
            tracing::debug!("No upstream credential, serving fallback for {:?}", coord);
            return self.inner.fallback.generate(coord);
        }

        let key = quantize(coord);
        if let Some(hit) = self.inner.cache.get(&key) {
            tracing::debug!("Cache hit for {}", key);
            return Ok(hit);
        }
        tracing::debug!(
            "Cache miss for {} ({} fetches in flight)",
            key,
            self.inner.inflight.len()
        );

        let pipeline = Arc::clone(&self.inner);
        self.inner
            .inflight
            .join(key, move || pipeline.fetch_and_store(key, coord))
            .await
            .map_err(|e| {
                tracing::error!("Forecast fetch for {} failed: {}", key, e);
                AppError::InternalError("Forecast is temporarily unavailable".to_string())
            })?
    }

    pub fn reset_quota(&self) {
        self.inner.quota.reset_daily();
    }

    pub fn sweep_cache(&self) -> usize {
        self.inner.cache.sweep_expired()
    }

    pub fn upstream_configured(&self) -> bool {
        self.inner.upstream.is_some()
    }

    pub fn quota_used(&self) -> u32 {
        self.inner.quota.used()
    }

    pub fn quota_ceiling(&self) -> u32 {
        self.inner.quota.ceiling()
    }

    pub fn cached_locations(&self) -> usize {
        self.inner.cache.len()
    }
}

impl Pipeline {
    /// The shared part of a miss: runs once per key however many callers
    /// join, on its own task, so it finishes even if they all disconnect.
    /// The cache is written before the in-flight entry is released.
    async fn fetch_and_store(self: Arc<Self>, key: CacheKey, coord: Coordinate) -> Resolution {
        let series = match self.fetch_upstream(key).await {
            Ok(series) => series,
            Err(reason) if self.fallback_enabled => {
                tracing::warn!("Serving fallback forecast for {}: {}", key, reason);
                self.fallback.generate(coord)?
            }
            Err(reason) => {
                tracing::error!("No forecast available for {}: {}", key, reason);
                return Err(AppError::InternalError(
                    "Forecast is temporarily unavailable".to_string(),
                ));
            }
        };

        self.cache.put(key, series.clone());
        Ok(series)
    }

    async fn fetch_upstream(&self, key: CacheKey) -> Result<ForecastSeries, FetchError> {
        let client = self.upstream.as_ref().ok_or(FetchError::NotConfigured)?;

        if !self.quota.try_reserve() {
            tracing::info!(
                "Daily quota exhausted ({}/{}), skipping upstream for {}",
                self.quota.used(),
                self.quota.ceiling(),
                key
            );
            return Err(FetchError::QuotaExhausted);
        }

        tracing::info!(
            "Fetching forecast for {} from upstream ({}/{} calls used)",
            key,
            self.quota.used(),
            self.quota.ceiling()
        );
        Ok(client.fetch(key.lat(), key.lng()).await?)
    }
}
