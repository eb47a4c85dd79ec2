//! Shared application state for the ghstats gateway.
//!
//! Owns the process-wide cache and rate limiter instances; nothing in the
//! crate reaches for globals, so tests can build as many isolated states as
//! they need.

use std::sync::Arc;

use ghstats_core::error::Result;
use ghstats_core::{FixedWindowLimiter, StatsResult, TtlCache};

use crate::config::GatewayConfig;
use crate::obs::GatewayMetrics;
use crate::stats::StatsService;
use crate::upstream::{GithubClient, StatsSource};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    stats: Arc<StatsService>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    /// Build application state with the GitHub client as data source.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let source = Arc::new(GithubClient::new(&cfg.upstream)?);
        Ok(Self::with_source(cfg, source))
    }

    /// Build application state around an arbitrary data source.
    pub fn with_source(cfg: GatewayConfig, source: Arc<dyn StatsSource>) -> Self {
        let cache = Arc::new(TtlCache::<StatsResult>::new());
        let limiter = Arc::new(FixedWindowLimiter::new(
            cfg.rate_limit.limit,
            cfg.rate_limit.interval(),
        ));
        Self::from_parts(cfg, source, cache, limiter)
    }

    /// Build application state from pre-constructed primitives.
    pub fn from_parts(
        cfg: GatewayConfig,
        source: Arc<dyn StatsSource>,
        cache: Arc<TtlCache<StatsResult>>,
        limiter: Arc<FixedWindowLimiter>,
    ) -> Self {
        let stats = StatsService::new(
            source,
            cache,
            limiter,
            cfg.cache.ttl(),
            cfg.upstream.timeout(),
        );

        tracing::info!(
            rate_limit = cfg.rate_limit.limit,
            interval_ms = cfg.rate_limit.interval_ms,
            cache_ttl_secs = cfg.cache.ttl_secs,
            "stats service ready"
        );

        Self {
            inner: Arc::new(AppStateInner { cfg }),
            stats: Arc::new(stats),
            metrics: Arc::new(GatewayMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Point-in-time values owned by the cache and limiter, for `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let cache = self.stats.cache().stats();
        vec![
            ("ghstats_cache_hits_total", cache.hits),
            ("ghstats_cache_misses_total", cache.misses),
            ("ghstats_cache_entries", cache.entries as u64),
            ("ghstats_rate_limit_rejections_total", self.stats.limiter().rejected()),
        ]
    }
}
