//! Memoized market analysis over a [`PropertyStore`].

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::{CacheKey, SingleFlightCache};
use crate::statistics;
use crate::store::{InMemoryPropertyStore, PropertyStore};
use crate::{BedroomSegments, CoreError, MarketStats, PropertyRecord, TrendPoint};

/// Value stored per cache key.
#[derive(Debug, Clone)]
enum CachedStats {
    Overall(MarketStats),
    Trend(Arc<[TrendPoint]>),
    Segments(Arc<BedroomSegments>),
}

impl CachedStats {
    const fn variant(&self) -> &'static str {
        match self {
            Self::Overall(_) => "overall",
            Self::Trend(_) => "trend",
            Self::Segments(_) => "segments",
        }
    }
}

/// Statistics service with one memo slot per computation kind.
///
/// Results stay cached until [`refresh`](Self::refresh) (or
/// [`reload`](MarketAnalysis::reload) for in-memory stores) is called.
pub struct MarketAnalysis<S = InMemoryPropertyStore> {
    store: Arc<S>,
    cache: SingleFlightCache<CacheKey, CachedStats>,
}

impl<S: PropertyStore> MarketAnalysis<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            cache: SingleFlightCache::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Overall statistics, cached under `overall`.
    pub async fn overall(&self) -> Result<MarketStats, CoreError> {
        match self.cached(CacheKey::Overall).await? {
            CachedStats::Overall(stats) => Ok(stats),
            other => Err(slot_mismatch(CacheKey::Overall, &other)),
        }
    }

    /// Yearly trend, cached under `byYear`.
    pub async fn trend(&self) -> Result<Vec<TrendPoint>, CoreError> {
        match self.cached(CacheKey::ByYear).await? {
            CachedStats::Trend(points) => Ok(points.to_vec()),
            other => Err(slot_mismatch(CacheKey::ByYear, &other)),
        }
    }

    /// Bedroom segments, cached under `byBedrooms`.
    pub async fn bedroom_segments(&self) -> Result<BedroomSegments, CoreError> {
        match self.cached(CacheKey::ByBedrooms).await? {
            CachedStats::Segments(segments) => Ok(segments.as_ref().clone()),
            other => Err(slot_mismatch(CacheKey::ByBedrooms, &other)),
        }
    }

    /// Drops every memoized result; the next request recomputes.
    pub async fn refresh(&self) {
        self.cache.clear().await;
        info!("market statistics cache cleared");
    }

    pub async fn invalidate(&self, key: CacheKey) {
        self.cache.invalidate(key).await;
        debug!(%key, "market statistics cache entry invalidated");
    }

    pub async fn is_cached(&self, key: CacheKey) -> bool {
        self.cache.contains(key).await
    }

    async fn cached(&self, key: CacheKey) -> Result<CachedStats, CoreError> {
        let (value, hit) = self
            .cache
            .get_or_try_compute(key, || async { self.compute(key) })
            .await?;
        if hit {
            debug!(%key, "market statistics served from cache");
        }
        Ok(value)
    }

    fn compute(&self, key: CacheKey) -> Result<CachedStats, CoreError> {
        let snapshot = self.store.snapshot();
        info!(%key, records = snapshot.len(), "calculating market statistics");
        match key {
            CacheKey::Overall => statistics::compute_overall(&snapshot).map(CachedStats::Overall),
            CacheKey::ByYear => statistics::compute_trend(&snapshot)
                .map(|points| CachedStats::Trend(Arc::from(points))),
            CacheKey::ByBedrooms => statistics::compute_segments(&snapshot)
                .map(|segments| CachedStats::Segments(Arc::new(segments))),
        }
    }
}

impl MarketAnalysis<InMemoryPropertyStore> {
    pub fn in_memory(records: Vec<PropertyRecord>) -> Self {
        Self::new(Arc::new(InMemoryPropertyStore::new(records)))
    }

    /// Replaces the snapshot and drops every memoized result.
    pub async fn reload(&self, records: Vec<PropertyRecord>) {
        self.store.replace(records);
        self.refresh().await;
    }
}

fn slot_mismatch(key: CacheKey, found: &CachedStats) -> CoreError {
    error!(%key, found = found.variant(), "cache slot holds a value of the wrong kind");
    CoreError::internal(format!(
        "cache slot '{key}' holds {} statistics",
        found.variant()
    ))
}
