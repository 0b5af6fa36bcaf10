//! In-memory memoization with single-flight computation per key.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};

/// Computation kinds memoized by [`crate::market::MarketAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Overall,
    ByYear,
    ByBedrooms,
}

impl CacheKey {
    pub const ALL: [Self; 3] = [Self::Overall, Self::ByYear, Self::ByBedrooms];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::ByYear => "byYear",
            Self::ByBedrooms => "byBedrooms",
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread-safe memo store.
///
/// Each key owns a `OnceCell`. Concurrent misses on the same key wait on one
/// initializer; a failed initializer leaves the cell empty so the next
/// caller recomputes. Entries never expire on their own, they are dropped
/// only through [`invalidate`](Self::invalidate) or [`clear`](Self::clear).
#[derive(Debug)]
pub struct SingleFlightCache<K, V> {
    cells: RwLock<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for SingleFlightCache<K, V> {
    fn default() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> SingleFlightCache<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value for `key`, or runs `compute` once for all
    /// concurrent callers and stores its `Ok` value.
    ///
    /// The boolean is `true` on a hit, i.e. when this caller did not run
    /// `compute` itself.
    pub async fn get_or_try_compute<F, Fut, E>(&self, key: K, compute: F) -> Result<(V, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell(key).await;
        let mut computed = false;
        let value = cell
            .get_or_try_init(|| {
                computed = true;
                compute()
            })
            .await?;
        Ok((value.clone(), !computed))
    }

    /// Stored value without computing.
    pub async fn get(&self, key: K) -> Option<V> {
        let cells = self.cells.read().await;
        cells.get(&key).and_then(|cell| cell.get().cloned())
    }

    pub async fn contains(&self, key: K) -> bool {
        self.get(key).await.is_some()
    }

    /// Drops the entry for `key`. Computations already in flight finish
    /// against the detached cell and are not stored.
    pub async fn invalidate(&self, key: K) {
        let mut cells = self.cells.write().await;
        cells.remove(&key);
    }

    pub async fn clear(&self) {
        let mut cells = self.cells.write().await;
        cells.clear();
    }

    /// Number of keys holding a computed value.
    pub async fn len(&self) -> usize {
        let cells = self.cells.read().await;
        cells.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn cell(&self, key: K) -> Arc<OnceCell<V>> {
        if let Some(cell) = self.cells.read().await.get(&key) {
            return Arc::clone(cell);
        }
        let mut cells = self.cells.write().await;
        Arc::clone(cells.entry(key).or_insert_with(|| Arc::new(OnceCell::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn miss_computes_then_hit_reuses() {
        let cache: SingleFlightCache<CacheKey, u32> = SingleFlightCache::new();

        let (first, hit) = cache
            .get_or_try_compute(CacheKey::Overall, || async { Ok::<_, ()>(7) })
            .await
            .expect("computed");
        assert_eq!((first, hit), (7, false));

        let (second, hit) = cache
            .get_or_try_compute(CacheKey::Overall, || async { Ok::<_, ()>(99) })
            .await
            .expect("cached");
        assert_eq!((second, hit), (7, true));
    }

    #[tokio::test]
    async fn failures_are_not_stored() {
        let cache: SingleFlightCache<CacheKey, u32> = SingleFlightCache::new();

        let failed = cache
            .get_or_try_compute(CacheKey::ByYear, || async { Err::<u32, _>("no data") })
            .await;
        assert_eq!(failed, Err("no data"));
        assert!(!cache.contains(CacheKey::ByYear).await);

        let (value, hit) = cache
            .get_or_try_compute(CacheKey::ByYear, || async { Ok::<_, &str>(3) })
            .await
            .expect("second attempt computes");
        assert_eq!((value, hit), (3, false));
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_computation() {
        let cache: Arc<SingleFlightCache<CacheKey, u32>> = Arc::new(SingleFlightCache::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let runs = Arc::clone(&runs);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_try_compute(CacheKey::ByBedrooms, || async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, ()>(42)
                    })
                    .await
            }));
        }

        for handle in handles {
            let (value, _) = handle.await.expect("task").expect("value");
            assert_eq!(value, 42);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_and_clear_drop_entries() {
        let cache: SingleFlightCache<CacheKey, u32> = SingleFlightCache::new();
        for key in CacheKey::ALL {
            cache
                .get_or_try_compute(key, || async { Ok::<_, ()>(1) })
                .await
                .expect("value");
        }
        assert_eq!(cache.len().await, 3);

        cache.invalidate(CacheKey::Overall).await;
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(CacheKey::Overall).await, None);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[test]
    fn cache_keys_have_stable_names() {
        assert_eq!(CacheKey::Overall.to_string(), "overall");
        assert_eq!(CacheKey::ByYear.to_string(), "byYear");
        assert_eq!(CacheKey::ByBedrooms.to_string(), "byBedrooms");
    }
}
