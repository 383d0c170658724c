//! Freshness-bounded cache with request coalescing.
//!
//! Each key holds the last committed value together with its fetch time. A
//! read within the freshness window returns the cached value without
//! touching the upstream. When a refresh is needed, concurrent readers of
//! the same key share a single in-flight fetch instead of issuing one
//! upstream call each.
//!
//! A failed refresh never evicts the last committed value: the entry is
//! marked stale and keeps serving until a later refresh succeeds. Only a
//! key with no committed value at all propagates the error.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::warn;

use coindash_market_data::ProviderError;

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, Arc<ProviderError>>>>;

struct CachedValue<T> {
    value: T,
    fetched_at: Instant,
    stale: bool,
}

struct InflightFetch<T> {
    /// Distinguishes this fetch from a later one for the same key, so an
    /// early invalidation cannot let a superseded fetch commit its result.
    generation: u64,
    future: SharedFetch<T>,
}

struct CacheState<T> {
    ready: HashMap<String, CachedValue<T>>,
    inflight: HashMap<String, InflightFetch<T>>,
    next_generation: u64,
}

/// Keyed cache bounding how often an upstream loader runs.
pub struct FreshnessCache<T> {
    ttl: Duration,
    state: Mutex<CacheState<T>>,
}

impl<T: Clone + Send + 'static> FreshnessCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CacheState {
                ready: HashMap::new(),
                inflight: HashMap::new(),
                next_generation: 0,
            }),
        }
    }

    /// Return the cached value for `key` if fresh, otherwise run (or join)
    /// a single fetch for it.
    ///
    /// # Errors
    ///
    /// Propagates the loader error only when no previously committed value
    /// exists for the key; otherwise the last committed value is served.
    pub async fn get_or_fetch<F>(&self, key: &str, load: F) -> Result<T, Arc<ProviderError>>
    where
        F: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        let (future, generation) = {
            let mut state = self.state.lock().unwrap();
            if let Some(entry) = state.ready.get(key) {
                if !entry.stale && entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.value.clone());
                }
            }
            match state.inflight.get(key) {
                Some(fetch) => (fetch.future.clone(), fetch.generation),
                None => {
                    let generation = state.next_generation;
                    state.next_generation += 1;
                    let future: SharedFetch<T> =
                        load.map(|result| result.map_err(Arc::new)).boxed().shared();
                    state.inflight.insert(
                        key.to_string(),
                        InflightFetch {
                            generation,
                            future: future.clone(),
                        },
                    );
                    (future, generation)
                }
            }
        };

        // Awaited outside the lock so other keys stay usable.
        let result = future.await;

        let mut state = self.state.lock().unwrap();
        let is_current = state
            .inflight
            .get(key)
            .is_some_and(|fetch| fetch.generation == generation);
        if is_current {
            state.inflight.remove(key);
            match &result {
                Ok(value) => {
                    state.ready.insert(
                        key.to_string(),
                        CachedValue {
                            value: value.clone(),
                            fetched_at: Instant::now(),
                            stale: false,
                        },
                    );
                }
                Err(error) => {
                    warn!("Refresh of '{key}' failed, keeping last value: {error}");
                    if let Some(entry) = state.ready.get_mut(key) {
                        entry.stale = true;
                    }
                }
            }
        }

        match result {
            Ok(value) => Ok(value),
            Err(error) => match state.ready.get(key) {
                Some(entry) => Ok(entry.value.clone()),
                None => Err(error),
            },
        }
    }

    /// Drop the committed value and any in-flight fetch for `key`.
    pub fn invalidate(&self, key: &str) {
        let mut state = self.state.lock().unwrap();
        state.ready.remove(key);
        state.inflight.remove(key);
    }

    /// Drop every committed value and in-flight fetch.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.ready.clear();
        state.inflight.clear();
    }

    /// Whether the committed value for `key` outlived a failed refresh.
    pub fn is_stale(&self, key: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.ready.get(key).is_some_and(|entry| entry.stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_load(
        calls: &Arc<AtomicUsize>,
        result: Result<u32, ProviderError>,
    ) -> impl Future<Output = Result<u32, ProviderError>> + Send + 'static {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            result
        }
    }

    #[tokio::test]
    async fn test_fresh_value_skips_loader() {
        let cache = FreshnessCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_fetch("markets", counting_load(&calls, Ok(1)))
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("markets", counting_load(&calls, Ok(2)))
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_readers_share_one_fetch() {
        let cache = Arc::new(FreshnessCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let slow_load = |calls: Arc<AtomicUsize>| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(7u32)
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_fetch("markets", slow_load(calls.clone())),
            cache.get_or_fetch("markets", slow_load(calls.clone())),
            cache.get_or_fetch("markets", slow_load(calls.clone())),
        );

        assert_eq!(a.unwrap(), 7);
        assert_eq!(b.unwrap(), 7);
        assert_eq!(c.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_value_triggers_refresh() {
        let cache = FreshnessCache::new(Duration::from_millis(10));
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch("markets", counting_load(&calls, Ok(1)))
            .await
            .unwrap();
        std::thread::sleep(Duration::from_millis(20));
        let refreshed = cache
            .get_or_fetch("markets", counting_load(&calls, Ok(2)))
            .await
            .unwrap();

        assert_eq!(refreshed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_serves_last_value() {
        let cache = FreshnessCache::new(Duration::from_millis(10));
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch("markets", counting_load(&calls, Ok(1)))
            .await
            .unwrap();
        std::thread::sleep(Duration::from_millis(20));

        let error = ProviderError::Unavailable {
            provider: "COINGECKO".to_string(),
            message: "timeout".to_string(),
        };
        let served = cache
            .get_or_fetch("markets", counting_load(&calls, Err(error)))
            .await
            .unwrap();

        assert_eq!(served, 1);
        assert!(cache.is_stale("markets"));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let cache = FreshnessCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch("markets", counting_load(&calls, Ok(1)))
            .await
            .unwrap();
        cache.invalidate("markets");
        std::thread::sleep(Duration::from_millis(1));

        // No committed value left, so the next read must hit the loader.
        let refreshed = cache
            .get_or_fetch("markets", counting_load(&calls, Ok(2)))
            .await
            .unwrap();
        assert_eq!(refreshed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_first_load_error_propagates() {
        let cache: FreshnessCache<u32> = FreshnessCache::new(Duration::from_secs(60));
        let error = cache
            .get_or_fetch("markets", async {
                Err(ProviderError::RateLimited {
                    provider: "COINGECKO".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(*error, ProviderError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = FreshnessCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch("chart:bitcoin:7", counting_load(&calls, Ok(1)))
            .await
            .unwrap();
        cache
            .get_or_fetch("chart:bitcoin:30", counting_load(&calls, Ok(2)))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
