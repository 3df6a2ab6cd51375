//! A keyed cache for async loads.
//!
//! Concurrent requests for the same key share one in-flight load, and a
//! finished value is served until its time-to-live runs out (or forever when
//! no TTL is set).  A failed load leaves nothing behind, so the next request
//! tries again.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;

struct Loaded<V> {
    value: V,
    /// When the load finished.
    at: Instant,
}

/// Empty while its load is running, or after that load failed.
type Slot<V> = Arc<OnceCell<Loaded<V>>>;

pub struct LoadCache<K, V> {
    entries: Mutex<HashMap<K, Slot<V>>>,
    ttl: Option<Duration>,
}

impl<K, V> LoadCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// `ttl = None` keeps values until [`invalidate`](Self::invalidate) or
    /// [`clear`](Self::clear).
    pub fn new(ttl: Option<Duration>) -> LoadCache<K, V> {
        LoadCache {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn is_fresh(&self, loaded: &Loaded<V>) -> bool {
        self.ttl.map_or(true, |ttl| loaded.at.elapsed() < ttl)
    }

    /// Whether a slot is worth keeping: a fresh value, or a load someone is
    /// still waiting on.  A slot nobody else holds and that never got a value
    /// belongs to a failed or abandoned load.
    fn is_live(&self, slot: &Slot<V>) -> bool {
        match slot.get() {
            Some(loaded) => self.is_fresh(loaded),
            None => Arc::strong_count(slot) > 1,
        }
    }

    /// Return the cached value for `key`, or run `load` to produce it.
    ///
    /// While a load for `key` is running, other callers wait for it instead
    /// of starting their own, however long it takes.  The TTL counts from
    /// the moment the load finished.  Expired and failed entries for every
    /// key are dropped on the way in.
    pub async fn get_or_load<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.retain(|_, slot| self.is_live(slot));
            entries.entry(key).or_default().clone()
        };
        let loaded = cell
            .get_or_try_init(|| async {
                load().await.map(|value| Loaded {
                    value,
                    at: Instant::now(),
                })
            })
            .await?;
        Ok(loaded.value.clone())
    }

    /// The cached value for `key` if it is loaded and fresh.
    pub async fn peek(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .and_then(|slot| slot.get())
            .filter(|loaded| self.is_fresh(loaded))
            .map(|loaded| loaded.value.clone())
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.lock().await.remove(key);
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of keys with a loaded, fresh value.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries
            .values()
            .filter_map(|slot| slot.get())
            .filter(|loaded| self.is_fresh(loaded))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn concurrent_loads_of_one_key_share_the_work() {
        let cache: LoadCache<&str, String> = LoadCache::new(None);
        let calls = &AtomicUsize::new(0);
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, String>("body".to_string())
        };

        let (a, b) = tokio::join!(cache.get_or_load("7", load), cache.get_or_load("7", load));
        assert_eq!(a.unwrap(), "body");
        assert_eq!(b.unwrap(), "body");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn values_expire_after_the_ttl() {
        let cache: LoadCache<u32, u32> = LoadCache::new(Some(Duration::from_secs(300)));
        let calls = &AtomicUsize::new(0);
        let load = move || async move { Ok::<_, ()>(calls.fetch_add(1, Ordering::SeqCst) as u32) };

        assert_eq!(cache.get_or_load(1, load).await, Ok(0));
        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get_or_load(1, load).await, Ok(0));
        assert_eq!(cache.peek(&1).await, Some(0));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.peek(&1).await, None);
        assert_eq!(cache.get_or_load(1, load).await, Ok(1));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache: LoadCache<&str, u8> = LoadCache::new(None);
        let failed = cache
            .get_or_load("k", || async { Err::<u8, _>("offline") })
            .await;
        assert_eq!(failed, Err("offline"));
        assert!(cache.is_empty().await);

        let ok = cache.get_or_load("k", || async { Ok::<_, &str>(3) }).await;
        assert_eq!(ok, Ok(3));

        let _ = cache
            .get_or_load("gone", || async { Err::<u8, _>("offline") })
            .await;
        let _ = cache.get_or_load("k", || async { Ok::<_, &str>(4) }).await;
        assert_eq!(cache.entries.lock().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_dropped() {
        let cache: LoadCache<u32, u32> = LoadCache::new(Some(Duration::from_secs(300)));
        for key in 0..10 {
            assert_eq!(cache.get_or_load(key, || async move { Ok::<_, ()>(key) }).await, Ok(key));
        }
        assert_eq!(cache.entries.lock().await.len(), 10);

        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(cache.get_or_load(99, || async { Ok::<_, ()>(99) }).await, Ok(99));
        assert_eq!(cache.entries.lock().await.len(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn a_load_slower_than_the_ttl_is_still_shared() {
        let cache: LoadCache<u32, u32> = LoadCache::new(Some(Duration::from_millis(100)));
        let calls = &AtomicUsize::new(0);
        let load = move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) as u32;
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, ()>(n)
        };

        let late = async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cache.get_or_load(1, load).await
        };
        let (a, b) = tokio::join!(cache.get_or_load(1, load), late);
        assert_eq!((a, b), (Ok(0), Ok(0)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(50)).await;
        assert_eq!(cache.peek(&1).await, Some(0));
    }

    #[tokio::test]
    async fn invalidate_forces_a_reload() {
        let cache: LoadCache<&str, u8> = LoadCache::new(None);
        let _ = cache.get_or_load("k", || async { Ok::<_, ()>(1) }).await;
        cache.invalidate(&"k").await;
        assert_eq!(cache.peek(&"k").await, None);
        assert_eq!(cache.get_or_load("k", || async { Ok::<_, ()>(2) }).await, Ok(2));
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }
}
