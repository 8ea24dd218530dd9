use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

/// Injected cache capability (§9 redesign note): `get`/`put`/`expire` so
/// tests can substitute an in-memory or deterministic cache. Process-scoped,
/// read-mostly, with lazy TTL enforcement on read (§3 Lifecycle, §5 Shared
/// resources).
///
/// `get_or_insert_with` is the single-writer-per-key entry point: concurrent
/// callers for the same key may both compute once under contention (the
/// Mutex is held only while the map is touched, not across the provider
/// call), trading perfect de-duplication for simplicity.
pub struct TtlCache<K, V> {
    ttl: Option<Duration>,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// `ttl = None` means entries never expire (unbounded, LRU-style per §3
    /// for C1/C2 — eviction is not implemented here since request volume in
    /// this crate's scope does not warrant it).
    pub fn new(ttl: Option<Duration>) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get(key) {
            if self.is_fresh(entry) {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    pub async fn put(&self, key: K, value: V) {
        let mut entries = self.entries.lock().await;
        entries.insert(key, Entry { value, inserted_at: Instant::now() });
    }

    pub async fn expire(&self, key: &K) {
        self.entries.lock().await.remove(key);
    }

    fn is_fresh(&self, entry: &Entry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.inserted_at.elapsed() < ttl,
            None => true,
        }
    }

    /// Fetch `key`, or compute it via `fetch` and store the result. `fetch`
    /// is only invoked on a cache miss.
    pub async fn get_or_insert_with<F, Fut>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(value) = self.get(&key).await {
            debug!(target: "travelcraft::cache", "cache hit");
            return value;
        }
        let value = fetch().await;
        self.put(key, value.clone()).await;
        value
    }
}

pub type SharedCache<K, V> = Arc<TtlCache<K, V>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hits_and_misses() {
        let cache: TtlCache<String, u32> = TtlCache::new(None);
        assert!(cache.get(&"a".to_string()).await.is_none());
        cache.put("a".to_string(), 1).await;
        assert_eq!(cache.get(&"a".to_string()).await, Some(1));
    }

    #[tokio::test]
    async fn expires_after_ttl() {
        let cache: TtlCache<String, u32> = TtlCache::new(Some(Duration::from_millis(10)));
        cache.put("a".to_string(), 1).await;
        assert_eq!(cache.get(&"a".to_string()).await, Some(1));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.get(&"a".to_string()).await.is_none());
    }

    #[tokio::test]
    async fn get_or_insert_with_only_computes_once() {
        let cache: TtlCache<String, u32> = TtlCache::new(None);
        let value = cache.get_or_insert_with("a".to_string(), || async { 42 }).await;
        assert_eq!(value, 42);
        let value = cache.get_or_insert_with("a".to_string(), || async { panic!("should not run") }).await;
        assert_eq!(value, 42);
    }
}
