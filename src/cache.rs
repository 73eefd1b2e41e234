use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.stored_at) < ttl
    }
}

/// One key's entry. Its lock is held while that key is being fetched.
type Slot<V> = Arc<Mutex<Option<CacheEntry<V>>>>;

/// Memoizes fetched values per key for a fixed time-to-live.
///
/// Entries are only replaced when their key is requested again after expiry
/// (or by [`TtlCache::purge_expired`]); there is no size bound.
pub struct TtlCache<K, V> {
    ttl: Duration,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    async fn slot(&self, key: &K) -> Slot<V> {
        let mut slots = self.slots.lock().await;
        slots.entry(key.clone()).or_default().clone()
    }

    /// Returns the fresh cached value for `key`, or awaits `fetch` and caches
    /// its `Ok` result. Errors are returned as-is and never cached.
    ///
    /// Only this key's slot is locked across `fetch`: concurrent callers for
    /// the same key share a single fetch, other keys are not held up.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(&key).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(self.ttl, Instant::now()) {
                debug!("Cache hit for {:?}", key);
                return Ok(cached.value.clone());
            }
        }

        debug!("Cache miss for {:?}", key);
        let value = fetch().await?;
        *entry = Some(CacheEntry {
            value: value.clone(),
            stored_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drops every entry older than the TTL and returns how many went.
    /// Slots with a fetch in flight are left alone.
    pub async fn purge_expired(&self) -> usize {
        let mut slots = self.slots.lock().await;
        let now = Instant::now();
        let mut purged = 0;

        slots.retain(|_, slot| match slot.try_lock() {
            Ok(entry) => match entry.as_ref() {
                Some(cached) if cached.is_fresh(self.ttl, now) => true,
                Some(_) => {
                    purged += 1;
                    false
                }
                None => false,
            },
            Err(_) => true,
        });
        purged
    }

    /// Number of stored values. Slots still being fetched are not counted.
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots
            .values()
            .filter(|slot| matches!(slot.try_lock(), Ok(entry) if entry.is_some()))
            .count()
    }
}
