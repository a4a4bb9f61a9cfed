//! Process-wide read-through cache with TTL expiry.
//!
//! Concurrent misses on the same key may both load; the last insert wins.
//! Reference data is read-only, so a duplicate load only costs a file read.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    loaded_at: Instant,
}

pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns a fresh cached value. Expired entries are evicted.
    pub fn get(&self, key: &str) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.loaded_at.elapsed() < self.ttl {
                debug!("Cache hit for {key}");
                return Some(entry.value.clone());
            }
        }

        if self
            .entries
            .remove_if(key, |_, entry| entry.loaded_at.elapsed() >= self.ttl)
            .is_some()
        {
            debug!("Cache expired for {key}");
        }
        None
    }

    pub fn insert(&self, key: &str, value: V) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                loaded_at: Instant::now(),
            },
        );
    }

    /// Returns the cached value or runs `load` and caches its result.
    /// Failed loads are not cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &str,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = load()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drops every entry and returns how many were removed.
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_miss_then_hit_loads_once() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let loads = Cell::new(0);

        for _ in 0..3 {
            let value: Result<u32, ()> = cache.get_or_try_insert_with("yaml:a", || {
                loads.set(loads.get() + 1);
                Ok(7)
            });
            assert_eq!(value, Ok(7));
        }
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_zero_ttl_always_reloads() {
        let cache = TtlCache::new(Duration::ZERO);
        let loads = Cell::new(0);

        for _ in 0..2 {
            let _: Result<u32, ()> = cache.get_or_try_insert_with("yaml:a", || {
                loads.set(loads.get() + 1);
                Ok(1)
            });
        }
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("yaml:a", 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("yaml:a").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let result = cache.get_or_try_insert_with("yaml:a", || Err("boom"));
        assert_eq!(result, Err("boom"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_clear_returns_removed_count() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("yaml:a", 1);
        cache.insert("yaml:b", 2);
        cache.insert("yaml:c", 3);
        assert_eq!(cache.clear(), 3);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.clear(), 0);
    }
}
