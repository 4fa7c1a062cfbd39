//! LRU+TTL caching (C4, spec §4.6), grounded on kumomta's `lruttl` crate:
//! same `lru_cache::LruCache` core and lazy-expiry-on-get discipline, with
//! hit/miss/size bookkeeping added since `lruttl` doesn't track stats and
//! the orchestrator needs them for cache introspection.

use lru_cache::LruCache;
use parking_lot::Mutex;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::config::CacheConfig;
use crate::result::{AuthCheck, DomainCheck, GravatarCheck, MxCheck, ReputationCheck, ValidationResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub hit_rate: f64,
}

#[derive(Clone)]
struct Item<V> {
    value: V,
    expires_at: Instant,
}

/// A single named cache. The eviction order (least-recently-used) comes
/// straight from `lru_cache`'s internal bookkeeping, which already matches
/// "entry with the smallest `lastAccessedAt`" since every `get` touches it.
/// Expiry is lazy: a stale hit is removed and counted as a miss.
pub struct LruTtlCache<K: Hash + Eq, V: Clone> {
    name: &'static str,
    default_ttl: Duration,
    inner: Mutex<LruCache<K, Item<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Hash + Eq, V: Clone> LruTtlCache<K, V> {
    pub fn new(name: &'static str, capacity: usize, default_ttl: Duration) -> Self {
        Self {
            name,
            default_ttl,
            inner: Mutex::new(LruCache::new(capacity.max(1))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let hit = match inner.get_mut(key) {
            Some(item) if item.expires_at > Instant::now() => Some(item.value.clone()),
            Some(_) => {
                inner.remove(key);
                None
            }
            None => None,
        };
        drop(inner);
        if hit.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(cache = self.name, "cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(cache = self.name, "cache miss");
        }
        hit
    }

    pub fn set(&self, key: K, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let mut inner = self.inner.lock();
        inner.insert(
            key,
            Item {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn has(&self, key: &K) -> bool {
        let mut inner = self.inner.lock();
        matches!(inner.get_mut(key), Some(item) if item.expires_at > Instant::now())
    }

    pub fn delete(&self, key: &K) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let size = self.inner.lock().len();
        let hit_rate = if hits + misses == 0 {
            0.0
        } else {
            hits as f64 / (hits + misses) as f64
        };
        CacheStats {
            hits,
            misses,
            size,
            hit_rate,
        }
    }
}

/// The nine named caches from spec §4.6, sized and ttl'd from [`CacheConfig`].
pub struct Caches {
    pub mx: LruTtlCache<String, MxCheck>,
    pub domain_format: LruTtlCache<String, DomainCheck>,
    pub full_result: LruTtlCache<String, ValidationResult>,
    pub catch_all: LruTtlCache<String, bool>,
    pub blacklist: LruTtlCache<String, crate::result::BlacklistCheck>,
    pub smtp: LruTtlCache<String, crate::result::SmtpCheck>,
    pub authentication: LruTtlCache<String, AuthCheck>,
    pub reputation: LruTtlCache<String, ReputationCheck>,
    pub gravatar: LruTtlCache<String, GravatarCheck>,
}

impl Caches {
    pub fn new(cfg: &CacheConfig) -> Self {
        Self {
            mx: LruTtlCache::new("mx", cfg.mx.capacity, cfg.mx.ttl),
            domain_format: LruTtlCache::new(
                "domain_format",
                cfg.domain_format.capacity,
                cfg.domain_format.ttl,
            ),
            full_result: LruTtlCache::new("full_result", cfg.full_result.capacity, cfg.full_result.ttl),
            catch_all: LruTtlCache::new("catch_all", cfg.catch_all.capacity, cfg.catch_all.ttl),
            blacklist: LruTtlCache::new("blacklist", cfg.blacklist.capacity, cfg.blacklist.ttl),
            smtp: LruTtlCache::new("smtp", cfg.smtp.capacity, cfg.smtp.ttl),
            authentication: LruTtlCache::new(
                "authentication",
                cfg.authentication.capacity,
                cfg.authentication.ttl,
            ),
            reputation: LruTtlCache::new("reputation", cfg.reputation.capacity, cfg.reputation.ttl),
            gravatar: LruTtlCache::new("gravatar", cfg.gravatar.capacity, cfg.gravatar.ttl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_then_miss_after_delete() {
        let cache = LruTtlCache::new("test", 10, Duration::from_secs(60));
        cache.set("a".to_string(), 1u32);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert!(cache.delete(&"a".to_string()));
        assert_eq!(cache.get(&"a".to_string()), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn expired_entry_counts_as_miss() {
        let cache = LruTtlCache::new("test", 10, Duration::from_millis(1));
        cache.set("a".to_string(), 1u32);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(!cache.has(&"a".to_string()));
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let cache = LruTtlCache::new("test", 2, Duration::from_secs(60));
        cache.set("a".to_string(), 1u32);
        cache.set("b".to_string(), 2u32);
        cache.get(&"a".to_string());
        cache.set("c".to_string(), 3u32);
        assert_eq!(cache.get(&"b".to_string()), None);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"c".to_string()), Some(3));
    }

    #[test]
    fn clear_empties_cache() {
        let cache = LruTtlCache::new("test", 10, Duration::from_secs(60));
        cache.set("a".to_string(), 1u32);
        cache.clear();
        assert_eq!(cache.stats().size, 0);
    }
}
