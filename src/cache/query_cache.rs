use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::SearchResults;

/// Memoized query results keyed by the query string.
///
/// Entries are LRU-bounded so the cache can shed under pressure; any source
/// registration invalidates the whole cache. A capacity of zero disables
/// memoization entirely.
pub struct QueryCache {
    cache: Option<Mutex<LruCache<String, Arc<SearchResults>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        let cache = NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn get(&self, query: &str) -> Option<Arc<SearchResults>> {
        let cache = self.cache.as_ref()?;
        let mut cache = cache.lock();
        match cache.get(query) {
            Some(results) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(results.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, query: &str, results: Arc<SearchResults>) {
        if let Some(cache) = self.cache.as_ref() {
            cache.lock().put(query.to_string(), results);
        }
    }

    /// Drop every entry; called on any successful source registration
    pub fn invalidate_all(&self) {
        if let Some(cache) = self.cache.as_ref() {
            cache.lock().clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.cache.as_ref().map(|c| c.lock().len()).unwrap_or(0),
            capacity: self.cache.as_ref().map(|c| c.lock().cap().get()).unwrap_or(0),
        }
    }
}

/// Query cache counters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn results_with(offset: u32) -> Arc<SearchResults> {
        let mut results = SearchResults::new();
        results.insert("src".to_string(), BTreeSet::from([offset]));
        Arc::new(results)
    }

    #[test]
    fn test_hit_and_miss_counters() {
        let cache = QueryCache::new(4);
        assert!(cache.get("q").is_none());
        cache.put("q", results_with(3));
        assert!(cache.get("q").is_some());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalidate_all_empties_cache() {
        let cache = QueryCache::new(4);
        cache.put("a", results_with(1));
        cache.put("b", results_with(2));
        cache.invalidate_all();
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
        assert_eq!(cache.stats().len, 0);
    }

    #[test]
    fn test_lru_evicts_oldest() {
        let cache = QueryCache::new(2);
        cache.put("a", results_with(1));
        cache.put("b", results_with(2));
        cache.put("c", results_with(3));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = QueryCache::new(0);
        assert!(!cache.is_enabled());
        cache.put("q", results_with(1));
        assert!(cache.get("q").is_none());
        // the disabled cache counts nothing
        assert_eq!(cache.stats().misses, 0);
        assert_eq!(cache.stats().capacity, 0);
    }
}
