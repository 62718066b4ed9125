//! Caching module for ShopSearch-RS
//!
//! Provides the short-lived in-memory cache that sits in front of the
//! vendor call, and the canonical cache key derivation.

use crate::results::NormalizedItem;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A stored result set with its storage time
///
/// Never mutated after creation, only replaced by a later `put`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// When the entry was stored
    pub stored_at: Instant,
    /// Normalized items in vendor order (pre-sort)
    pub items: Vec<NormalizedItem>,
}

impl CacheEntry {
    /// Whether the entry is still within its time-to-live
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Cache for normalized search results
///
/// Entries are stored in vendor-provided order so every sort mode of the
/// same underlying query shares one entry. Freshness is enforced in
/// `get_fresh`, the one read path the gateway uses; the raw `get` returns
/// entries regardless of age and never self-expires them. There is no
/// eviction beyond overwrite-on-write: the map grows with distinct keys for
/// the life of the process, which is only acceptable for short-lived
/// processes.
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Create a new cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a stored entry regardless of freshness
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Get the stored items only if the entry is still fresh
    pub fn get_fresh(&self, key: &str) -> Option<Vec<NormalizedItem>> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|e| e.is_fresh(self.ttl))
            .map(|e| e.items.clone())
    }

    /// Store a result set, overwriting any prior entry for the key
    pub fn put(&self, key: String, items: Vec<NormalizedItem>) {
        let entry = CacheEntry {
            stored_at: Instant::now(),
            items,
        };
        self.entries.lock().unwrap().insert(key, entry);
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Generate the cache key for a search
///
/// Fields are hashed in a fixed order, so two logically-equal parameter
/// sets produce the same key no matter how they were constructed. The sort
/// mode is deliberately not part of the key: entries hold pre-sort items
/// and sorting happens on read.
pub fn search_cache_key(
    vendor: &str,
    query: &str,
    result_count: u32,
    min_price: Option<u64>,
    max_price: Option<u64>,
) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(vendor.as_bytes());
    hasher.update([0u8]);
    hasher.update(query.as_bytes());
    hasher.update([0u8]);
    hasher.update(result_count.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(min_price.map(|p| p.to_string()).unwrap_or_default().as_bytes());
    hasher.update([0u8]);
    hasher.update(max_price.map(|p| p.to_string()).unwrap_or_default().as_bytes());

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Vendor;

    fn item(id: &str, price: u64) -> NormalizedItem {
        NormalizedItem::new(
            id.to_string(),
            format!("Item {}", id),
            price,
            format!("https://example.com/item/{}", id),
            Vendor::Rakuten,
        )
    }

    #[test]
    fn test_put_get_round_trip() {
        let cache = ResponseCache::new(Duration::from_secs(30));
        let items = vec![item("a", 100), item("b", 200)];
        cache.put("k".to_string(), items.clone());

        assert_eq!(cache.get_fresh("k").unwrap(), items);
        assert_eq!(cache.get("k").unwrap().items, items);
    }

    #[test]
    fn test_missing_key_is_absent() {
        let cache = ResponseCache::new(Duration::from_secs(30));
        assert!(cache.get("nope").is_none());
        assert!(cache.get_fresh("nope").is_none());
    }

    #[test]
    fn test_stale_entry_retrievable_but_not_fresh() {
        // Zero TTL makes every stored entry immediately stale.
        let cache = ResponseCache::new(Duration::ZERO);
        cache.put("k".to_string(), vec![item("a", 100)]);

        assert!(cache.get_fresh("k").is_none());
        let entry = cache.get("k").expect("stale entry must stay retrievable");
        assert_eq!(entry.items.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_overwrites_unconditionally() {
        let cache = ResponseCache::new(Duration::from_secs(30));
        cache.put("k".to_string(), vec![item("a", 100)]);
        cache.put("k".to_string(), vec![item("b", 200)]);

        let items = cache.get_fresh("k").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "b");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        // Same logical parameters assembled two different ways.
        let (query, count) = ("shirt", 12u32);
        let min = Some(1000u64);
        let max = Some(5000u64);

        let a = search_cache_key("rakuten", query, count, min, max);

        let max2 = Some(5000u64);
        let min2 = Some(1000u64);
        let b = search_cache_key("rakuten", "shirt", 12, min2, max2);

        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_key_distinguishes_params() {
        let base = search_cache_key("rakuten", "shirt", 12, None, None);
        assert_ne!(base, search_cache_key("rakuten", "shoes", 12, None, None));
        assert_ne!(base, search_cache_key("rakuten", "shirt", 13, None, None));
        assert_ne!(base, search_cache_key("rakuten", "shirt", 12, Some(100), None));
        assert_ne!(base, search_cache_key("other", "shirt", 12, None, None));
    }

    #[test]
    fn test_cache_key_field_boundaries() {
        // A value must not bleed across the field separator.
        let a = search_cache_key("rakuten", "a1", 2, None, None);
        let b = search_cache_key("rakuten", "a", 12, None, None);
        assert_ne!(a, b);
    }
}
