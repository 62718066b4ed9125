//! Search orchestration

use super::models::SearchParams;
use crate::cache::{search_cache_key, ResponseCache};
use crate::config::Settings;
use crate::metrics::Metrics;
use crate::ratelimit::SlidingWindowLimiter;
use crate::results::{NormalizedItem, SearchError};
use crate::vendors::VendorAdapter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Result of one gateway search
#[derive(Debug)]
pub struct SearchOutcome {
    /// Items in the requested sort order
    pub items: Vec<NormalizedItem>,
    /// Whether the items came from the cache
    pub cached: bool,
}

/// The single entry point turning a caller's request into a ranked item list
///
/// Enforces the rate limit and cache policy around the one outbound vendor
/// call, and isolates vendor failures: whatever the vendor does, the
/// gateway returns a `SearchError`, never panics.
pub struct SearchGateway {
    vendor: Arc<dyn VendorAdapter>,
    limiter: SlidingWindowLimiter,
    cache: ResponseCache,
    metrics: Arc<Metrics>,
    limit: usize,
    window: Duration,
    vendor_timeout: Duration,
}

impl SearchGateway {
    /// Create a new gateway with fresh limiter and cache state
    pub fn new(vendor: Arc<dyn VendorAdapter>, settings: &Settings, metrics: Arc<Metrics>) -> Self {
        Self {
            vendor,
            limiter: SlidingWindowLimiter::new(),
            cache: ResponseCache::new(settings.cache.ttl()),
            metrics,
            limit: settings.rate_limit.max_requests,
            window: settings.rate_limit.window(),
            vendor_timeout: settings.outgoing.timeout(),
        }
    }

    /// The response cache, exposed for the stats endpoint
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Execute a search for one client
    ///
    /// Flow: admit → cache lookup → on miss, vendor call under the request
    /// timeout → store pre-sort items → return sorted copy. A rejected
    /// request never reaches the vendor, and a failed vendor call never
    /// reaches the cache.
    pub async fn search(
        &self,
        client_key: &str,
        params: SearchParams,
    ) -> Result<SearchOutcome, SearchError> {
        self.metrics.inc_search();

        if !self.limiter.admit(client_key, self.limit, self.window) {
            self.metrics.inc_rate_limited();
            warn!("rate limited client {}", client_key);
            return Err(SearchError::RateLimited);
        }

        let key = search_cache_key(
            self.vendor.name(),
            &params.query,
            params.result_count,
            params.min_price,
            params.max_price,
        );

        if let Some(mut items) = self.cache.get_fresh(&key) {
            self.metrics.inc_cache_hit();
            debug!("cache hit for '{}'", params.query);
            params.sort_mode.apply(&mut items);
            return Ok(SearchOutcome {
                items,
                cached: true,
            });
        }

        debug!("cache miss for '{}', querying {}", params.query, self.vendor.name());

        let mut items = match timeout(self.vendor_timeout, self.vendor.search(&params)).await {
            Ok(Ok(items)) => items,
            Ok(Err(e)) => {
                self.metrics.inc_vendor_error();
                warn!("vendor {} failed: {}", self.vendor.name(), e);
                return Err(e);
            }
            Err(_) => {
                self.metrics.inc_vendor_error();
                warn!("vendor {} timed out after {:?}", self.vendor.name(), self.vendor_timeout);
                return Err(SearchError::Timeout);
            }
        };

        info!(
            "{} returned {} items for '{}'",
            self.vendor.name(),
            items.len(),
            params.query
        );

        // Cache vendor order; sorting happens on the returned copy only.
        self.cache.put(key, items.clone());
        params.sort_mode.apply(&mut items);

        Ok(SearchOutcome {
            items,
            cached: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::models::{RawSearchBody, SortMode};
    use crate::results::Vendor;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Vendor substitute with a call counter
    struct StubVendor {
        calls: AtomicUsize,
        items: Vec<NormalizedItem>,
        fail_status: Option<u16>,
        delay: Option<Duration>,
    }

    impl StubVendor {
        fn returning(items: Vec<NormalizedItem>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                items,
                fail_status: None,
                delay: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                items: vec![],
                fail_status: Some(status),
                delay: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VendorAdapter for StubVendor {
        fn name(&self) -> &str {
            "rakuten"
        }

        async fn search(&self, _params: &SearchParams) -> Result<Vec<NormalizedItem>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.fail_status {
                Some(status) => Err(SearchError::Vendor {
                    vendor: Vendor::Rakuten,
                    status,
                    body: "stub failure".to_string(),
                }),
                None => Ok(self.items.clone()),
            }
        }
    }

    fn item(id: &str, price: u64) -> NormalizedItem {
        NormalizedItem::new(
            id.to_string(),
            format!("Item {}", id),
            price,
            format!("https://example.com/item/{}", id),
            Vendor::Rakuten,
        )
    }

    fn gateway_with(vendor: Arc<StubVendor>, settings: &Settings) -> SearchGateway {
        SearchGateway::new(vendor, settings, Arc::new(Metrics::new()))
    }

    fn params_sorted(mode: SortMode) -> SearchParams {
        SearchParams {
            sort_mode: mode,
            ..SearchParams::default()
        }
    }

    #[tokio::test]
    async fn test_second_identical_search_hits_cache() {
        let vendor = Arc::new(StubVendor::returning(vec![item("a", 100), item("b", 200)]));
        let gateway = gateway_with(vendor.clone(), &Settings::default());

        let first = gateway.search("1.2.3.4", SearchParams::default()).await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.items.len(), 2);

        let second = gateway.search("1.2.3.4", SearchParams::default()).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.items, first.items);

        assert_eq!(vendor.calls(), 1);
    }

    #[tokio::test]
    async fn test_vendor_failure_is_not_cached() {
        let vendor = Arc::new(StubVendor::failing(403));
        let gateway = gateway_with(vendor.clone(), &Settings::default());

        let err = gateway
            .search("1.2.3.4", SearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Vendor { status: 403, .. }));
        assert!(gateway.cache().is_empty());

        // The next identical search reaches the vendor again.
        let _ = gateway.search("1.2.3.4", SearchParams::default()).await;
        assert_eq!(vendor.calls(), 2);
    }

    #[tokio::test]
    async fn test_rejected_request_never_reaches_vendor() {
        let mut settings = Settings::default();
        settings.rate_limit.max_requests = 2;

        let vendor = Arc::new(StubVendor::returning(vec![item("a", 100)]));
        let gateway = gateway_with(vendor.clone(), &settings);

        assert!(gateway.search("1.2.3.4", SearchParams::default()).await.is_ok());
        assert!(gateway.search("1.2.3.4", SearchParams::default()).await.is_ok());

        let err = gateway
            .search("1.2.3.4", SearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::RateLimited));

        // First call was a miss, second a cache hit, third rejected.
        assert_eq!(vendor.calls(), 1);
    }

    #[tokio::test]
    async fn test_sort_modes_share_one_entry_and_never_mutate_it() {
        let vendor = Arc::new(StubVendor::returning(vec![item("b", 200), item("a", 100)]));
        let gateway = gateway_with(vendor.clone(), &Settings::default());

        let relevance = gateway
            .search("1.2.3.4", params_sorted(SortMode::Relevance))
            .await
            .unwrap();
        assert_eq!(relevance.items[0].id, "b");

        let ascending = gateway
            .search("1.2.3.4", params_sorted(SortMode::PriceAsc))
            .await
            .unwrap();
        assert!(ascending.cached);
        assert_eq!(ascending.items[0].id, "a");

        assert_eq!(vendor.calls(), 1);

        // The cached copy keeps vendor order.
        let params = SearchParams::default();
        let key = search_cache_key(
            "rakuten",
            &params.query,
            params.result_count,
            params.min_price,
            params.max_price,
        );
        let entry = gateway.cache().get(&key).unwrap();
        assert_eq!(entry.items[0].id, "b");
    }

    #[tokio::test]
    async fn test_slow_vendor_surfaces_timeout() {
        let mut settings = Settings::default();
        settings.outgoing.request_timeout = 0.05;

        let vendor = Arc::new(StubVendor {
            calls: AtomicUsize::new(0),
            items: vec![item("a", 100)],
            fail_status: None,
            delay: Some(Duration::from_secs(1)),
        });
        let gateway = gateway_with(vendor, &settings);

        let err = gateway
            .search("1.2.3.4", SearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Timeout));
        assert!(gateway.cache().is_empty());
    }

    #[tokio::test]
    async fn test_distinct_params_are_distinct_entries() {
        let vendor = Arc::new(StubVendor::returning(vec![item("a", 100)]));
        let gateway = gateway_with(vendor.clone(), &Settings::default());

        let shirt = SearchParams::from_raw(RawSearchBody {
            query: Some("shirt".to_string()),
            ..Default::default()
        });
        let shoes = SearchParams::from_raw(RawSearchBody {
            query: Some("shoes".to_string()),
            ..Default::default()
        });

        let _ = gateway.search("1.2.3.4", shirt).await.unwrap();
        let _ = gateway.search("1.2.3.4", shoes).await.unwrap();

        assert_eq!(vendor.calls(), 2);
        assert_eq!(gateway.cache().len(), 2);
    }
}
