//! Metrics collection module
//!
//! Tracks request counts, cache effectiveness, and vendor failures.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide metrics collector
#[derive(Debug, Default)]
pub struct Metrics {
    searches: AtomicU64,
    cache_hits: AtomicU64,
    rate_limited: AtomicU64,
    vendor_errors: AtomicU64,
    tracked_events: AtomicU64,
}

/// Point-in-time view of all counters
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub cache_hits: u64,
    pub rate_limited: u64,
    pub vendor_errors: u64,
    pub tracked_events: u64,
}

impl Metrics {
    /// Create a new metrics instance with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an inbound search request
    pub fn inc_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a search answered from cache
    pub fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rate-limited rejection
    pub fn inc_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed vendor call
    pub fn inc_vendor_error(&self) {
        self.vendor_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an acknowledged tracking event
    pub fn inc_tracked_event(&self) {
        self.tracked_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            vendor_errors: self.vendor_errors.load(Ordering::Relaxed),
            tracked_events: self.tracked_events.load(Ordering::Relaxed),
        }
    }
}
