//! Per-client request rate limiting
//!
//! Bounds request throughput per client to protect the vendor API from
//! abuse. Client keys come from a spoofable forwarded-address header, so
//! this is an abuse-dampener, not a security control.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window rate limiter keyed by client
///
/// Each admission check prunes the client's window to entries younger than
/// the window size, appends the current instant, and admits iff the
/// resulting length is within the limit. The window is mutated on every
/// check, including rejections: a rejected burst still counts toward the
/// limit. State is in-memory only and single-process; nothing survives a
/// restart and nothing is shared across instances.
pub struct SlidingWindowLimiter {
    windows: Mutex<HashMap<String, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    /// Create a new limiter with no recorded clients
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether a request from `client_key` is admitted
    ///
    /// Never fails; returns `false` when the client has exhausted its quota
    /// for the current window.
    pub fn admit(&self, client_key: &str, limit: usize, window: Duration) -> bool {
        self.admit_at(client_key, limit, window, Instant::now())
    }

    fn admit_at(&self, client_key: &str, limit: usize, window: Duration, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap();
        let entries = windows.entry(client_key.to_string()).or_default();
        entries.retain(|t| now.duration_since(*t) < window);
        entries.push(now);
        entries.len() <= limit
    }

    /// Number of clients with a recorded window
    pub fn client_count(&self) -> usize {
        self.windows.lock().unwrap().len()
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}
