//! ShopSearch-RS: a thin e-commerce search service written in Rust
//!
//! Accepts keyword searches over HTTP, forwards them to a third-party
//! shopping API, normalizes the response into a vendor-agnostic shape, and
//! guards the outbound call with a per-client rate limiter and a short-lived
//! response cache.

pub mod cache;
pub mod config;
pub mod metrics;
pub mod network;
pub mod ratelimit;
pub mod results;
pub mod search;
pub mod vendors;
pub mod web;

pub use config::Settings;
pub use results::{NormalizedItem, SearchError, Vendor};
pub use search::{SearchGateway, SearchParams, SortMode};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timeout for a single vendor request in seconds
pub const VENDOR_TIMEOUT: u64 = 10;
